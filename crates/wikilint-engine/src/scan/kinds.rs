//! Per-construct delimiter knowledge.
//!
//! Each construct owns its delimiters; scanner rules and linter patterns
//! reference these rather than repeating literals.

/// `[[…]]` link reference. Case-sensitive, must not cross a line.
pub struct Link;

impl Link {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
}

/// Brace-delimited constructs: templates, parser functions, template args.
pub struct Braces;

impl Braces {
    pub const ARG_OPEN: &'static [u8; 3] = b"{{{";
    pub const ARG_CLOSE: &'static str = "}}}";
    pub const PFN_OPEN: &'static [u8; 3] = b"{{#";
    pub const OPEN: &'static [u8; 2] = b"{{";
    pub const CLOSE: &'static [u8; 2] = b"}}";
}

/// Quote runs for bold and italic spans. Bold is tried first so `'''` never
/// lexes as italic-plus-quote.
pub struct Quotes;

impl Quotes {
    pub const BOLD: &'static [u8; 3] = b"'''";
    pub const ITALIC: &'static [u8; 2] = b"''";
}

/// HTML-style comments.
pub struct Comment;

impl Comment {
    pub const OPEN: &'static [u8; 4] = b"<!--";
    pub const CLOSE: &'static [u8; 3] = b"-->";
}

/// Container tags the scanner gives special treatment. Tag names are matched
/// case-insensitively; anything unrecognized is a plain keyword tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<script>` — hands the body to an embedded lexer.
    Script,
    /// `<style>` — hands the body to an embedded lexer.
    Style,
    /// `<pre>` — literal region.
    Pre,
    /// `<nowiki>` — literal region.
    NoWiki,
    /// Any other tag (`<noinclude>`, `<includeonly>`, plain HTML…).
    Other,
}

impl TagKind {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("script") {
            Self::Script
        } else if name.eq_ignore_ascii_case("style") {
            Self::Style
        } else if name.eq_ignore_ascii_case("pre") {
            Self::Pre
        } else if name.eq_ignore_ascii_case("nowiki") {
            Self::NoWiki
        } else {
            Self::Other
        }
    }
}

/// Default embedded language for `<script>` bodies when no `type` attribute
/// overrides it.
pub const SCRIPT_LANGUAGE: &str = "javascript";
/// Embedded language for `<style>` bodies.
pub const STYLE_LANGUAGE: &str = "css";

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Matches `<name` at the start of `rest`, returning the tag name and the
/// byte length consumed (through the end of the name).
pub fn match_open_tag(rest: &str) -> Option<(&str, usize)> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let name_len = bytes[1..].iter().take_while(|&&b| is_name_byte(b)).count();
    if name_len == 0 {
        return None;
    }
    Some((&rest[1..1 + name_len], 1 + name_len))
}

/// Matches `</name >` (optional whitespace before `>`) at the start of
/// `rest`, returning the tag name and the total byte length consumed.
pub fn match_closing_tag(rest: &str) -> Option<(&str, usize)> {
    let bytes = rest.as_bytes();
    if !bytes.starts_with(b"</") {
        return None;
    }
    let name_len = bytes[2..].iter().take_while(|&&b| is_name_byte(b)).count();
    if name_len == 0 {
        return None;
    }
    let mut i = 2 + name_len;
    while bytes.get(i).is_some_and(|b| *b == b' ' || *b == b'\t') {
        i += 1;
    }
    if bytes.get(i) != Some(&b'>') {
        return None;
    }
    Some((&rest[2..2 + name_len], i + 1))
}

/// Matches an HTML entity (`&name;`) at the start of `rest`, returning the
/// byte length consumed.
pub fn match_entity(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }
    let name_len = bytes[1..].iter().take_while(|&&b| is_name_byte(b)).count();
    if name_len == 0 {
        return None;
    }
    if bytes.get(1 + name_len) != Some(&b';') {
        return None;
    }
    Some(name_len + 2)
}
