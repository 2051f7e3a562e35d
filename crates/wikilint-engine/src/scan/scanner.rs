//! The lexical state machine.
//!
//! A stack of scan states mirrors the region model: the root state plus one
//! pushed state per open construct. At each position the active state's rules
//! are tried in order and the first match wins; a match emits a token and may
//! push or pop a state. Unmatched special characters are consumed as
//! single-byte text tokens, so the scan always makes forward progress.
//!
//! Embedded regions (`<script>`, `<style>`) pop on a zero-width lookahead:
//! the closing tag is re-scanned by the outer state rather than consumed, so
//! the delegated lexer's range ends exactly before `</script>`.

use crate::region::RegionKind;
use crate::text::span::Span;

use super::cursor::Cursor;
use super::kinds::{
    Braces, Comment, Link, Quotes, SCRIPT_LANGUAGE, STYLE_LANGUAGE, TagKind, match_closing_tag,
    match_entity, match_open_tag,
};
use super::token::{BracketRole, Token, TokenClass};

#[derive(Debug, Clone)]
enum ScanState {
    Link,
    Template,
    ParserFunction,
    Bold,
    Italic,
    Comment,
    Literal(RegionKind),
    Embedded { kind: RegionKind, language: String },
    /// Inside an opening tag, scanning attributes until `>` or `/>`.
    Tag {
        kind: TagKind,
        /// Value of the `type` attribute, once seen.
        type_attr: Option<String>,
        /// True right after an attribute name spelled `type`.
        expect_type_value: bool,
    },
}

/// Lazy tokenizer over a full document snapshot.
///
/// Pure function of the input text: re-running on the same text yields an
/// identical sequence, and concatenating all token spans reproduces the input
/// exactly (no gaps, no overlaps).
pub struct Tokenizer<'a> {
    cur: Cursor<'a>,
    states: Vec<ScanState>,
}

/// Tokenizes `text`, returning the lazy token sequence.
pub fn tokenize(text: &str) -> Tokenizer<'_> {
    Tokenizer::new(text)
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            cur: Cursor::new(text),
            states: Vec::new(),
        }
    }

    fn tok(&self, class: TokenClass, start: usize) -> Token {
        Token::new(
            class,
            Span {
                start,
                end: self.cur.pos(),
            },
        )
    }

    /// Consumes one byte plus any following bytes not in `stop`. Always
    /// consumes at least one byte.
    fn run_until(&mut self, stop: &[u8]) {
        self.cur.bump();
        while let Some(b) = self.cur.peek() {
            if stop.contains(&b) {
                break;
            }
            self.cur.bump();
        }
    }

    fn whitespace_run(&mut self) -> Option<Token> {
        let start = self.cur.pos();
        while self
            .cur
            .peek()
            .is_some_and(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        {
            self.cur.bump();
        }
        (self.cur.pos() > start).then(|| self.tok(TokenClass::Whitespace, start))
    }

    fn open_region(&mut self, kind: RegionKind, state: ScanState, len: usize) -> Token {
        let start = self.cur.pos();
        self.cur.bump_n(len);
        self.states.push(state);
        self.tok(TokenClass::Region(kind), start)
            .bracket(BracketRole::Open)
    }

    fn close_region(&mut self, kind: RegionKind, len: usize) -> Token {
        let start = self.cur.pos();
        self.cur.bump_n(len);
        self.states.pop();
        self.tok(TokenClass::Region(kind), start)
            .bracket(BracketRole::Close)
    }

    fn next_root(&mut self) -> Token {
        let start = self.cur.pos();

        if let Some(tok) = self.whitespace_run() {
            return tok;
        }
        if self.cur.starts_with(Comment::OPEN) {
            self.cur.bump_n(Comment::OPEN.len());
            self.states.push(ScanState::Comment);
            return self
                .tok(TokenClass::Comment, start)
                .bracket(BracketRole::Open);
        }
        if self.cur.starts_with(Link::OPEN) {
            return self.open_region(RegionKind::Link, ScanState::Link, Link::OPEN.len());
        }
        if self.cur.starts_with(Braces::ARG_OPEN) {
            // `{{{…}}}` is a single-line construct; without a closer on the
            // same line this falls through to the `{{` rule below.
            let rest = &self.cur.rest()[Braces::ARG_OPEN.len()..];
            let line_end = rest.find('\n').unwrap_or(rest.len());
            if let Some(close) = rest[..line_end].find(Braces::ARG_CLOSE) {
                self.cur
                    .bump_n(Braces::ARG_OPEN.len() + close + Braces::ARG_CLOSE.len());
                return self.tok(TokenClass::Region(RegionKind::TemplateArg), start);
            }
        }
        if self.cur.starts_with(Braces::PFN_OPEN) {
            return self.open_region(
                RegionKind::ParserFunction,
                ScanState::ParserFunction,
                Braces::PFN_OPEN.len(),
            );
        }
        if self.cur.starts_with(Braces::OPEN) {
            return self.open_region(
                RegionKind::TemplateRef,
                ScanState::Template,
                Braces::OPEN.len(),
            );
        }
        if self.cur.starts_with(Quotes::BOLD) {
            return self.open_region(RegionKind::Bold, ScanState::Bold, Quotes::BOLD.len());
        }
        if self.cur.starts_with(Quotes::ITALIC) {
            return self.open_region(RegionKind::Italic, ScanState::Italic, Quotes::ITALIC.len());
        }
        if let Some(n) = match_entity(self.cur.rest()) {
            self.cur.bump_n(n);
            return self.tok(TokenClass::Escape, start);
        }
        if let Some((name, n)) = match_closing_tag(self.cur.rest()) {
            let class = tag_class(name);
            self.cur.bump_n(n);
            return self.tok(class, start).bracket(BracketRole::Close);
        }
        if let Some((name, n)) = match_open_tag(self.cur.rest()) {
            let kind = TagKind::from_name(name);
            let class = tag_class(name);
            self.cur.bump_n(n);
            self.states.push(ScanState::Tag {
                kind,
                type_attr: None,
                expect_type_value: false,
            });
            return self.tok(class, start).bracket(BracketRole::Open);
        }

        // Plain text run up to the next byte that could start a rule. A
        // special byte with no matching rule (a lone `'` or `[`) is consumed
        // on its own, guaranteeing progress.
        self.run_until(b"[{'<& \t\r\n");
        self.tok(TokenClass::Plain, start)
    }

    fn next_link(&mut self) -> Token {
        if self.cur.starts_with(Link::CLOSE) {
            return self.close_region(RegionKind::Link, Link::CLOSE.len());
        }
        let start = self.cur.pos();
        self.run_until(b"]");
        self.tok(TokenClass::Region(RegionKind::Link), start)
    }

    fn next_braces(&mut self, kind: RegionKind) -> Token {
        if self.cur.starts_with(Link::OPEN) {
            return self.open_region(RegionKind::Link, ScanState::Link, Link::OPEN.len());
        }
        if self.cur.starts_with(Braces::PFN_OPEN) {
            return self.open_region(
                RegionKind::ParserFunction,
                ScanState::ParserFunction,
                Braces::PFN_OPEN.len(),
            );
        }
        if self.cur.starts_with(Braces::OPEN) {
            return self.open_region(
                RegionKind::TemplateRef,
                ScanState::Template,
                Braces::OPEN.len(),
            );
        }
        if self.cur.starts_with(Braces::CLOSE) {
            return self.close_region(kind, Braces::CLOSE.len());
        }
        let start = self.cur.pos();
        self.run_until(b"[{}");
        self.tok(TokenClass::Region(kind), start)
    }

    fn next_quote(&mut self, kind: RegionKind, closer: &[u8]) -> Token {
        if self.cur.starts_with(closer) {
            return self.close_region(kind, closer.len());
        }
        let start = self.cur.pos();
        self.run_until(b"'");
        self.tok(TokenClass::Region(kind), start)
    }

    fn next_comment(&mut self) -> Token {
        let start = self.cur.pos();
        if self.cur.starts_with(Comment::CLOSE) {
            self.cur.bump_n(Comment::CLOSE.len());
            self.states.pop();
            return self
                .tok(TokenClass::Comment, start)
                .bracket(BracketRole::Close);
        }
        self.run_until(b"-<");
        self.tok(TokenClass::Comment, start)
    }

    fn next_literal(&mut self, kind: RegionKind) -> Token {
        if let Some((name, n)) = match_closing_tag(self.cur.rest())
            && literal_kind_for(name) == Some(kind)
        {
            return self.close_region(kind, n);
        }
        let start = self.cur.pos();
        self.run_until(b"<");
        self.tok(TokenClass::Region(kind), start)
    }

    /// Returns `None` when the matching closing tag is at the cursor: the
    /// state pops zero-width and the outer state re-scans the tag.
    fn next_embedded(&mut self, kind: RegionKind, language: &str) -> Option<Token> {
        if let Some((name, _)) = match_closing_tag(self.cur.rest()) {
            let closes = match kind {
                RegionKind::EmbeddedScript => name.eq_ignore_ascii_case("script"),
                _ => name.eq_ignore_ascii_case("style"),
            };
            if closes {
                self.states.pop();
                return None;
            }
        }
        let start = self.cur.pos();
        self.run_until(b"<");
        Some(self.tok(TokenClass::Region(kind), start).embedded(language))
    }

    fn next_tag(&mut self, kind: TagKind) -> Token {
        let start = self.cur.pos();

        if let Some(tok) = self.whitespace_run() {
            return tok;
        }
        if self.cur.starts_with(b"/>") {
            self.cur.bump_n(2);
            // Self-closing: the element never opens a region.
            self.states.pop();
            return self.tok(TokenClass::Tag, start).bracket(BracketRole::Close);
        }
        if self.cur.peek() == Some(b'>') {
            self.cur.bump();
            let type_attr = match self.states.pop() {
                Some(ScanState::Tag { type_attr, .. }) => type_attr,
                _ => None,
            };
            match kind {
                TagKind::Script => {
                    let language = type_attr.unwrap_or_else(|| SCRIPT_LANGUAGE.to_owned());
                    self.states.push(ScanState::Embedded {
                        kind: RegionKind::EmbeddedScript,
                        language,
                    });
                }
                TagKind::Style => self.states.push(ScanState::Embedded {
                    kind: RegionKind::EmbeddedStyle,
                    language: STYLE_LANGUAGE.to_owned(),
                }),
                TagKind::Pre => self.states.push(ScanState::Literal(RegionKind::LiteralPre)),
                TagKind::NoWiki => self
                    .states
                    .push(ScanState::Literal(RegionKind::LiteralNoWiki)),
                TagKind::Other => {}
            }
            return self.tok(TokenClass::Tag, start);
        }
        if self.cur.peek() == Some(b'=') {
            self.cur.bump();
            return self.tok(TokenClass::Delimiter, start);
        }
        if let Some(quote) = self.cur.peek().filter(|b| *b == b'"' || *b == b'\'') {
            self.cur.bump();
            let value_start = self.cur.pos();
            while let Some(b) = self.cur.peek() {
                if b == quote || b == b'\n' {
                    break;
                }
                self.cur.bump();
            }
            let value = self.cur.s[value_start..self.cur.pos()].to_owned();
            if self.cur.peek() == Some(quote) {
                self.cur.bump();
            }
            if let Some(ScanState::Tag {
                type_attr,
                expect_type_value,
                ..
            }) = self.states.last_mut()
            {
                if *expect_type_value {
                    *type_attr = Some(value);
                    *expect_type_value = false;
                }
            }
            return self.tok(TokenClass::AttributeValue, start);
        }
        if self
            .cur
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            while self
                .cur
                .peek()
                .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
            {
                self.cur.bump();
            }
            let name = &self.cur.s[start..self.cur.pos()];
            let is_type = name.eq_ignore_ascii_case("type");
            if let Some(ScanState::Tag {
                expect_type_value, ..
            }) = self.states.last_mut()
            {
                *expect_type_value = is_type;
            }
            return self.tok(TokenClass::AttributeName, start);
        }

        // Anything else inside a tag is junk; consume one character and move
        // on. Whole characters, so spans stay on char boundaries.
        let n = self.cur.rest().chars().next().map_or(1, char::len_utf8);
        self.cur.bump_n(n);
        self.tok(TokenClass::Plain, start)
    }
}

fn literal_kind_for(name: &str) -> Option<RegionKind> {
    match TagKind::from_name(name) {
        TagKind::Pre => Some(RegionKind::LiteralPre),
        TagKind::NoWiki => Some(RegionKind::LiteralNoWiki),
        _ => None,
    }
}

/// Token class for a tag-name token: recognized container tags classify as
/// their region, everything else is a plain tag keyword.
fn tag_class(name: &str) -> TokenClass {
    match TagKind::from_name(name) {
        TagKind::Script => TokenClass::Region(RegionKind::EmbeddedScript),
        TagKind::Style => TokenClass::Region(RegionKind::EmbeddedStyle),
        TagKind::Pre => TokenClass::Region(RegionKind::LiteralPre),
        TagKind::NoWiki => TokenClass::Region(RegionKind::LiteralNoWiki),
        TagKind::Other => TokenClass::Tag,
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.cur.eof() {
                return None;
            }
            let token = match self.states.last().cloned() {
                None => self.next_root(),
                Some(ScanState::Link) => self.next_link(),
                Some(ScanState::Template) => self.next_braces(RegionKind::TemplateRef),
                Some(ScanState::ParserFunction) => self.next_braces(RegionKind::ParserFunction),
                Some(ScanState::Bold) => self.next_quote(RegionKind::Bold, Quotes::BOLD),
                Some(ScanState::Italic) => self.next_quote(RegionKind::Italic, Quotes::ITALIC),
                Some(ScanState::Comment) => self.next_comment(),
                Some(ScanState::Literal(kind)) => self.next_literal(kind),
                Some(ScanState::Embedded { kind, language }) => {
                    match self.next_embedded(kind, &language) {
                        Some(tok) => tok,
                        // Zero-width pop at the closing tag; re-scan it in
                        // the outer state.
                        None => continue,
                    }
                }
                Some(ScanState::Tag { kind, .. }) => self.next_tag(kind),
            };
            return Some(token);
        }
    }
}
