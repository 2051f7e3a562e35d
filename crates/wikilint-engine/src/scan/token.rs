use crate::region::RegionKind;
use crate::text::span::Span;

/// Classification of a scanned span: either the region it belongs to, or a
/// leaf category outside the region model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// Text that belongs to a region — its delimiters (see
    /// [`Token::bracket`]) and its interior runs.
    Region(RegionKind),
    /// `<!-- … -->` content and delimiters.
    Comment,
    /// An HTML entity such as `&amp;`.
    Escape,
    /// Text outside any construct.
    Plain,
    /// A tag name token (`<foo`, `</foo>`, `/>`).
    Tag,
    /// An attribute name inside an opening tag.
    AttributeName,
    /// A quoted attribute value inside an opening tag.
    AttributeValue,
    /// `=` between attribute name and value.
    Delimiter,
    /// A run of whitespace.
    Whitespace,
}

/// Whether a token opens a region, closes one, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketRole {
    Open,
    Close,
    None,
}

/// One scanned span. Tokens cover the input with no gaps and no overlaps and
/// are never mutated after emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub span: Span,
    pub bracket: BracketRole,
    /// Set on embedded-region tokens: the language identifier the host should
    /// hand this span's tokenization to.
    pub embedded: Option<String>,
}

impl Token {
    pub(crate) fn new(class: TokenClass, span: Span) -> Self {
        Self {
            class,
            span,
            bracket: BracketRole::None,
            embedded: None,
        }
    }

    pub(crate) fn bracket(mut self, role: BracketRole) -> Self {
        self.bracket = role;
        self
    }

    pub(crate) fn embedded(mut self, language: &str) -> Self {
        self.embedded = Some(language.to_owned());
        self
    }
}
