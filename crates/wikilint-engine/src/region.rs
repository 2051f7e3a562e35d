//! Shared region model: the kinds of syntactic regions wikitext can open,
//! and the stack of regions currently open at a point in a document.
//!
//! Both the tokenizer (as its lexer states) and the structural linter (as its
//! validation stack) track nesting with this model, so they agree on how
//! regions nest: literal regions suppress everything until closed, links
//! never contain links and never cross a line boundary, templates nest
//! arbitrarily.

/// Kind of a syntactic region (or region-delimiting event).
///
/// A closed enum so region dispatch is exhaustiveness-checked; the closing
/// pattern each kind expects is owned by the scanner/linter rule that pushed
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionKind {
    Unknown,
    /// Text outside any construct.
    PlainText,
    /// `<pre>…</pre>` — literal, no markup recognized inside.
    LiteralPre,
    /// `<nowiki>…</nowiki>` — literal, no markup recognized inside.
    LiteralNoWiki,
    /// `[[…]]` link reference.
    Link,
    /// A `]]` closer considered on its own (linter match dispatch).
    LinkEnd,
    /// `{{{…}}}` template argument.
    TemplateArg,
    /// `{{#…}}` parser function.
    ParserFunction,
    /// `{{…}}` template transclusion.
    TemplateRef,
    /// `'''…'''`.
    Bold,
    /// `''…''`.
    Italic,
    /// `<script>…</script>`, tokenized by a delegated lexer.
    EmbeddedScript,
    /// `<style>…</style>`, tokenized by a delegated lexer.
    EmbeddedStyle,
}

impl RegionKind {
    /// True for regions inside which no other markup is recognized until the
    /// matching closer appears.
    pub fn is_literal(self) -> bool {
        matches!(self, Self::LiteralPre | Self::LiteralNoWiki)
    }
}

/// One currently-open region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBlockEnvironment {
    /// While true, the scanner suppresses all other region recognition until
    /// the matching closer is seen.
    pub is_literal_region: bool,
    /// Nesting depth at push time (root = 0).
    pub depth: u32,
    /// Which region kind opened this environment. `None` only for the root.
    pub last_open_kind: Option<RegionKind>,
    /// 1-based line of the opening token. 0 for the root.
    pub begin_line: u32,
    /// 1-based column of the opening token. 0 for the root.
    pub begin_column: u32,
}

impl ControlBlockEnvironment {
    fn root() -> Self {
        Self {
            is_literal_region: false,
            depth: 0,
            last_open_kind: None,
            begin_line: 0,
            begin_column: 0,
        }
    }
}

/// Ordered stack of open control-block environments, root-to-innermost.
///
/// The root environment is created once per pass and is never popped, so
/// [`RegionStack::current`] is total. Depth strictly increases from root to
/// top.
#[derive(Debug, Clone)]
pub struct RegionStack {
    envs: Vec<ControlBlockEnvironment>,
}

impl RegionStack {
    pub fn new() -> Self {
        Self {
            envs: vec![ControlBlockEnvironment::root()],
        }
    }

    /// The innermost open environment (the root if nothing else is open).
    pub fn current(&self) -> &ControlBlockEnvironment {
        // Invariant: envs is never empty.
        self.envs.last().unwrap()
    }

    /// Opens a region of `kind` at the given 1-based source position.
    pub fn push(&mut self, kind: RegionKind, begin_line: u32, begin_column: u32) {
        let depth = self.current().depth + 1;
        self.envs.push(ControlBlockEnvironment {
            is_literal_region: kind.is_literal(),
            depth,
            last_open_kind: Some(kind),
            begin_line,
            begin_column,
        });
    }

    /// Closes the innermost region. The root is never popped.
    pub fn pop(&mut self) -> Option<ControlBlockEnvironment> {
        if self.envs.len() > 1 {
            self.envs.pop()
        } else {
            None
        }
    }

    /// Number of open regions, excluding the root.
    pub fn depth(&self) -> usize {
        self.envs.len() - 1
    }

    /// Open environments above the root, outermost first.
    pub fn open_regions(&self) -> impl Iterator<Item = &ControlBlockEnvironment> {
        self.envs.iter().skip(1)
    }
}

impl Default for RegionStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_always_present() {
        let mut stack = RegionStack::new();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current().last_open_kind, None);
        // Popping with only the root does nothing.
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn push_records_position_and_depth() {
        let mut stack = RegionStack::new();
        stack.push(RegionKind::Link, 3, 7);
        let top = stack.current();
        assert_eq!(top.last_open_kind, Some(RegionKind::Link));
        assert_eq!((top.begin_line, top.begin_column), (3, 7));
        assert_eq!(top.depth, 1);
        assert!(!top.is_literal_region);
    }

    #[test]
    fn literal_kinds_mark_the_environment() {
        let mut stack = RegionStack::new();
        stack.push(RegionKind::LiteralPre, 1, 1);
        assert!(stack.current().is_literal_region);
        stack.push(RegionKind::LiteralNoWiki, 1, 10);
        assert!(stack.current().is_literal_region);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn depth_strictly_increases_downward() {
        let mut stack = RegionStack::new();
        stack.push(RegionKind::TemplateRef, 1, 1);
        stack.push(RegionKind::ParserFunction, 1, 5);
        stack.push(RegionKind::Link, 2, 1);
        let depths: Vec<u32> = stack.open_regions().map(|e| e.depth).collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn pop_returns_the_closed_environment() {
        let mut stack = RegionStack::new();
        stack.push(RegionKind::Bold, 2, 4);
        let closed = stack.pop().unwrap();
        assert_eq!(closed.last_open_kind, Some(RegionKind::Bold));
        assert_eq!(stack.depth(), 0);
    }
}
