//! Region-nesting validation.
//!
//! Walks the document one line at a time, re-evaluating region transitions on
//! its own [`RegionStack`] so malformed input the tokenizer tolerates still
//! produces accurate diagnostics. Only three region groups matter here:
//! literal regions (`<pre>`/`<nowiki>`), which suppress everything until
//! their closer and may cross lines, and link regions, which may not.

use std::sync::OnceLock;

use regex::Regex;

use crate::region::{RegionKind, RegionStack};
use crate::text::TextModel;

use super::diagnostics::{Diagnostic, DiagnosticStore, Severity};

const CODE_UNCLOSED_LINK: &str = "MW1004";
const MSG_UNCLOSED_LINK: &str = "Link reference block is not closed.";
const CODE_NESTED_LINK: &str = "MW1005";
const MSG_NESTED_LINK: &str = "Cannot include nested link.";
const CODE_UNCLOSED_LITERAL: &str = "MW1006";
const MSG_UNCLOSED_LITERAL: &str = "Literal block is not closed.";

fn nowiki_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<nowiki\s*>").expect("invalid nowiki-open regex"))
}

fn nowiki_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</nowiki\s*>").expect("invalid nowiki-close regex"))
}

fn pre_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<pre\s*>").expect("invalid pre-open regex"))
}

fn pre_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</pre\s*>").expect("invalid pre-close regex"))
}

/// Validates region nesting across a document snapshot.
///
/// A validation pass owns a freshly constructed stack, runs to completion,
/// and returns its diagnostics; nothing is shared between passes, so
/// re-validation is idempotent. The borrowed [`TextModel`] is the only host
/// data the linter reads.
pub struct StructuralLinter<'a, M: TextModel + ?Sized> {
    model: &'a M,
}

impl<'a, M: TextModel + ?Sized> StructuralLinter<'a, M> {
    /// Identifier this linter publishes markers under.
    pub const OWNER_ID: &'static str = "structural-linter";

    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// Runs one validation pass over the whole document.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut stack = RegionStack::new();
        let mut diagnostics = Vec::new();

        for line in 1..=self.model.line_count() {
            let Some(content) = self.model.line_content(line) else {
                continue;
            };
            if content.is_empty() {
                continue;
            }

            let aborted = self.validate_line(&content, line, &mut stack, &mut diagnostics);

            // Links cannot survive past the line they opened on.
            if !aborted && stack.current().last_open_kind == Some(RegionKind::Link) {
                let env = *stack.current();
                diagnostics.push(Diagnostic {
                    code: CODE_UNCLOSED_LINK.to_owned(),
                    message: MSG_UNCLOSED_LINK.to_owned(),
                    severity: Severity::Error,
                    start_line: env.begin_line,
                    start_column: env.begin_column,
                    end_line: line,
                    end_column: content.len() as u32 + 1,
                });
                stack.pop();
            }
        }

        // Literal regions may cross lines, but not the end of the document.
        let last_line = self.model.line_count();
        let last_column = self
            .model
            .line_content(last_line)
            .map(|l| l.len() as u32 + 1)
            .unwrap_or(1);
        let unclosed: Vec<_> = stack.open_regions().copied().collect();
        for env in unclosed {
            if env.is_literal_region {
                diagnostics.push(Diagnostic {
                    code: CODE_UNCLOSED_LITERAL.to_owned(),
                    message: MSG_UNCLOSED_LITERAL.to_owned(),
                    severity: Severity::Warning,
                    start_line: env.begin_line,
                    start_column: env.begin_column,
                    end_line: last_line,
                    end_column: last_column,
                });
            }
        }

        diagnostics
    }

    /// Runs a pass and publishes the result, replacing this linter's previous
    /// markers while leaving other checks' markers alone. Returns the number
    /// of diagnostics published.
    pub fn publish(&self, store: &mut DiagnosticStore) -> usize {
        let diagnostics = self.validate();
        let count = diagnostics.len();
        store.set_markers(Self::OWNER_ID, diagnostics);
        count
    }

    /// Scans one line left to right with an explicit offset accumulator.
    /// Every dispatched match consumes at least its own length, so the loop
    /// terminates for any input. Returns true if the line was aborted by a
    /// nested-link error.
    fn validate_line(
        &self,
        content: &str,
        line: u32,
        stack: &mut RegionStack,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        let mut offset = 0usize;

        while offset < content.len() {
            let rest = &content[offset..];
            let top = *stack.current();

            if top.is_literal_region {
                // Only the literal region's own closer is recognized; the
                // rest of the line is inert if it never appears.
                let closer = match top.last_open_kind {
                    Some(RegionKind::LiteralNoWiki) => nowiki_close(),
                    _ => pre_close(),
                };
                match closer.find(rest) {
                    Some(m) => {
                        stack.pop();
                        offset += m.end();
                    }
                    None => return false,
                }
                continue;
            }

            let Some((start, end, kind)) = first_match(rest) else {
                return false;
            };
            let column = (offset + start) as u32 + 1;

            match kind {
                RegionKind::LiteralNoWiki | RegionKind::LiteralPre => {
                    stack.push(kind, line, column);
                }
                RegionKind::Link => {
                    if top.last_open_kind == Some(RegionKind::Link) {
                        diagnostics.push(Diagnostic {
                            code: CODE_NESTED_LINK.to_owned(),
                            message: MSG_NESTED_LINK.to_owned(),
                            severity: Severity::Error,
                            start_line: line,
                            start_column: column,
                            end_line: line,
                            end_column: (offset + end) as u32 + 1,
                        });
                        // The line is abandoned; discard the enclosing link
                        // so it is reported exactly once.
                        stack.pop();
                        return true;
                    }
                    stack.push(RegionKind::Link, line, column);
                }
                _ => {
                    // An unmatched `]]` with no open link is ignored.
                    if top.last_open_kind == Some(RegionKind::Link) {
                        stack.pop();
                    }
                }
            }

            offset += end;
        }

        false
    }
}

/// Finds the leftmost of {literal-region open, link open, link close} in
/// `rest`. The patterns are mutually exclusive at any offset, so leftmost is
/// unambiguous.
fn first_match(rest: &str) -> Option<(usize, usize, RegionKind)> {
    let mut best: Option<(usize, usize, RegionKind)> = None;

    let candidates = [
        (
            nowiki_open().find(rest).map(|m| (m.start(), m.end())),
            RegionKind::LiteralNoWiki,
        ),
        (
            pre_open().find(rest).map(|m| (m.start(), m.end())),
            RegionKind::LiteralPre,
        ),
        (
            rest.find("[[").map(|i| (i, i + 2)),
            RegionKind::Link,
        ),
        (
            rest.find("]]").map(|i| (i, i + 2)),
            RegionKind::LinkEnd,
        ),
    ];

    for (found, kind) in candidates {
        if let Some((start, end)) = found
            && best.is_none_or(|(s, _, _)| start < s)
        {
            best = Some((start, end, kind));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::RopeModel;
    use pretty_assertions::assert_eq;

    fn lint(text: &str) -> Vec<Diagnostic> {
        let model = RopeModel::from_text(text);
        StructuralLinter::new(&model).validate()
    }

    #[test]
    fn balanced_link_on_one_line_is_clean() {
        assert_eq!(lint("see [[Main Page]] for details"), vec![]);
        assert_eq!(lint("[[a]] text [[b|alias]]"), vec![]);
    }

    #[test]
    fn nested_link_is_exactly_one_error() {
        let diags = lint("[[A[[B]]");
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.code, "MW1005");
        assert_eq!(d.severity, Severity::Error);
        // Anchored at the second `[[` (byte offset 3, 1-based column 4).
        assert_eq!((d.start_line, d.start_column), (1, 4));
        assert_eq!((d.end_line, d.end_column), (1, 6));
    }

    #[test]
    fn unterminated_link_spans_to_line_end() {
        let diags = lint("[[unterminated");
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.code, "MW1004");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!((d.start_line, d.start_column), (1, 1));
        assert_eq!((d.end_line, d.end_column), (1, 15));
    }

    #[test]
    fn unterminated_link_is_anchored_at_its_opener() {
        let diags = lint("text before [[open");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_column, 13);
    }

    #[test]
    fn links_do_not_leak_across_lines() {
        // Each line is checked on its own; a `]]` on the next line does not
        // rescue the previous line's link.
        let diags = lint("[[open\n]]closed");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "MW1004");
        assert_eq!(diags[0].start_line, 1);
    }

    #[test]
    fn literal_region_suppresses_link_recognition() {
        assert_eq!(lint("<pre>[[not-a-link]]</pre>"), vec![]);
        assert_eq!(lint("<nowiki>[[A[[B]]</nowiki>"), vec![]);
    }

    #[test]
    fn literal_region_carries_across_lines() {
        let text = "<nowiki>\n[[inert\nstill inert\n</nowiki>\n[[open";
        let diags = lint(text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "MW1004");
        assert_eq!(diags[0].start_line, 5);
    }

    #[test]
    fn literal_regions_are_case_insensitive() {
        assert_eq!(lint("<NoWiki>[[x</NOWIKI  >"), vec![]);
    }

    #[test]
    fn unclosed_literal_warns_at_end_of_document() {
        let diags = lint("intro\n<pre>\nnever closed");
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.code, "MW1006");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!((d.start_line, d.start_column), (2, 1));
        assert_eq!((d.end_line, d.end_column), (3, 13));
    }

    #[test]
    fn unmatched_close_is_ignored() {
        assert_eq!(lint("a]]b"), vec![]);
        assert_eq!(lint("]] ]] ]]"), vec![]);
    }

    #[test]
    fn link_closed_after_literal_detour() {
        assert_eq!(lint("[[x<nowiki>y]]z</nowiki>w]]"), vec![]);
    }

    #[test]
    fn repeated_validation_is_idempotent() {
        let model = RopeModel::from_text("[[a\n[[b[[c]]\nfine");
        let linter = StructuralLinter::new(&model);
        let first = linter.validate();
        let second = linter.validate();
        assert_eq!(first, second);
    }

    #[test]
    fn publication_replaces_previous_markers() {
        let model = RopeModel::from_text("[[a");
        let linter = StructuralLinter::new(&model);
        let mut store = DiagnosticStore::new();

        let published = linter.publish(&mut store);
        assert_eq!(published, 1);
        linter.publish(&mut store);
        assert_eq!(
            store.markers(StructuralLinter::<RopeModel>::OWNER_ID).len(),
            1
        );
    }

    #[test]
    fn publication_does_not_clobber_other_owners() {
        let model = RopeModel::from_text("[[a");
        let linter = StructuralLinter::new(&model);
        let mut store = DiagnosticStore::new();
        store.set_markers(
            "spell-check",
            vec![Diagnostic {
                code: "SP1".to_owned(),
                message: "typo".to_owned(),
                severity: Severity::Warning,
                start_line: 1,
                start_column: 1,
                end_line: 1,
                end_column: 2,
            }],
        );

        linter.publish(&mut store);
        assert_eq!(store.markers("spell-check").len(), 1);
        assert_eq!(store.all_markers().count(), 2);
    }

    #[test]
    fn empty_document_is_clean() {
        assert_eq!(lint(""), vec![]);
        assert_eq!(lint("\n\n\n"), vec![]);
    }
}
