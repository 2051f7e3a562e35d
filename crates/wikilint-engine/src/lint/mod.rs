//! Structural validation and diagnostic publication.
//!
//! [`linter::StructuralLinter`] re-checks region nesting line by line and
//! reports what the tokenizer silently tolerates; [`diagnostics`] holds the
//! resulting markers grouped by the check that published them.

pub mod diagnostics;
pub mod linter;

pub use diagnostics::{Diagnostic, DiagnosticStore, Severity};
pub use linter::StructuralLinter;
