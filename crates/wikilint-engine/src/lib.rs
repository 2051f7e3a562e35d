//! Wikitext markup analysis: a lexical tokenizer and a structural linter
//! over a line-oriented document model.
//!
//! The tokenizer ([`scan`]) classifies every byte of a document into tokens,
//! tracking nested regions (links, templates, quotes, literal blocks,
//! embedded script/style) with a pushdown state machine. The linter
//! ([`lint`]) independently re-validates region nesting and publishes
//! diagnostics for the malformed input the tokenizer tolerates. Both share
//! the region model in [`region`], and both read documents only through the
//! [`text::TextModel`] trait.

pub mod lint;
pub mod region;
pub mod scan;
pub mod text;

pub use lint::{Diagnostic, DiagnosticStore, Severity, StructuralLinter};
pub use region::{ControlBlockEnvironment, RegionKind, RegionStack};
pub use scan::{BracketRole, Token, TokenClass, Tokenizer, tokenize};
pub use text::{RopeModel, TextError, TextModel};
