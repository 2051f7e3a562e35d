//! # Lexical scanning
//!
//! Classifies wikitext markup into typed spans for syntax highlighting and
//! embedded-language handoff.
//!
//! ## Architecture
//!
//! - **`cursor`**: byte cursor with position tracking
//! - **`kinds`**: per-construct delimiter constants and tag classification
//! - **`token`**: [`Token`], [`TokenClass`], [`BracketRole`]
//! - **`scanner`**: the state-stack machine and [`tokenize`] entry point
//!
//! The scanner is pull-based and side-effect-free: the host tokenizes any
//! snapshot on demand (for example per visible range) and renders the spans
//! it gets back. Region nesting follows the shared model in
//! [`crate::region`]; literal regions (`<pre>`, `<nowiki>`) suppress all
//! other recognition until their closer, and `<script>`/`<style>` bodies are
//! tagged with the language identifier a registered embedded lexer should
//! take over.

pub mod cursor;
pub mod kinds;
pub mod scanner;
pub mod token;

pub use scanner::{Tokenizer, tokenize};
pub use token::{BracketRole, Token, TokenClass};
