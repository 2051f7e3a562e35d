//! Document text access.
//!
//! The engine reads host text only through the [`TextModel`] trait: a line
//! count and per-line content, 1-based. That is the entire collaborator
//! surface — the engine never touches editor state, network endpoints, or
//! storage. [`RopeModel`] is the bundled implementation, backed by an
//! `xi_rope::Rope` with line spans computed once at construction.

pub mod lines;
pub mod span;

use std::path::{Path, PathBuf};

use xi_rope::Rope;

use lines::{content_len, lines_with_spans};
use span::Span;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only line access to a document, 1-based.
pub trait TextModel {
    /// Number of lines in the document.
    fn line_count(&self) -> u32;

    /// Content of line `line` (1-based) without its line terminator, or
    /// `None` if the line does not exist.
    fn line_content(&self, line: u32) -> Option<String>;
}

/// An owned document snapshot over an `xi_rope::Rope`.
#[derive(Debug, Clone)]
pub struct RopeModel {
    rope: Rope,
    /// Per-line spans including terminators, in document order.
    line_spans: Vec<Span>,
}

impl RopeModel {
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from(text);
        let line_spans = lines_with_spans(&rope).map(|l| l.span).collect();
        Self { rope, line_spans }
    }

    pub fn from_path(path: &Path) -> Result<Self, TextError> {
        if !path.exists() {
            return Err(TextError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// The full document text.
    pub fn text(&self) -> String {
        String::from(&self.rope)
    }

    fn line_str(&self, span: Span) -> String {
        self.rope.slice_to_cow(span.start..span.end).into_owned()
    }
}

impl TextModel for RopeModel {
    fn line_count(&self) -> u32 {
        self.line_spans.len() as u32
    }

    fn line_content(&self, line: u32) -> Option<String> {
        let span = *self.line_spans.get(line.checked_sub(1)? as usize)?;
        let raw = self.line_str(span);
        let len = content_len(&raw);
        let mut content = raw;
        content.truncate(len);
        Some(content)
    }
}
