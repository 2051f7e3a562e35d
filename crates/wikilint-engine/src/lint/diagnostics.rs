use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How severe a reported problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A reported structural problem with its source span (1-based lines and
/// columns, end column exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// Published diagnostics, grouped by the check that produced them.
///
/// Publication is idempotent and exclusive: a check replaces its own marker
/// set wholesale and never touches markers published by unrelated checks, so
/// re-validation cannot accumulate duplicates.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticStore {
    markers: BTreeMap<String, Vec<Diagnostic>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every marker previously published under `owner`.
    pub fn set_markers(&mut self, owner: &str, markers: Vec<Diagnostic>) {
        if markers.is_empty() {
            self.markers.remove(owner);
        } else {
            self.markers.insert(owner.to_owned(), markers);
        }
    }

    /// Markers published under `owner`, in publication order.
    pub fn markers(&self, owner: &str) -> &[Diagnostic] {
        self.markers.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All markers from all owners, grouped by owner.
    pub fn all_markers(&self) -> impl Iterator<Item = &Diagnostic> {
        self.markers.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diag(code: &str) -> Diagnostic {
        Diagnostic {
            code: code.to_owned(),
            message: "m".to_owned(),
            severity: Severity::Error,
            start_line: 1,
            start_column: 1,
            end_line: 1,
            end_column: 2,
        }
    }

    #[test]
    fn publication_replaces_own_markers_only() {
        let mut store = DiagnosticStore::new();
        store.set_markers("a", vec![diag("A1"), diag("A2")]);
        store.set_markers("b", vec![diag("B1")]);

        store.set_markers("a", vec![diag("A3")]);
        assert_eq!(store.markers("a"), &[diag("A3")]);
        assert_eq!(store.markers("b"), &[diag("B1")]);
    }

    #[test]
    fn empty_publication_clears() {
        let mut store = DiagnosticStore::new();
        store.set_markers("a", vec![diag("A1")]);
        store.set_markers("a", vec![]);
        assert!(store.markers("a").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn all_markers_spans_owners() {
        let mut store = DiagnosticStore::new();
        store.set_markers("b", vec![diag("B1")]);
        store.set_markers("a", vec![diag("A1")]);
        assert_eq!(store.all_markers().count(), 2);
    }
}
