//! Diagnostics for constructs that JavaScript cannot express
//!
//! A [`Diagnostic`] records one source construct that was converted on a
//! best-effort basis (or dropped). Diagnostics never stop a conversion; they
//! are collected in a [`Diagnostics`] list owned by the run and handed back
//! with the converted pattern.

use std::fmt;

use crate::error::Span;
use crate::node::{Node, NodeKind};

/// One construct that could not be carried over faithfully
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Type and subtype of the offending node
    pub kind: NodeKind,
    /// Raw source text of the node
    pub data: String,
    /// Location of the node in the source pattern
    pub span: Span,
    /// What could not be preserved
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with a custom message
    pub fn new(
        kind: NodeKind,
        data: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            kind,
            data: data.into(),
            span,
            message: message.into(),
        }
    }

    /// The standard "not supported" diagnostic for a node kind
    pub fn unsupported(kind: NodeKind, data: impl Into<String>, span: Span) -> Self {
        let subtype = kind.subtype_name().replace('_', " ");
        let type_name = kind.node_type().name();
        let message = if subtype == type_name {
            format!("{} is not supported in JavaScript", subtype)
        } else {
            format!("{} {} is not supported in JavaScript", subtype, type_name)
        };
        Diagnostic::new(kind, data, span, message)
    }

    /// Diagnostic for `node` with a custom message
    pub fn for_node(node: &Node, message: impl Into<String>) -> Self {
        Diagnostic::new(node.kind, node.data.clone(), node.span, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.message, self.data, self.span)
    }
}

/// Append-only list of diagnostics for a single conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Record a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Record the standard "not supported" diagnostic for `node`
    pub fn unsupported(&mut self, node: &Node) {
        self.push(Diagnostic::unsupported(node.kind, node.data.clone(), node.span));
    }

    /// Number of diagnostics recorded so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in recording order
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Consume the collector
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EscapeKind, GroupKind};

    #[test]
    fn test_unsupported_message() {
        let diag = Diagnostic::unsupported(
            NodeKind::Escape(EscapeKind::Backspace),
            "\\b",
            Span::new(1, 3),
        );
        assert_eq!(diag.message, "backspace escape is not supported in JavaScript");
        assert_eq!(
            diag.to_string(),
            "backspace escape is not supported in JavaScript '\\b' at 1..3"
        );
    }

    #[test]
    fn test_unsupported_message_group() {
        let diag = Diagnostic::unsupported(
            NodeKind::Group(GroupKind::Atomic),
            "(?>",
            Span::new(0, 3),
        );
        assert_eq!(diag.message, "atomic group is not supported in JavaScript");
    }

    #[test]
    fn test_unsupported_message_without_subtype() {
        let diag = Diagnostic::unsupported(NodeKind::Keep, "\\K", Span::new(0, 2));
        assert_eq!(diag.message, "keep is not supported in JavaScript");
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.unsupported(&Node::escape(EscapeKind::Bell, "\\a"));
        diagnostics.unsupported(&Node::escape(EscapeKind::Control, "\\cA"));

        assert_eq!(diagnostics.len(), 2);
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Escape(EscapeKind::Bell),
                NodeKind::Escape(EscapeKind::Control)
            ]
        );
    }

    #[test]
    fn test_for_node_copies_location() {
        let node = Node::escape(EscapeKind::HexWide, "\\x{41}");
        let diag = Diagnostic::for_node(&node, "custom");
        assert_eq!(diag.data, "\\x{41}");
        assert_eq!(diag.span, Span::new(0, 6));
        assert_eq!(diag.message, "custom");
    }
}
