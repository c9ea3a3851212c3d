//! Quantifiers

use super::{Context, NodeConverter, convert};
use crate::diagnostic::Diagnostic;
use crate::node::{GroupKind, Node, NodeKind, QuantifierKind, QuantifierMode};

/// Converter for `Quantifier` nodes
///
/// The quantified child is converted first and the quantifier text is
/// appended. Possessive quantifiers lose their `+` and become greedy.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantifierConverter;

impl NodeConverter for QuantifierConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let NodeKind::Quantifier(kind, mode) = node.kind else {
            return node.data.clone();
        };

        let mut quantifier = node.data.clone();
        if mode == QuantifierMode::Possessive {
            ctx.warn(Diagnostic::for_node(
                node,
                "possessive quantifiers are not supported in JavaScript, using a greedy one",
            ));
            quantifier.pop();
        }
        if kind == QuantifierKind::Interval && quantifier.starts_with("{,") {
            quantifier.insert(1, '0');
        }

        let Some(child) = node.children.first() else {
            return String::new();
        };
        let target = convert(child, ctx);
        if target.is_empty() {
            // nothing left to repeat
            return String::new();
        }
        match child.kind {
            // `a**` is valid Ruby but a syntax error in JavaScript, and the
            // absence approximation already ends in `*`
            NodeKind::Quantifier(..) | NodeKind::Group(GroupKind::Absence) => {
                format!("(?:{}){}", target, quantifier)
            }
            _ => target + &quantifier,
        }
    }
}
