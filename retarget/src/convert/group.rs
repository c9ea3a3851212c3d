//! Groups and conditionals

use super::{Context, NodeConverter, convert_children};
use crate::diagnostic::Diagnostic;
use crate::node::{GroupKind, Node, NodeKind};

/// Converter for `Group` nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupConverter;

impl NodeConverter for GroupConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let NodeKind::Group(kind) = node.kind else {
            return convert_children(node, ctx);
        };

        // diagnostics and capture numbers are assigned before the body
        let open = match kind {
            GroupKind::Capture if ctx.has_named_groups() => "(?:".to_string(),
            GroupKind::Capture => {
                ctx.open_capture();
                node.data.clone()
            }
            GroupKind::Named => {
                ctx.open_capture();
                named_group_open(&node.data)
            }
            GroupKind::NonCapture
            | GroupKind::Lookahead
            | GroupKind::NegativeLookahead
            | GroupKind::Lookbehind
            | GroupKind::NegativeLookbehind => node.data.clone(),
            GroupKind::Atomic | GroupKind::Options => {
                ctx.unsupported(node);
                "(?:".to_string()
            }
            GroupKind::Absence => {
                ctx.warn(Diagnostic::for_node(
                    node,
                    "absence operator is not supported in JavaScript, \
                     approximated with a negative lookahead",
                ));
                let body = convert_children(node, ctx);
                return format!("(?:(?!{})[\\s\\S])*", body);
            }
            GroupKind::Comment => return String::new(),
        };
        let body = convert_children(node, ctx);
        format!("{}{})", open, body)
    }
}

/// `(?'name'` becomes `(?<name>`; `(?<name>` is kept
fn named_group_open(data: &str) -> String {
    match data
        .strip_prefix("(?'")
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(name) => format!("(?<{}>", name),
        None => data.to_string(),
    }
}

/// Converter for `(?(cond)yes|no)`
///
/// JavaScript cannot test whether a group matched, so both branches are
/// kept as a plain alternation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalConverter;

impl NodeConverter for ConditionalConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        ctx.unsupported(node);
        format!("(?:{})", convert_children(node, ctx))
    }
}
