//! Character sets

use super::types::HEX_DIGITS;
use super::{CharTypeConverter, Context, EscapeConverter, LiteralConverter, NodeConverter};
use crate::diagnostic::Diagnostic;
use crate::node::{CharTypeKind, Node, NodeKind, SetKind};

/// Converter for `Set` nodes and their members
///
/// JavaScript has no nested sets, intersections or POSIX brackets. Nested
/// non-negated sets are flattened into the parent, which is an exact union;
/// POSIX classes are spelled out with their ASCII members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetConverter {
    literal: LiteralConverter,
    escape: EscapeConverter,
    char_type: CharTypeConverter,
}

impl SetConverter {
    pub const fn new() -> Self {
        SetConverter {
            literal: LiteralConverter::in_set(),
            escape: EscapeConverter::in_set(),
            char_type: CharTypeConverter::in_set(),
        }
    }

    fn convert_members(&self, members: &[Node], ctx: &mut Context) -> String {
        members
            .iter()
            .map(|member| self.convert_member(member, ctx))
            .collect()
    }

    fn convert_member(&self, node: &Node, ctx: &mut Context) -> String {
        match node.kind {
            NodeKind::Literal => self.convert_literal(node, ctx),
            NodeKind::Escape(_) => self.escape.convert(node, ctx),
            NodeKind::CharType(_) => self.char_type.convert(node, ctx),
            NodeKind::Set(SetKind::Range) => {
                let bounds: Vec<String> = node
                    .children
                    .iter()
                    .map(|bound| self.convert_member(bound, ctx))
                    .collect();
                bounds.join("-")
            }
            NodeKind::Set(SetKind::Posix) => convert_posix(node, ctx),
            NodeKind::Set(SetKind::Set) => self.convert_members(&node.children, ctx),
            NodeKind::Set(SetKind::Intersection) => {
                ctx.warn(Diagnostic::for_node(
                    node,
                    "set intersection is not supported in JavaScript, keeping the left operand",
                ));
                match node.children.first() {
                    Some(left) => self.convert_members(&left.children, ctx),
                    None => String::new(),
                }
            }
            NodeKind::Set(SetKind::NegatedSet | SetKind::NegatedPosix) => {
                ctx.unsupported(node);
                String::new()
            }
            _ => super::convert(node, ctx),
        }
    }

    fn convert_literal(&self, node: &Node, ctx: &mut Context) -> String {
        if node.data.chars().any(|c| u32::from(c) > 0xFFFF) {
            ctx.warn(Diagnostic::for_node(
                node,
                "characters above U+FFFF cannot be set members in JavaScript without the u flag",
            ));
        }
        self.literal.escape(&node.data)
    }
}

impl NodeConverter for SetConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let open = match node.kind {
            NodeKind::Set(SetKind::Set) => "[",
            NodeKind::Set(SetKind::NegatedSet) => "[^",
            _ => return self.convert_member(node, ctx),
        };
        if node.kind == NodeKind::Set(SetKind::NegatedSet)
            && let [only] = node.children.as_slice()
            && let Some(members) = cancel_negation(only, ctx)
        {
            return format!("[{}]", members);
        }
        let members = self.convert_members(&node.children, ctx);
        if members.is_empty() {
            // every member was dropped, and `[^]` would match anything
            return "(?!)".to_string();
        }
        format!("{}{}]", open, members)
    }
}

/// The positive members for the only member of a negated set, when that
/// member is itself negated: `[^\H]` is `[0-9A-Fa-f]`
fn cancel_negation(member: &Node, ctx: &mut Context) -> Option<String> {
    match member.kind {
        NodeKind::CharType(CharTypeKind::NonHex) => Some(HEX_DIGITS.to_string()),
        NodeKind::Set(SetKind::NegatedPosix) => {
            let members = convert_posix(member, ctx);
            (!members.is_empty()).then_some(members)
        }
        _ => None,
    }
}

/// ASCII members of a POSIX bracket class, already escaped for a set
fn posix_members(name: &str) -> Option<&'static str> {
    let members = match name {
        "alnum" => "a-zA-Z0-9",
        "alpha" => "a-zA-Z",
        "blank" => " \\t",
        "cntrl" => "\\x00-\\x1F\\x7F",
        "digit" => "0-9",
        "graph" => "!-~",
        "lower" => "a-z",
        "print" => " -~",
        "punct" => "!-\\/:-@\\[-`{-~",
        "space" => " \\t\\n\\v\\f\\r",
        "upper" => "A-Z",
        "word" => "\\w",
        "xdigit" => "0-9A-Fa-f",
        _ => return None,
    };
    Some(members)
}

fn convert_posix(node: &Node, ctx: &mut Context) -> String {
    let name = node
        .data
        .trim_start_matches("[:")
        .trim_start_matches('^')
        .trim_end_matches(":]");
    let Some(members) = posix_members(name) else {
        ctx.warn(Diagnostic::for_node(node, format!("unknown POSIX class '{}'", name)));
        return String::new();
    };
    // Ruby matches non-ASCII letters and digits here too
    if name != "xdigit" {
        ctx.warn(Diagnostic::for_node(
            node,
            format!("POSIX class '{}' is narrowed to ASCII in JavaScript", name),
        ));
    }
    members.to_string()
}
