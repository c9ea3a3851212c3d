//! Node-to-string conversion
//!
//! Each node type has one converter. [`convert`] is the registry: a single
//! exhaustive `match` that routes a node to the converter for its type.
//! Converters for container nodes (groups, sets, quantifiers, ...) call back
//! into [`convert`] for their children, so a whole tree is converted
//! depth-first, left to right.
//!
//! Every converter follows the same policy for each subtype it sees:
//! pass the source text through when JavaScript spells the construct the
//! same way, rewrite it when JavaScript has an equivalent spelled
//! differently, and otherwise record a [`Diagnostic`](crate::Diagnostic)
//! and emit a best-effort fallback. Conversion itself never fails.

mod anchor;
mod backref;
mod context;
mod escape;
mod group;
mod literal;
mod meta;
mod quantifier;
mod set;
mod types;

pub use anchor::AnchorConverter;
pub use backref::BackrefConverter;
pub use context::Context;
pub use escape::{EscapeClass, EscapeConverter};
pub use group::{ConditionalConverter, GroupConverter};
pub use literal::LiteralConverter;
pub use meta::{
    DotConverter, FreeSpaceConverter, KeepConverter, OptionSwitchConverter, PropertyConverter,
};
pub use quantifier::QuantifierConverter;
pub use set::SetConverter;
pub use types::CharTypeConverter;

use crate::node::{Node, NodeType};

/// A converter for one node type
pub trait NodeConverter {
    /// Convert `node` to JavaScript pattern text, recording diagnostics in
    /// `ctx` for anything that cannot be carried over
    fn convert(&self, node: &Node, ctx: &mut Context) -> String;
}

const LITERAL: LiteralConverter = LiteralConverter::new();
const ESCAPE: EscapeConverter = EscapeConverter::new();
const CHAR_TYPE: CharTypeConverter = CharTypeConverter::new();
const SET: SetConverter = SetConverter::new();

/// Convert a node (and, through it, its subtree)
pub fn convert(node: &Node, ctx: &mut Context) -> String {
    match node.node_type() {
        NodeType::Root | NodeType::Sequence => convert_children(node, ctx),
        NodeType::Alternation => {
            let alternatives: Vec<String> =
                node.children.iter().map(|n| convert(n, ctx)).collect();
            alternatives.join("|")
        }
        NodeType::Literal => LITERAL.convert(node, ctx),
        NodeType::Meta => DotConverter.convert(node, ctx),
        NodeType::Anchor => AnchorConverter.convert(node, ctx),
        NodeType::Escape => ESCAPE.convert(node, ctx),
        NodeType::CharType => CHAR_TYPE.convert(node, ctx),
        NodeType::Property => PropertyConverter.convert(node, ctx),
        NodeType::Backref => BackrefConverter.convert(node, ctx),
        NodeType::Group => GroupConverter.convert(node, ctx),
        NodeType::OptionSwitch => OptionSwitchConverter.convert(node, ctx),
        NodeType::Conditional => ConditionalConverter.convert(node, ctx),
        NodeType::Keep => KeepConverter.convert(node, ctx),
        NodeType::Quantifier => QuantifierConverter.convert(node, ctx),
        NodeType::Set => SET.convert(node, ctx),
        NodeType::FreeSpace => FreeSpaceConverter.convert(node, ctx),
    }
}

/// Convert every child of `node` and concatenate the results
pub fn convert_children(node: &Node, ctx: &mut Context) -> String {
    node.children.iter().map(|child| convert(child, ctx)).collect()
}
