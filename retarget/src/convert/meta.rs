//! Converters for small node types: `.`, properties, `\K`, inline options
//! and free-spacing whitespace

use super::{Context, NodeConverter};
use crate::node::Node;

/// `.` means the same in both dialects (apart from which line terminators
/// it skips)
#[derive(Debug, Clone, Copy, Default)]
pub struct DotConverter;

impl NodeConverter for DotConverter {
    fn convert(&self, node: &Node, _ctx: &mut Context) -> String {
        node.data.clone()
    }
}

/// Ruby property names differ from JavaScript's and need the `u` flag
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyConverter;

impl NodeConverter for PropertyConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        ctx.unsupported(node);
        node.data.clone()
    }
}

/// `\K` has no JavaScript counterpart and is dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepConverter;

impl NodeConverter for KeepConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        ctx.unsupported(node);
        String::new()
    }
}

/// `(?i)` and friends; JavaScript flags apply to the whole pattern
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionSwitchConverter;

impl NodeConverter for OptionSwitchConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        ctx.unsupported(node);
        String::new()
    }
}

/// Whitespace and comments in extended mode carry no meaning
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpaceConverter;

impl NodeConverter for FreeSpaceConverter {
    fn convert(&self, _node: &Node, _ctx: &mut Context) -> String {
        String::new()
    }
}
