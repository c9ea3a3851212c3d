//! Conversion of escape sequences
//!
//! Every escape subtype falls into exactly one [`EscapeClass`]. The
//! classification is an exhaustive match, so a new [`EscapeKind`] does not
//! compile until someone decides how JavaScript should treat it.

use super::{Context, LiteralConverter, NodeConverter};
use crate::node::{EscapeKind, Node, NodeKind};

/// How an escape subtype is carried over to JavaScript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeClass {
    /// JavaScript spells it the same way; emit the source text verbatim
    Identity,
    /// An escaped plain character; re-escape it as a literal
    Delegate,
    /// No JavaScript equivalent; emit the source text and warn
    Unsupported,
}

impl EscapeClass {
    pub fn of(kind: EscapeKind) -> Self {
        match kind {
            EscapeKind::Backslash
            | EscapeKind::BeginningOfLine
            | EscapeKind::CarriageReturn
            | EscapeKind::Codepoint
            | EscapeKind::Dot
            | EscapeKind::EndOfLine
            | EscapeKind::FormFeed
            | EscapeKind::Hex
            | EscapeKind::IntervalOpen
            | EscapeKind::IntervalClose
            | EscapeKind::Newline
            | EscapeKind::Octal
            | EscapeKind::OneOrMore
            | EscapeKind::SetOpen
            | EscapeKind::SetClose
            | EscapeKind::Tab
            | EscapeKind::VerticalTab
            | EscapeKind::ZeroOrMore
            | EscapeKind::ZeroOrOne => EscapeClass::Identity,
            EscapeKind::Literal => EscapeClass::Delegate,
            EscapeKind::Backspace
            | EscapeKind::Bell
            | EscapeKind::EscapeChar
            | EscapeKind::HexWide
            | EscapeKind::CodepointList
            | EscapeKind::Control
            | EscapeKind::Meta
            | EscapeKind::MetaControl => EscapeClass::Unsupported,
        }
    }
}

/// Converter for `Escape` nodes
///
/// Escaped plain characters are handed to the [`LiteralConverter`] this
/// converter owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeConverter {
    literal: LiteralConverter,
}

impl EscapeConverter {
    /// Converter for escapes outside character sets
    pub const fn new() -> Self {
        EscapeConverter {
            literal: LiteralConverter::new(),
        }
    }

    /// Converter for escapes that are members of a character set
    pub const fn in_set() -> Self {
        EscapeConverter {
            literal: LiteralConverter::in_set(),
        }
    }
}

impl NodeConverter for EscapeConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let NodeKind::Escape(kind) = node.kind else {
            return node.data.clone();
        };
        match EscapeClass::of(kind) {
            EscapeClass::Identity => node.data.clone(),
            EscapeClass::Delegate => self.literal.escape(escaped_text(&node.data)),
            EscapeClass::Unsupported => {
                ctx.unsupported(node);
                node.data.clone()
            }
        }
    }
}

/// The escaped character itself: `\-` becomes `-`, bare text stays as is
fn escaped_text(data: &str) -> &str {
    data.strip_prefix('\\').unwrap_or(data)
}
