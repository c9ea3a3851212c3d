//! Character type shorthands (`\d`, `\h`, `\R`, ...)

use super::{Context, NodeConverter};
use crate::diagnostic::Diagnostic;
use crate::node::{CharTypeKind, Node, NodeKind};

pub(super) const HEX_DIGITS: &str = "0-9A-Fa-f";
const LINEBREAK: &str = "(?:\\r\\n|[\\n\\v\\f\\r\\u0085\\u2028\\u2029])";

/// Converter for `CharType` nodes
///
/// Inside a set the output must be a set member, so `\h` loses its brackets
/// and `\R`, `\X` and `\H` cannot be expressed at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharTypeConverter {
    in_set: bool,
}

impl CharTypeConverter {
    pub const fn new() -> Self {
        CharTypeConverter { in_set: false }
    }

    pub const fn in_set() -> Self {
        CharTypeConverter { in_set: true }
    }
}

impl NodeConverter for CharTypeConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let NodeKind::CharType(kind) = node.kind else {
            return node.data.clone();
        };
        match kind {
            CharTypeKind::Digit
            | CharTypeKind::NonDigit
            | CharTypeKind::Word
            | CharTypeKind::NonWord
            | CharTypeKind::Space
            | CharTypeKind::NonSpace => node.data.clone(),
            CharTypeKind::Hex if self.in_set => HEX_DIGITS.to_string(),
            CharTypeKind::Hex => format!("[{}]", HEX_DIGITS),
            CharTypeKind::NonHex if self.in_set => {
                ctx.unsupported(node);
                String::new()
            }
            CharTypeKind::NonHex => format!("[^{}]", HEX_DIGITS),
            CharTypeKind::Linebreak | CharTypeKind::ExtendedGrapheme if self.in_set => {
                ctx.unsupported(node);
                String::new()
            }
            CharTypeKind::Linebreak => LINEBREAK.to_string(),
            CharTypeKind::ExtendedGrapheme => {
                ctx.warn(Diagnostic::for_node(
                    node,
                    "extended grapheme clusters are not supported in JavaScript, \
                     matching a single character instead",
                ));
                "[\\s\\S]".to_string()
            }
        }
    }
}
