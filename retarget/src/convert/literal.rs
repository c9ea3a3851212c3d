//! Escaping of literal text for JavaScript patterns

use super::{Context, NodeConverter};
use crate::node::Node;

/// Escapes literal characters so they match themselves in a JavaScript
/// pattern literal (`/.../`)
///
/// Escaping is total and never produces diagnostics. Text without
/// metacharacters comes back unchanged, so escaping such text twice is the
/// same as escaping it once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiteralConverter {
    in_set: bool,
}

impl LiteralConverter {
    /// Escaping for text outside character sets
    pub const fn new() -> Self {
        LiteralConverter { in_set: false }
    }

    /// Escaping for members of a character set
    pub const fn in_set() -> Self {
        LiteralConverter { in_set: true }
    }

    /// Escape `text`
    ///
    /// # Example
    /// ```
    /// use retarget::convert::LiteralConverter;
    ///
    /// let literal = LiteralConverter::new();
    /// assert_eq!(literal.escape("1+1=2"), "1\\+1=2");
    /// assert_eq!(literal.escape("a/b"), "a\\/b");
    /// ```
    pub fn escape(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            self.push_escaped(&mut out, c);
        }
        out
    }

    fn push_escaped(&self, out: &mut String, c: char) {
        match c {
            // line terminators may not appear raw inside a regex literal
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if self.is_special(c) => {
                out.push('\\');
                out.push(c);
            }
            c if !self.in_set && u32::from(c) > 0xFFFF => push_surrogate_pair(out, c),
            c => out.push(c),
        }
    }

    fn is_special(&self, c: char) -> bool {
        if self.in_set {
            matches!(c, '\\' | ']' | '[' | '^' | '-' | '/')
        } else {
            matches!(
                c,
                '\\' | '^'
                    | '$'
                    | '.'
                    | '|'
                    | '?'
                    | '*'
                    | '+'
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '/'
            )
        }
    }
}

/// Without the `u` flag a JavaScript pattern sees astral characters as two
/// code units; group them so a following quantifier covers both
fn push_surrogate_pair(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    let units = c.encode_utf16(&mut units);
    out.push_str("(?:");
    for unit in units.iter() {
        out.push_str(&format!("\\u{:04X}", unit));
    }
    out.push(')');
}

impl NodeConverter for LiteralConverter {
    fn convert(&self, node: &Node, _ctx: &mut Context) -> String {
        self.escape(&node.data)
    }
}
