//! Backreferences and subexpression calls

use super::{Context, NodeConverter};
use crate::diagnostic::Diagnostic;
use crate::node::{BackrefKind, Node, NodeKind};

/// Converter for `Backref` nodes
///
/// Relative references are resolved against the capture count at the point
/// of the reference, which is how Ruby numbers them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackrefConverter;

impl NodeConverter for BackrefConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let NodeKind::Backref(kind) = node.kind else {
            return node.data.clone();
        };
        match kind {
            BackrefKind::Number => match reference_name(&node.data) {
                Some(number) => numbered(number),
                None => node.data.clone(),
            },
            BackrefKind::Name => match reference_name(&node.data) {
                Some(name) => format!("\\k<{}>", name),
                None => node.data.clone(),
            },
            BackrefKind::NumberRelative => {
                let captures = ctx.capture_count();
                let resolved = reference_name(&node.data)
                    .and_then(|name| name.strip_prefix('-'))
                    .and_then(|offset| offset.parse::<u32>().ok())
                    .filter(|offset| (1..=captures).contains(offset))
                    .map(|offset| captures - offset + 1);
                match resolved {
                    Some(number) => numbered(number),
                    None => {
                        ctx.warn(Diagnostic::for_node(
                            node,
                            "relative backreference does not refer to a preceding group",
                        ));
                        node.data.clone()
                    }
                }
            }
            BackrefKind::NameRecursionLevel | BackrefKind::Call => {
                ctx.unsupported(node);
                node.data.clone()
            }
        }
    }
}

/// A rewritten `\\N`, grouped so that a following digit cannot extend it
fn numbered(number: impl std::fmt::Display) -> String {
    format!("(?:\\{})", number)
}

/// The text between the delimiters of `\k<..>`, `\k'..'` or `\g<..>`;
/// `None` for a plain `\1`
fn reference_name(data: &str) -> Option<&str> {
    let rest = data.strip_prefix("\\k").or_else(|| data.strip_prefix("\\g"))?;
    rest.strip_prefix('<')
        .and_then(|r| r.strip_suffix('>'))
        .or_else(|| rest.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::options::Options;
    use crate::parser::parse;

    fn convert_pattern(pattern: &str) -> (String, Context) {
        let tree = parse(pattern, &Options::default()).unwrap();
        let mut ctx = Context::new(Options::default());
        let output = convert(&tree, &mut ctx);
        (output, ctx)
    }

    #[test]
    fn test_reference_name() {
        assert_eq!(reference_name("\\k<word>"), Some("word"));
        assert_eq!(reference_name("\\k'word'"), Some("word"));
        assert_eq!(reference_name("\\g<-1>"), Some("-1"));
        assert_eq!(reference_name("\\1"), None);
    }

    #[test]
    fn test_numbered_and_named() {
        assert_eq!(convert_pattern("(a)\\1").0, "(a)\\1");
        assert_eq!(convert_pattern("(a)\\k<1>").0, "(a)(?:\\1)");
        assert_eq!(convert_pattern("(?<w>a)\\k<w>").0, "(?<w>a)\\k<w>");
        assert_eq!(convert_pattern("(?<w>a)\\k'w'").0, "(?<w>a)\\k<w>");
    }

    #[test]
    fn test_relative_reference_is_resolved() {
        let (output, ctx) = convert_pattern("(a)(b)\\k<-1>\\k<-2>");
        assert_eq!(output, "(a)(b)(?:\\2)(?:\\1)");
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_rewritten_reference_before_digit() {
        let (output, ctx) = convert_pattern("(a)\\k<1>0");
        assert_eq!(output, "(a)(?:\\1)0");
        assert!(ctx.diagnostics().is_empty());

        assert_eq!(convert_pattern("(a)\\k<-1>1").0, "(a)(?:\\1)1");
        assert_eq!(convert_pattern("(a)\\k<-1>+").0, "(a)(?:\\1)+");
    }

    #[test]
    fn test_relative_reference_before_first_group() {
        let (output, ctx) = convert_pattern("\\k<-1>(a)");
        assert_eq!(output, "\\k<-1>(a)");
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_calls_and_recursion_levels() {
        let (output, ctx) = convert_pattern("(?<w>a)\\g<w>\\k<w+0>");
        assert_eq!(output, "(?<w>a)\\g<w>\\k<w+0>");
        assert_eq!(ctx.diagnostics().len(), 2);
    }
}
