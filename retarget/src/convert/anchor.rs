//! Anchors and boundaries

use super::{Context, NodeConverter};
use crate::node::{AnchorKind, Node, NodeKind};

/// Converter for `Anchor` nodes
///
/// In Ruby `^` and `$` always match at line boundaries, so emitting either
/// one asks for the JavaScript `m` flag. String anchors become lookarounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorConverter;

impl NodeConverter for AnchorConverter {
    fn convert(&self, node: &Node, ctx: &mut Context) -> String {
        let NodeKind::Anchor(kind) = node.kind else {
            return node.data.clone();
        };
        match kind {
            AnchorKind::BeginningOfLine | AnchorKind::EndOfLine => {
                ctx.mark_line_anchor();
                node.data.clone()
            }
            AnchorKind::WordBoundary | AnchorKind::NonWordBoundary => node.data.clone(),
            AnchorKind::BeginningOfString => "(?<![\\s\\S])".to_string(),
            AnchorKind::EndOfString => "(?![\\s\\S])".to_string(),
            AnchorKind::EndOfStringOrBeforeNewline => "(?=\\n?(?![\\s\\S]))".to_string(),
            AnchorKind::MatchStart => {
                ctx.unsupported(node);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::options::Options;

    fn run(kind: AnchorKind, data: &str) -> (String, Context) {
        let mut ctx = Context::new(Options::default());
        let node = Node::leaf(NodeKind::Anchor(kind), data, Span::new(0, data.len()));
        (AnchorConverter.convert(&node, &mut ctx), ctx)
    }

    #[test]
    fn test_line_anchors_set_multiline_flag() {
        let (output, ctx) = run(AnchorKind::BeginningOfLine, "^");
        assert_eq!(output, "^");
        assert_eq!(ctx.flags(), "m");

        let (output, ctx) = run(AnchorKind::EndOfLine, "$");
        assert_eq!(output, "$");
        assert_eq!(ctx.flags(), "m");
    }

    #[test]
    fn test_string_anchors_become_lookarounds() {
        assert_eq!(run(AnchorKind::BeginningOfString, "\\A").0, "(?<![\\s\\S])");
        assert_eq!(run(AnchorKind::EndOfString, "\\z").0, "(?![\\s\\S])");
        assert_eq!(
            run(AnchorKind::EndOfStringOrBeforeNewline, "\\Z").0,
            "(?=\\n?(?![\\s\\S]))"
        );
        assert_eq!(run(AnchorKind::BeginningOfString, "\\A").1.flags(), "");
    }

    #[test]
    fn test_word_boundaries_pass() {
        let (output, ctx) = run(AnchorKind::WordBoundary, "\\b");
        assert_eq!(output, "\\b");
        assert!(ctx.diagnostics().is_empty());
        assert_eq!(run(AnchorKind::NonWordBoundary, "\\B").0, "\\B");
    }

    #[test]
    fn test_match_start_is_dropped() {
        let (output, ctx) = run(AnchorKind::MatchStart, "\\G");
        assert_eq!(output, "");
        assert_eq!(ctx.diagnostics().len(), 1);
    }
}
