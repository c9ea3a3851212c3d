//! Transpiler for converting Ruby patterns to JavaScript
//!
//! This module walks a parsed tree with a fresh [`Context`] per pattern and
//! collects the converted text, the JavaScript flags and every diagnostic
//! into a [`Conversion`].

use std::fmt;
use std::num::NonZeroUsize;
use std::panic;
use std::thread;

use crate::convert::{Context, convert};
use crate::diagnostic::Diagnostic;
use crate::error::{Result, RetargetError};
use crate::node::{GroupKind, Node, NodeKind};
use crate::options::Options;
use crate::parser::parse;

/// The result of converting one pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// JavaScript pattern source, without slashes
    pub source: String,
    /// JavaScript flags, in `ims` order
    pub flags: String,
    /// Everything that could not be carried over, in pattern order
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// Render as a JavaScript regex literal, e.g. `/a+/m`
    pub fn to_literal(&self) -> String {
        // `//` would start a comment
        let source = if self.source.is_empty() {
            "(?:)"
        } else {
            &self.source
        };
        format!("/{}/{}", source, self.flags)
    }

    /// Whether the pattern was converted without any diagnostics
    pub fn is_lossless(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

/// Transpile a Ruby pattern to JavaScript
///
/// Constructs JavaScript cannot express are reported in
/// [`Conversion::diagnostics`]; only syntax errors in `pattern` fail.
///
/// # Example
/// ```
/// use retarget::{transpile, Options};
///
/// let result = transpile(r"\h+\z", &Options::default()).unwrap();
/// assert_eq!(result.source, "[0-9A-Fa-f]+(?![\\s\\S])");
/// assert!(result.is_lossless());
/// ```
pub fn transpile(pattern: &str, options: &Options) -> Result<Conversion> {
    let tree = parse(pattern, options)?;
    Ok(transpile_node(&tree, options))
}

/// Convert an already parsed tree
///
/// The children of a `Root` node are converted in order and their output
/// concatenated; any other node is converted on its own.
pub fn transpile_node(tree: &Node, options: &Options) -> Conversion {
    let mut ctx = Context::new(*options).with_named_groups(has_named_group(tree));
    let top_level = match tree.kind {
        NodeKind::Root => tree.children.as_slice(),
        _ => std::slice::from_ref(tree),
    };
    for node in top_level {
        let token = convert(node, &mut ctx);
        ctx.emit(token);
    }
    ctx.finish()
}

/// Like [`transpile`], but any diagnostic is an error
///
/// # Errors
/// Returns [`RetargetError::Unsupported`] with every diagnostic when the
/// conversion was not lossless.
pub fn transpile_strict(pattern: &str, options: &Options) -> Result<Conversion> {
    let conversion = transpile(pattern, options)?;
    if conversion.is_lossless() {
        Ok(conversion)
    } else {
        Err(RetargetError::Unsupported(conversion.diagnostics))
    }
}

/// Transpile many patterns in parallel
///
/// Results are returned in input order. Each pattern gets its own context,
/// so the result for a pattern is the same as from [`transpile`].
pub fn transpile_batch(patterns: &[&str], options: &Options) -> Vec<Result<Conversion>> {
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let chunk_size = patterns.len().div_ceil(workers).max(1);

    thread::scope(|scope| {
        let handles: Vec<_> = patterns
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|pattern| transpile(pattern, options))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect()
    })
}

/// Transpile with verbose output for debugging
pub fn transpile_debug(pattern: &str, options: &Options) -> Result<TranspileReport> {
    let tree = parse(pattern, options)?;
    let conversion = transpile_node(&tree, options);
    Ok(TranspileReport {
        input: pattern.to_string(),
        tree: tree.to_string(),
        conversion,
    })
}

/// Result of a transpilation with debug information
#[derive(Debug, Clone)]
pub struct TranspileReport {
    /// The original input pattern
    pub input: String,
    /// Outline of the parsed tree
    pub tree: String,
    /// The converted pattern
    pub conversion: Conversion,
}

impl fmt::Display for TranspileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transpilation Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "Input:  {}", self.input)?;
        writeln!(f, "Tree:")?;
        for line in self.tree.lines() {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f, "Output: {}", self.conversion)?;
        if self.conversion.diagnostics.is_empty() {
            writeln!(f, "Warnings: none")
        } else {
            writeln!(f, "Warnings:")?;
            for diagnostic in &self.conversion.diagnostics {
                writeln!(f, "  - {}", diagnostic)?;
            }
            Ok(())
        }
    }
}

fn has_named_group(node: &Node) -> bool {
    node.kind == NodeKind::Group(GroupKind::Named) || node.children.iter().any(has_named_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EscapeKind, QuantifierKind, QuantifierMode};

    fn transpile_default(pattern: &str) -> Conversion {
        transpile(pattern, &Options::default()).unwrap()
    }

    #[test]
    fn test_transpile_literals() {
        let result = transpile_default("abc");
        assert_eq!(result.source, "abc");
        assert_eq!(result.flags, "");
        assert!(result.is_lossless());
    }

    #[test]
    fn test_transpile_empty() {
        let result = transpile_default("");
        assert_eq!(result.source, "");
        assert_eq!(result.to_literal(), "/(?:)/");
    }

    #[test]
    fn test_transpile_escapes_end_to_end() {
        let result = transpile_default(r"\x41\*");
        assert_eq!(result.source, "\\x41\\*");
        assert!(result.is_lossless());

        let result = transpile_default(r"\a");
        assert_eq!(result.source, "\\a");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, NodeKind::Escape(EscapeKind::Bell));
    }

    #[test]
    fn test_transpile_hex_type() {
        let result = transpile_default(r"\h+");
        assert_eq!(result.source, "[0-9A-Fa-f]+");
        assert!(result.is_lossless());
    }

    #[test]
    fn test_transpile_possessive() {
        let result = transpile_default("a++");
        assert_eq!(result.source, "a+");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].kind,
            NodeKind::Quantifier(QuantifierKind::OneOrMore, QuantifierMode::Possessive)
        );
    }

    #[test]
    fn test_transpile_relative_backref() {
        let result = transpile_default(r"(?<y>a)\k<-1>");
        assert_eq!(result.source, "(?<y>a)(?:\\1)");
    }

    #[test]
    fn test_plain_group_next_to_named_group() {
        let result = transpile_default(r"(?<y>a)(b)\k<-1>");
        assert_eq!(result.source, "(?<y>a)(?:b)(?:\\1)");
    }

    #[test]
    fn test_flags() {
        assert_eq!(transpile_default("^a$").flags, "m");
        let options = Options::from_flags("mix").unwrap();
        let result = transpile("a . b", &options).unwrap();
        assert_eq!(result.source, "a.b");
        assert_eq!(result.flags, "is");
        assert_eq!(result.to_literal(), "/a.b/is");
    }

    #[test]
    fn test_transpile_error() {
        assert!(transpile("(abc", &Options::default()).is_err());
        assert!(transpile("[abc", &Options::default()).is_err());
    }

    #[test]
    fn test_transpile_strict() {
        assert!(transpile_strict("a+", &Options::default()).is_ok());
        match transpile_strict(r"\Ga\K", &Options::default()) {
            Err(RetargetError::Unsupported(diagnostics)) => assert_eq!(diagnostics.len(), 2),
            other => panic!("expected unsupported error, got {:?}", other),
        }
    }

    #[test]
    fn test_transpile_node_on_single_node() {
        let node = Node::escape(EscapeKind::Literal, "\\.");
        let result = transpile_node(&node, &Options::default());
        assert_eq!(result.source, "\\.");
    }

    #[test]
    fn test_transpile_batch_keeps_order() {
        let patterns = ["a+", "(", r"\h", "^x", r"\G"];
        let results = transpile_batch(&patterns, &Options::default());
        assert_eq!(results.len(), patterns.len());
        for (pattern, result) in patterns.iter().zip(&results) {
            assert_eq!(result, &transpile(pattern, &Options::default()));
        }
        assert!(transpile_batch(&[], &Options::default()).is_empty());
    }

    #[test]
    fn test_transpile_debug() {
        let report = transpile_debug(r"a\G", &Options::default()).unwrap();
        assert_eq!(report.input, "a\\G");
        assert_eq!(report.conversion.source, "a");
        let text = report.to_string();
        assert!(text.contains("Output: /a/"));
        assert!(text.contains("Anchor:match_start"));
        assert!(text.contains("match start anchor is not supported"));
    }
}
