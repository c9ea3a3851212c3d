//! Retarget Core Library
//!
//! Converts Ruby (Onigmo) regular expressions to JavaScript (ECMAScript)
//! patterns. Constructs JavaScript can express are rewritten; everything
//! else is reported as a [`Diagnostic`] next to a best-effort result.

pub mod convert;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod node;
pub mod options;
pub mod parser;
pub mod transpiler;

pub use convert::{Context, EscapeClass, EscapeConverter, LiteralConverter, NodeConverter};
pub use diagnostic::{Diagnostic, Diagnostics};
pub use error::{LexerErrorKind, OptionsError, ParseError, Result, RetargetError, Span};
pub use lexer::{Lexer, Token, TokenKind};
pub use node::{Node, NodeKind, NodeType};
pub use options::Options;
pub use parser::{Parser, parse};
pub use transpiler::{
    Conversion, TranspileReport, transpile, transpile_batch, transpile_debug, transpile_node,
    transpile_strict,
};

/// Convert a Ruby pattern with default options to a JavaScript regex literal
///
/// This is the main entry point for one-off conversions. Diagnostics are
/// discarded; use [`transpile`] to inspect them.
pub fn compile(input: &str) -> Result<String> {
    Ok(transpile(input, &Options::default())?.to_literal())
}
