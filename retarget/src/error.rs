//! Error types for the converter
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by their source: lexing, parsing, option flags,
//! or a strict conversion that refused to lose information.
//!
//! Unsupported constructs are *not* errors. They are reported as
//! [`Diagnostic`]s alongside the converted pattern; only
//! [`transpile_strict`](crate::transpile_strict) turns them into an error.

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// The main error type for the converter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetargetError {
    /// Errors that occur during lexing/tokenization
    #[error("lexer error at position {position}: {kind}")]
    Lexer {
        /// Byte offset in the input where the error occurred
        position: usize,
        /// The specific kind of lexer error
        kind: LexerErrorKind,
    },

    /// Errors that occur during parsing
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid option flags
    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),

    /// A strict conversion produced diagnostics
    #[error("{} unsupported construct(s), first: {}", .0.len(), first_message(.0))]
    Unsupported(Vec<Diagnostic>),
}

impl RetargetError {
    /// Byte offset in the pattern where the error was detected, if known
    pub fn position(&self) -> Option<usize> {
        match self {
            RetargetError::Lexer { position, .. } => Some(*position),
            RetargetError::Parse(
                ParseError::UnmatchedParen(position)
                | ParseError::NothingToRepeat(position)
                | ParseError::UnexpectedToken { position, .. }
                | ParseError::EmptyRange { position, .. },
            ) => Some(*position),
            RetargetError::Unsupported(diagnostics) => diagnostics.first().map(|d| d.span.start),
            RetargetError::Parse(_) | RetargetError::Options(_) => None,
        }
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// Specific kinds of lexer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    /// Backslash at the very end of the pattern
    #[error("trailing backslash")]
    TrailingBackslash,

    /// Unclosed character class (e.g., `[abc` without `]`)
    #[error("unclosed character class")]
    UnclosedCharacterClass,

    /// Malformed `\x`, `\u` or `\x{...}` escape
    #[error("invalid escape sequence '{0}'")]
    InvalidEscape(String),

    /// Malformed `\p{...}` property
    #[error("invalid property '{0}'")]
    InvalidProperty(String),

    /// Group name not terminated by `>` or `'`
    #[error("unterminated group name")]
    UnterminatedGroupName,

    /// `(?` followed by something we do not know
    #[error("unknown group syntax '{0}'")]
    UnknownGroup(String),
}

/// Errors that occur during parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected
        expected: String,
        /// What was actually found
        found: String,
        /// Byte offset of what was found
        position: usize,
    },

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A `)` without a matching `(`
    #[error("unmatched closing parenthesis at position {0}")]
    UnmatchedParen(usize),

    /// Quantifier with nothing to repeat
    #[error("target of repeat operator is not specified at position {0}")]
    NothingToRepeat(usize),

    /// Invalid quantifier
    #[error("invalid quantifier: {0}")]
    InvalidQuantifier(String),

    /// Character range with start above end (e.g. `[z-a]`)
    #[error("empty range in char class: {range}")]
    EmptyRange {
        /// The offending range text
        range: String,
        /// Byte offset of the range
        position: usize,
    },
}

/// Errors in option flag strings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    /// A flag letter that Ruby does not define
    #[error("unknown flag '{0}'")]
    UnknownFlag(char),
}

/// A span representing a byte range in the source pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single byte
    pub fn single(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, RetargetError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EscapeKind, NodeKind};

    #[test]
    fn test_lexer_error_display() {
        let err = RetargetError::Lexer {
            position: 5,
            kind: LexerErrorKind::UnclosedCharacterClass,
        };
        assert_eq!(
            err.to_string(),
            "lexer error at position 5: unclosed character class"
        );
    }

    #[test]
    fn test_parse_error_unexpected_token() {
        let err = ParseError::UnexpectedToken {
            expected: "`)`".to_string(),
            found: "`]`".to_string(),
            position: 4,
        };
        assert_eq!(err.to_string(), "expected `)`, found `]`");
    }

    #[test]
    fn test_error_from_parse_error() {
        let err: RetargetError = ParseError::UnexpectedEof.into();
        assert_eq!(err.to_string(), "parse error: unexpected end of input");
    }

    #[test]
    fn test_error_from_options_error() {
        let err: RetargetError = OptionsError::UnknownFlag('q').into();
        assert_eq!(err.to_string(), "invalid options: unknown flag 'q'");
    }

    #[test]
    fn test_unsupported_display_counts_diagnostics() {
        let diag = Diagnostic::unsupported(
            NodeKind::Escape(EscapeKind::Bell),
            "\\a",
            Span::new(0, 2),
        );
        let err = RetargetError::Unsupported(vec![diag.clone(), diag]);
        let text = err.to_string();
        assert!(text.starts_with("2 unsupported construct(s)"));
        assert!(text.contains("bell"));
    }

    #[test]
    fn test_span_creation() {
        let span = Span::new(10, 20);
        assert_eq!(span.start, 10);
        assert_eq!(span.end, 20);
        assert_eq!(span.len(), 10);
    }

    #[test]
    fn test_span_single_and_to() {
        let span = Span::single(5);
        assert_eq!(span.len(), 1);
        assert_eq!(span.to(Span::new(8, 9)), Span::new(5, 9));
        assert_eq!(span.to_string(), "5..6");
    }

    #[test]
    fn test_error_position() {
        let err = RetargetError::Lexer {
            position: 3,
            kind: LexerErrorKind::TrailingBackslash,
        };
        assert_eq!(err.position(), Some(3));
        assert_eq!(
            RetargetError::Parse(ParseError::NothingToRepeat(0)).position(),
            Some(0)
        );
        let err = ParseError::EmptyRange {
            range: "z-a".to_string(),
            position: 1,
        };
        assert_eq!(RetargetError::Parse(err).position(), Some(1));
        assert_eq!(RetargetError::Parse(ParseError::UnexpectedEof).position(), None);
    }
}
