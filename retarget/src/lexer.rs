//! Lexer for tokenizing Ruby (Onigmo) patterns
//!
//! This module provides a tokenizer that converts a pattern string into a
//! stream of tokens for the parser. Every token keeps the exact source text
//! it was read from, since converters pass much of it through unchanged.
//!
//! Tokenizing is context sensitive in two places: inside `[...]` most
//! metacharacters are plain, and in extended mode (`x`) whitespace and `#`
//! comments outside sets become free-space tokens.

use std::fmt;

use crate::error::{LexerErrorKind, Result, RetargetError, Span};
use crate::node::{
    AnchorKind, BackrefKind, CharTypeKind, EscapeKind, FreeSpaceKind, GroupKind, PropertyKind,
    QuantifierKind, QuantifierMode,
};

/// A token with its source text and location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token
    pub text: String,
    pub span: Span,
}

/// The kinds of token in a pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// A plain character
    Literal(char),
    Escape(EscapeKind),
    CharType(CharTypeKind),
    Anchor(AnchorKind),
    Property(PropertyKind),
    Backref(BackrefKind),
    /// `\K`
    Keep,
    /// `.`
    Dot,
    /// `|`
    Pipe,
    /// Opening of a group with a body, e.g. `(`, `(?:`, `(?<name>`
    GroupOpen(GroupKind),
    /// A complete `(?#...)` comment
    Comment,
    /// A complete `(?imx-imx)`
    OptionSwitch,
    /// `(?(cond)`
    ConditionalOpen,
    /// `)`
    GroupClose,
    Quantifier(QuantifierKind, QuantifierMode),
    /// `[` or `[^`
    SetOpen { negated: bool },
    /// `]` closing a set
    SetClose,
    /// `&&` inside a set
    Intersection,
    /// `[:name:]` or `[:^name:]` inside a set
    Posix { negated: bool },
    FreeSpace(FreeSpaceKind),
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

/// Lexer for tokenizing Ruby patterns
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of `current_char`
    position: usize,
    current_char: Option<char>,
    extended: bool,
    /// Nesting depth of `[...]`
    set_depth: usize,
    /// True right after `[` or `[^`, where `]` is a plain character
    at_set_start: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input string
    pub fn new(input: &'a str, extended: bool) -> Self {
        Lexer {
            input,
            position: 0,
            current_char: input.chars().next(),
            extended,
            set_depth: 0,
            at_set_start: false,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        if let Some(c) = self.current_char {
            self.position += c.len_utf8();
            self.current_char = self.input[self.position..].chars().next();
        }
    }

    /// Peek `n` characters past the current one
    fn peek(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn error(&self, kind: LexerErrorKind) -> RetargetError {
        RetargetError::Lexer {
            position: self.position,
            kind,
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.input[start..self.position].to_string(),
            span: Span::new(start, self.position),
        }
    }

    /// Consume characters while `pred` holds, returning how many were read
    fn advance_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.current_char {
            if !pred(c) {
                break;
            }
            self.advance();
            count += 1;
        }
        count
    }

    /// Consume up to `max` characters matching `pred`
    fn advance_up_to(&mut self, max: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while count < max {
            match self.current_char {
                Some(c) if pred(c) => {
                    self.advance();
                    count += 1;
                }
                _ => break,
            }
        }
        count
    }

    /// Read everything up to and including `close`; the opening delimiter
    /// must already be consumed
    fn read_delimited(&mut self, close: char, on_missing: LexerErrorKind) -> Result<()> {
        self.advance_while(|c| c != close);
        if self.current_char != Some(close) {
            return Err(self.error(on_missing));
        }
        self.advance();
        Ok(())
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        let token = if self.set_depth > 0 {
            self.next_set_token()?
        } else {
            self.next_pattern_token()?
        };
        if !matches!(token.kind, TokenKind::SetOpen { .. }) {
            self.at_set_start = false;
        }
        Ok(token)
    }

    /// Tokenize the entire input and return a vector of tokens ending in `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_pattern_token(&mut self) -> Result<Token> {
        let start = self.position;
        let Some(c) = self.current_char else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        if self.extended {
            if c.is_whitespace() {
                self.advance_while(char::is_whitespace);
                return Ok(self.token(TokenKind::FreeSpace(FreeSpaceKind::Whitespace), start));
            }
            if c == '#' {
                self.advance_while(|c| c != '\n');
                self.advance(); // newline, if any
                return Ok(self.token(TokenKind::FreeSpace(FreeSpaceKind::Comment), start));
            }
        }

        let kind = match c {
            '\\' => {
                self.advance();
                self.read_escape(false)?
            }
            '(' => self.read_group_open()?,
            ')' => {
                self.advance();
                TokenKind::GroupClose
            }
            '[' => {
                self.advance();
                self.open_set()
            }
            '|' => {
                self.advance();
                TokenKind::Pipe
            }
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            '^' => {
                self.advance();
                TokenKind::Anchor(AnchorKind::BeginningOfLine)
            }
            '$' => {
                self.advance();
                TokenKind::Anchor(AnchorKind::EndOfLine)
            }
            '*' | '+' | '?' => {
                self.advance();
                let kind = match c {
                    '*' => QuantifierKind::ZeroOrMore,
                    '+' => QuantifierKind::OneOrMore,
                    _ => QuantifierKind::ZeroOrOne,
                };
                let mode = match self.current_char {
                    Some('?') => {
                        self.advance();
                        QuantifierMode::Reluctant
                    }
                    Some('+') => {
                        self.advance();
                        QuantifierMode::Possessive
                    }
                    _ => QuantifierMode::Greedy,
                };
                TokenKind::Quantifier(kind, mode)
            }
            '{' => self.read_interval(),
            c => {
                self.advance();
                TokenKind::Literal(c)
            }
        };
        Ok(self.token(kind, start))
    }

    fn next_set_token(&mut self) -> Result<Token> {
        let start = self.position;
        let Some(c) = self.current_char else {
            return Err(self.error(LexerErrorKind::UnclosedCharacterClass));
        };

        let kind = match c {
            ']' if !self.at_set_start => {
                self.advance();
                self.set_depth -= 1;
                TokenKind::SetClose
            }
            '[' => {
                if let Some(negated) = self.posix_class_ahead() {
                    self.advance_while(|c| c != ']');
                    self.advance();
                    TokenKind::Posix { negated }
                } else {
                    self.advance();
                    self.open_set()
                }
            }
            '&' if self.peek(1) == Some('&') => {
                self.advance();
                self.advance();
                TokenKind::Intersection
            }
            '\\' => {
                self.advance();
                self.read_escape(true)?
            }
            c => {
                self.advance();
                TokenKind::Literal(c)
            }
        };
        Ok(self.token(kind, start))
    }

    /// Called after `[` was consumed
    fn open_set(&mut self) -> TokenKind {
        let negated = self.current_char == Some('^');
        if negated {
            self.advance();
        }
        self.set_depth += 1;
        self.at_set_start = true;
        TokenKind::SetOpen { negated }
    }

    /// Whether `[:name:]` or `[:^name:]` starts at the current position
    fn posix_class_ahead(&self) -> Option<bool> {
        let body = self.rest().strip_prefix("[:")?;
        let (negated, body) = match body.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let name_len = body.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        (name_len > 0 && body[name_len..].starts_with(":]")).then_some(negated)
    }

    /// Read `{n}`, `{n,}`, `{,m}` or `{n,m}`; anything else makes `{` a
    /// plain character, as in Ruby
    fn read_interval(&mut self) -> TokenKind {
        let body = &self.rest()[1..];
        let Some(close) = body.find('}') else {
            self.advance();
            return TokenKind::Literal('{');
        };
        let inner = &body[..close];
        let valid = match inner.split_once(',') {
            Some((min, max)) => {
                (!min.is_empty() || !max.is_empty())
                    && min.chars().all(|c| c.is_ascii_digit())
                    && max.chars().all(|c| c.is_ascii_digit())
            }
            None => !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()),
        };
        if !valid {
            self.advance();
            return TokenKind::Literal('{');
        }
        // '{' + inner + '}'
        for _ in 0..inner.len() + 2 {
            self.advance();
        }
        let mode = if self.current_char == Some('?') {
            self.advance();
            QuantifierMode::Reluctant
        } else {
            QuantifierMode::Greedy
        };
        TokenKind::Quantifier(QuantifierKind::Interval, mode)
    }

    /// Read a group opening; the `(` has not been consumed yet
    fn read_group_open(&mut self) -> Result<TokenKind> {
        self.advance(); // consume '('
        if self.current_char != Some('?') {
            return Ok(TokenKind::GroupOpen(GroupKind::Capture));
        }
        self.advance(); // consume '?'

        let kind = match (self.current_char, self.peek(1)) {
            (Some(':'), _) => GroupKind::NonCapture,
            (Some('='), _) => GroupKind::Lookahead,
            (Some('!'), _) => GroupKind::NegativeLookahead,
            (Some('>'), _) => GroupKind::Atomic,
            (Some('~'), _) => GroupKind::Absence,
            (Some('<'), Some('=')) => {
                self.advance();
                GroupKind::Lookbehind
            }
            (Some('<'), Some('!')) => {
                self.advance();
                GroupKind::NegativeLookbehind
            }
            (Some('<'), _) => {
                self.advance();
                self.read_delimited('>', LexerErrorKind::UnterminatedGroupName)?;
                return Ok(TokenKind::GroupOpen(GroupKind::Named));
            }
            (Some('\''), _) => {
                self.advance();
                self.read_delimited('\'', LexerErrorKind::UnterminatedGroupName)?;
                return Ok(TokenKind::GroupOpen(GroupKind::Named));
            }
            (Some('#'), _) => {
                self.read_delimited(')', LexerErrorKind::UnknownGroup("(?#".to_string()))?;
                return Ok(TokenKind::Comment);
            }
            (Some('('), _) => {
                self.advance();
                self.read_delimited(')', LexerErrorKind::UnknownGroup("(?(".to_string()))?;
                return Ok(TokenKind::ConditionalOpen);
            }
            (Some(c), _) if matches!(c, 'i' | 'm' | 'x' | '-') => {
                self.advance_while(|c| matches!(c, 'i' | 'm' | 'x' | '-'));
                return match self.current_char {
                    Some(':') => {
                        self.advance();
                        Ok(TokenKind::GroupOpen(GroupKind::Options))
                    }
                    Some(')') => {
                        self.advance();
                        Ok(TokenKind::OptionSwitch)
                    }
                    _ => Err(self.error(LexerErrorKind::UnknownGroup(
                        self.input[..self.position].to_string(),
                    ))),
                };
            }
            (other, _) => {
                let shown = other.map(|c| format!("(?{}", c)).unwrap_or_else(|| "(?".to_string());
                return Err(self.error(LexerErrorKind::UnknownGroup(shown)));
            }
        };
        self.advance();
        Ok(TokenKind::GroupOpen(kind))
    }

    /// Read an escape sequence (assumes the backslash was already consumed)
    fn read_escape(&mut self, in_set: bool) -> Result<TokenKind> {
        let Some(c) = self.current_char else {
            return Err(self.error(LexerErrorKind::TrailingBackslash));
        };
        self.advance();

        let kind = match c {
            'd' => TokenKind::CharType(CharTypeKind::Digit),
            'D' => TokenKind::CharType(CharTypeKind::NonDigit),
            'w' => TokenKind::CharType(CharTypeKind::Word),
            'W' => TokenKind::CharType(CharTypeKind::NonWord),
            's' => TokenKind::CharType(CharTypeKind::Space),
            'S' => TokenKind::CharType(CharTypeKind::NonSpace),
            'h' => TokenKind::CharType(CharTypeKind::Hex),
            'H' => TokenKind::CharType(CharTypeKind::NonHex),
            'R' => TokenKind::CharType(CharTypeKind::Linebreak),
            'X' => TokenKind::CharType(CharTypeKind::ExtendedGrapheme),
            'b' if in_set => TokenKind::Escape(EscapeKind::Backspace),
            'b' => TokenKind::Anchor(AnchorKind::WordBoundary),
            'B' if !in_set => TokenKind::Anchor(AnchorKind::NonWordBoundary),
            'A' if !in_set => TokenKind::Anchor(AnchorKind::BeginningOfString),
            'z' if !in_set => TokenKind::Anchor(AnchorKind::EndOfString),
            'Z' if !in_set => TokenKind::Anchor(AnchorKind::EndOfStringOrBeforeNewline),
            'G' if !in_set => TokenKind::Anchor(AnchorKind::MatchStart),
            'K' if !in_set => TokenKind::Keep,
            'p' | 'P' => self.read_property(c == 'P')?,
            'k' if !in_set && matches!(self.current_char, Some('<' | '\'')) => {
                self.read_named_reference(false)?
            }
            'g' if !in_set && matches!(self.current_char, Some('<' | '\'')) => {
                self.read_named_reference(true)?
            }
            '0' => {
                self.advance_up_to(2, |c| c.is_digit(8));
                TokenKind::Escape(EscapeKind::Octal)
            }
            '1'..='9' => self.read_numeric_escape(c, in_set),
            'x' => self.read_hex_escape()?,
            'u' => self.read_unicode_escape()?,
            'n' => TokenKind::Escape(EscapeKind::Newline),
            't' => TokenKind::Escape(EscapeKind::Tab),
            'r' => TokenKind::Escape(EscapeKind::CarriageReturn),
            'f' => TokenKind::Escape(EscapeKind::FormFeed),
            'v' => TokenKind::Escape(EscapeKind::VerticalTab),
            'a' => TokenKind::Escape(EscapeKind::Bell),
            'e' => TokenKind::Escape(EscapeKind::EscapeChar),
            'c' => self.read_control(false)?,
            'C' if self.current_char == Some('-') => {
                self.advance();
                self.read_control(false)?
            }
            'M' if self.current_char == Some('-') => {
                self.advance();
                self.read_meta()?
            }
            '\\' => TokenKind::Escape(EscapeKind::Backslash),
            '^' => TokenKind::Escape(EscapeKind::BeginningOfLine),
            '$' => TokenKind::Escape(EscapeKind::EndOfLine),
            '.' => TokenKind::Escape(EscapeKind::Dot),
            '*' => TokenKind::Escape(EscapeKind::ZeroOrMore),
            '+' => TokenKind::Escape(EscapeKind::OneOrMore),
            '?' => TokenKind::Escape(EscapeKind::ZeroOrOne),
            '{' => TokenKind::Escape(EscapeKind::IntervalOpen),
            '}' => TokenKind::Escape(EscapeKind::IntervalClose),
            '[' => TokenKind::Escape(EscapeKind::SetOpen),
            ']' => TokenKind::Escape(EscapeKind::SetClose),
            _ => TokenKind::Escape(EscapeKind::Literal),
        };
        Ok(kind)
    }

    /// `\1`..`\9` and longer numbers: a backreference, unless it reads as an
    /// octal escape (`\12` with only octal digits, or any number inside a set)
    fn read_numeric_escape(&mut self, first: char, in_set: bool) -> TokenKind {
        let octal_ahead = first.is_digit(8) && self.current_char.is_some_and(|c| c.is_digit(8));
        if in_set || octal_ahead {
            if !first.is_digit(8) {
                return TokenKind::Escape(EscapeKind::Literal);
            }
            self.advance_up_to(2, |c| c.is_digit(8));
            return TokenKind::Escape(EscapeKind::Octal);
        }
        self.advance_while(|c| c.is_ascii_digit());
        TokenKind::Backref(BackrefKind::Number)
    }

    /// `\k<...>` or `\g<...>` (also with quotes); the `k`/`g` is consumed
    fn read_named_reference(&mut self, call: bool) -> Result<TokenKind> {
        let close = if self.current_char == Some('<') { '>' } else { '\'' };
        let name_start = self.position + 1;
        self.advance();
        self.read_delimited(close, LexerErrorKind::UnterminatedGroupName)?;
        if call {
            return Ok(TokenKind::Backref(BackrefKind::Call));
        }

        let name = &self.input[name_start..self.position - 1];
        let kind = if name.starts_with('-') && name[1..].chars().all(|c| c.is_ascii_digit()) {
            BackrefKind::NumberRelative
        } else if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            BackrefKind::Number
        } else if name.contains(['+', '-']) {
            BackrefKind::NameRecursionLevel
        } else {
            BackrefKind::Name
        };
        Ok(TokenKind::Backref(kind))
    }

    /// `\xHH` or `\x{H...}`; the `x` is consumed
    fn read_hex_escape(&mut self) -> Result<TokenKind> {
        let start = self.position - 2;
        if self.current_char == Some('{') {
            self.advance();
            let digits = self.advance_while(|c| c.is_ascii_hexdigit());
            if digits == 0 || digits > 8 || self.current_char != Some('}') {
                return Err(self.invalid_escape(start));
            }
            self.advance();
            return Ok(TokenKind::Escape(EscapeKind::HexWide));
        }
        if self.advance_up_to(2, |c| c.is_ascii_hexdigit()) == 0 {
            return Err(self.invalid_escape(start));
        }
        Ok(TokenKind::Escape(EscapeKind::Hex))
    }

    /// `\uHHHH` or `\u{H H ...}`; the `u` is consumed
    fn read_unicode_escape(&mut self) -> Result<TokenKind> {
        let start = self.position - 2;
        if self.current_char == Some('{') {
            self.advance();
            let read = self.advance_while(|c| c.is_ascii_hexdigit() || c == ' ');
            if read == 0 || self.current_char != Some('}') {
                return Err(self.invalid_escape(start));
            }
            self.advance();
            return Ok(TokenKind::Escape(EscapeKind::CodepointList));
        }
        if self.advance_up_to(4, |c| c.is_ascii_hexdigit()) != 4 {
            return Err(self.invalid_escape(start));
        }
        Ok(TokenKind::Escape(EscapeKind::Codepoint))
    }

    /// Control character after `\c` or `\C-`; `meta` is set when a `\M-`
    /// prefix was already read
    fn read_control(&mut self, meta: bool) -> Result<TokenKind> {
        let start = self.position;
        match self.current_char {
            None => Err(self.invalid_escape(start)),
            Some('\\') if !meta && self.rest().starts_with("\\M-") => {
                for _ in 0..3 {
                    self.advance();
                }
                self.read_char_or_escape()?;
                Ok(TokenKind::Escape(EscapeKind::MetaControl))
            }
            Some(_) => {
                self.read_char_or_escape()?;
                Ok(TokenKind::Escape(if meta {
                    EscapeKind::MetaControl
                } else {
                    EscapeKind::Control
                }))
            }
        }
    }

    /// Character after `\M-`
    fn read_meta(&mut self) -> Result<TokenKind> {
        if self.rest().starts_with("\\C-") {
            for _ in 0..3 {
                self.advance();
            }
            return self.read_control(true);
        }
        if self.rest().starts_with("\\c") {
            self.advance();
            self.advance();
            return self.read_control(true);
        }
        self.read_char_or_escape()?;
        Ok(TokenKind::Escape(EscapeKind::Meta))
    }

    /// One character, or a backslash and the character after it
    fn read_char_or_escape(&mut self) -> Result<()> {
        let start = self.position;
        if self.current_char == Some('\\') {
            self.advance();
        }
        if self.current_char.is_none() {
            return Err(self.invalid_escape(start));
        }
        self.advance();
        Ok(())
    }

    /// `\p{Name}`, `\p{^Name}` or `\P{Name}`; the `p`/`P` is consumed
    fn read_property(&mut self, upper: bool) -> Result<TokenKind> {
        let start = self.position - 2;
        if self.current_char != Some('{') {
            return Err(self.error(LexerErrorKind::InvalidProperty(
                self.input[start..self.position].to_string(),
            )));
        }
        self.advance();
        let negated = self.current_char == Some('^');
        self.advance_while(|c| c != '}');
        if self.current_char != Some('}') {
            return Err(self.error(LexerErrorKind::InvalidProperty(
                self.input[start..self.position].to_string(),
            )));
        }
        self.advance();
        Ok(TokenKind::Property(if upper ^ negated {
            PropertyKind::NonProperty
        } else {
            PropertyKind::Property
        }))
    }

    fn invalid_escape(&self, start: usize) -> RetargetError {
        self.error(LexerErrorKind::InvalidEscape(
            self.input[start..self.position].to_string(),
        ))
    }
}
