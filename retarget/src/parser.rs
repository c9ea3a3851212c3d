//! Parser for Ruby (Onigmo) patterns
//!
//! This module provides a recursive descent parser that converts tokens into
//! a [`Node`] tree.
//!
//! Grammar (in order of precedence, lowest to highest):
//!   root        := branches EOF
//!   branches    := sequence ( '|' sequence )*
//!   sequence    := quantified*
//!   quantified  := atom quantifier*
//!   atom        := literal | escape | type | property | anchor | backref
//!                | '.' | group | conditional | set | '\K' | '(?imx)' | '(?#..)'
//!   group       := group_open branches ')'
//!   conditional := '(?(' cond ')' branches ')'
//!   set         := '[' '^'? set_items ( '&&' set_items )* ']'
//!   set_items   := ( member ( '-' member )? )*
//!
//! A single branch is stored as the children of its parent directly; several
//! branches become one `Alternation` child holding a `Sequence` per branch.
//! Runs of plain characters become one `Literal` node, except that a
//! quantified character always stands alone.

use crate::error::{ParseError, Result, Span};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::node::{GroupKind, MetaKind, Node, NodeKind, QuantifierKind, SetKind};
use crate::options::Options;

/// Parser for Ruby patterns
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    index: usize,
}

impl<'a> Parser<'a> {
    /// Tokenize `input` and prepare to parse it
    pub fn new(input: &'a str, options: &Options) -> Result<Self> {
        let tokens = Lexer::new(input, options.extended).tokenize()?;
        Ok(Parser {
            input,
            tokens,
            index: 0,
        })
    }

    fn current(&self) -> &Token {
        // tokenize() always ends with Eof, and we never advance past it
        &self.tokens[self.index]
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.index + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Advance to the next token, returning the one just consumed
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current().kind {
            TokenKind::Eof => ParseError::UnexpectedEof,
            _ => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current().to_string(),
                position: self.current().span.start,
            },
        }
    }

    /// Parse the entire input and return the tree
    pub fn parse(&mut self) -> Result<Node> {
        let children = self.parse_branches()?;
        match self.current().kind {
            TokenKind::Eof => {}
            TokenKind::GroupClose => {
                return Err(ParseError::UnmatchedParen(self.current().span.start).into());
            }
            _ => return Err(self.unexpected("EOF").into()),
        }
        Ok(Node::branch(
            NodeKind::Root,
            self.input,
            Span::new(0, self.input.len()),
            children,
        ))
    }

    /// branches := sequence ( '|' sequence )*
    fn parse_branches(&mut self) -> Result<Vec<Node>> {
        let start = self.current().span.start;
        let first = self.parse_sequence()?;
        if self.current().kind != TokenKind::Pipe {
            return Ok(first);
        }

        let mut alternatives = vec![self.sequence_node(first, start)];
        while self.current().kind == TokenKind::Pipe {
            self.advance(); // consume '|'
            let branch_start = self.current().span.start;
            let items = self.parse_sequence()?;
            alternatives.push(self.sequence_node(items, branch_start));
        }
        let end = self.current().span.start;
        let span = Span::new(start, end);
        Ok(vec![Node::branch(
            NodeKind::Alternation,
            &self.input[start..end],
            span,
            alternatives,
        )])
    }

    fn sequence_node(&self, items: Vec<Node>, start: usize) -> Node {
        let end = items.last().map(|n| n.span.end).unwrap_or(start);
        Node::branch(
            NodeKind::Sequence,
            &self.input[start..end],
            Span::new(start, end),
            items,
        )
    }

    /// sequence := quantified*
    fn parse_sequence(&mut self) -> Result<Vec<Node>> {
        let mut items: Vec<Node> = Vec::new();
        while !matches!(
            self.current().kind,
            TokenKind::Eof | TokenKind::Pipe | TokenKind::GroupClose
        ) {
            let node = self.parse_quantified()?;
            match items.last_mut() {
                Some(prev) if prev.kind == NodeKind::Literal && node.kind == NodeKind::Literal => {
                    prev.data.push_str(&node.data);
                    prev.span = prev.span.to(node.span);
                }
                _ => items.push(node),
            }
        }
        Ok(items)
    }

    /// quantified := atom quantifier*
    fn parse_quantified(&mut self) -> Result<Node> {
        let mut node = self.parse_atom()?;
        self.skip_free_space_before_quantifier();
        while let TokenKind::Quantifier(kind, mode) = self.current().kind {
            let token = self.advance();
            if kind == QuantifierKind::Interval {
                validate_interval(&token.text)?;
            }
            let span = node.span.to(token.span);
            node = Node::branch(NodeKind::Quantifier(kind, mode), token.text, span, vec![node]);
            self.skip_free_space_before_quantifier();
        }
        Ok(node)
    }

    /// In extended mode, whitespace and comments between an atom and its
    /// quantifier are insignificant
    fn skip_free_space_before_quantifier(&mut self) {
        let mut n = 0;
        while let TokenKind::FreeSpace(_) = self.peek_kind(n) {
            n += 1;
        }
        if n > 0 && matches!(self.peek_kind(n), TokenKind::Quantifier(..)) {
            self.index += n;
        }
    }

    fn parse_atom(&mut self) -> Result<Node> {
        let kind = match self.current().kind {
            TokenKind::Literal(_) => NodeKind::Literal,
            TokenKind::Escape(kind) => NodeKind::Escape(kind),
            TokenKind::CharType(kind) => NodeKind::CharType(kind),
            TokenKind::Anchor(kind) => NodeKind::Anchor(kind),
            TokenKind::Property(kind) => NodeKind::Property(kind),
            TokenKind::Backref(kind) => NodeKind::Backref(kind),
            TokenKind::Keep => NodeKind::Keep,
            TokenKind::Dot => NodeKind::Meta(MetaKind::Dot),
            TokenKind::Comment => NodeKind::Group(GroupKind::Comment),
            TokenKind::OptionSwitch => NodeKind::OptionSwitch,
            TokenKind::FreeSpace(kind) => NodeKind::FreeSpace(kind),
            TokenKind::GroupOpen(kind) => return self.parse_group(NodeKind::Group(kind)),
            TokenKind::ConditionalOpen => return self.parse_group(NodeKind::Conditional),
            TokenKind::SetOpen { .. } => return self.parse_set(),
            TokenKind::Quantifier(..) => {
                return Err(ParseError::NothingToRepeat(self.current().span.start).into());
            }
            _ => return Err(self.unexpected("expression").into()),
        };
        let token = self.advance();
        Ok(Node::leaf(kind, token.text, token.span))
    }

    /// group := group_open branches ')'
    fn parse_group(&mut self, kind: NodeKind) -> Result<Node> {
        let open = self.advance();
        let children = self.parse_branches()?;
        if self.current().kind != TokenKind::GroupClose {
            return Err(self.unexpected("`)`").into());
        }
        let close = self.advance();
        Ok(Node::branch(kind, open.text, open.span.to(close.span), children))
    }

    /// set := '[' '^'? set_items ( '&&' set_items )* ']'
    fn parse_set(&mut self) -> Result<Node> {
        let open = self.advance();
        let kind = match open.kind {
            TokenKind::SetOpen { negated: true } => SetKind::NegatedSet,
            _ => SetKind::Set,
        };

        let first = self.parse_set_items()?;
        let children = if self.current().kind == TokenKind::Intersection {
            let start = open.span.end;
            let mut operands = vec![self.sequence_node(first, start)];
            while self.current().kind == TokenKind::Intersection {
                self.advance(); // consume '&&'
                let operand_start = self.current().span.start;
                let items = self.parse_set_items()?;
                operands.push(self.sequence_node(items, operand_start));
            }
            let end = self.current().span.start;
            vec![Node::branch(
                NodeKind::Set(SetKind::Intersection),
                &self.input[start..end],
                Span::new(start, end),
                operands,
            )]
        } else {
            first
        };

        if self.current().kind != TokenKind::SetClose {
            return Err(self.unexpected("`]`").into());
        }
        let close = self.advance();
        Ok(Node::branch(
            NodeKind::Set(kind),
            open.text,
            open.span.to(close.span),
            children,
        ))
    }

    /// set_items := ( member ( '-' member )? )*
    fn parse_set_items(&mut self) -> Result<Vec<Node>> {
        let mut items = Vec::new();
        while !matches!(
            self.current().kind,
            TokenKind::SetClose | TokenKind::Intersection | TokenKind::Eof
        ) {
            let member = self.parse_set_member()?;
            let is_range = self.current().kind == TokenKind::Literal('-')
                && !matches!(
                    self.peek_kind(1),
                    TokenKind::SetClose | TokenKind::Intersection | TokenKind::Eof
                )
                && is_range_endpoint(&member);
            if !is_range {
                items.push(member);
                continue;
            }

            self.advance(); // consume '-'
            let upper = self.parse_set_member()?;
            if !is_range_endpoint(&upper) {
                return Err(ParseError::UnexpectedToken {
                    expected: "range end".to_string(),
                    found: format!("`{}`", upper.data),
                    position: upper.span.start,
                }
                .into());
            }
            let span = member.span.to(upper.span);
            let data = &self.input[span.start..span.end];
            if let (NodeKind::Literal, NodeKind::Literal) = (member.kind, upper.kind)
                && member.data > upper.data
            {
                return Err(ParseError::EmptyRange {
                    range: data.to_string(),
                    position: span.start,
                }
                .into());
            }
            items.push(Node::branch(
                NodeKind::Set(SetKind::Range),
                data,
                span,
                vec![member, upper],
            ));
        }
        Ok(items)
    }

    fn parse_set_member(&mut self) -> Result<Node> {
        let kind = match self.current().kind {
            TokenKind::Literal(_) => NodeKind::Literal,
            TokenKind::Escape(kind) => NodeKind::Escape(kind),
            TokenKind::CharType(kind) => NodeKind::CharType(kind),
            TokenKind::Property(kind) => NodeKind::Property(kind),
            TokenKind::Posix { negated: false } => NodeKind::Set(SetKind::Posix),
            TokenKind::Posix { negated: true } => NodeKind::Set(SetKind::NegatedPosix),
            TokenKind::SetOpen { .. } => return self.parse_set(),
            _ => return Err(self.unexpected("set member").into()),
        };
        let token = self.advance();
        Ok(Node::leaf(kind, token.text, token.span))
    }
}

/// Only single characters can bound a range
fn is_range_endpoint(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Literal | NodeKind::Escape(_))
}

/// Reject `{n,m}` with `n > m`
fn validate_interval(text: &str) -> Result<()> {
    let inner = text
        .trim_end_matches('?')
        .trim_start_matches('{')
        .trim_end_matches('}');
    if let Some((min, max)) = inner.split_once(',')
        && let (Ok(min), Ok(max)) = (min.parse::<u64>(), max.parse::<u64>())
        && min > max
    {
        return Err(ParseError::InvalidQuantifier(text.to_string()).into());
    }
    Ok(())
}

/// Parse a pattern into a [`Node`] tree
///
/// # Example
/// ```
/// use retarget::{parse, NodeKind, Options};
///
/// let tree = parse("a|b", &Options::default()).unwrap();
/// assert_eq!(tree.children[0].kind, NodeKind::Alternation);
/// ```
pub fn parse(input: &str, options: &Options) -> Result<Node> {
    Parser::new(input, options)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetargetError;
    use crate::node::{AnchorKind, EscapeKind, QuantifierMode};

    fn parse_default(input: &str) -> Node {
        parse(input, &Options::default()).unwrap()
    }

    fn child_kinds(node: &Node) -> Vec<NodeKind> {
        node.children.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_parse_empty() {
        let tree = parse_default("");
        assert_eq!(tree.kind, NodeKind::Root);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_literals_are_merged() {
        let tree = parse_default("abc");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].kind, NodeKind::Literal);
        assert_eq!(tree.children[0].data, "abc");
        assert_eq!(tree.children[0].span, Span::new(0, 3));
    }

    #[test]
    fn test_quantified_character_stands_alone() {
        let tree = parse_default("abc+");
        assert_eq!(
            child_kinds(&tree),
            vec![
                NodeKind::Literal,
                NodeKind::Quantifier(QuantifierKind::OneOrMore, QuantifierMode::Greedy)
            ]
        );
        assert_eq!(tree.children[0].data, "ab");
        let quantifier = &tree.children[1];
        assert_eq!(quantifier.data, "+");
        assert_eq!(quantifier.children[0].data, "c");
        assert_eq!(quantifier.span, Span::new(2, 4));
    }

    #[test]
    fn test_alternation() {
        let tree = parse_default("ab|c|");
        assert_eq!(child_kinds(&tree), vec![NodeKind::Alternation]);
        let alternation = &tree.children[0];
        assert_eq!(alternation.children.len(), 3);
        assert!(alternation.children.iter().all(|n| n.kind == NodeKind::Sequence));
        assert_eq!(alternation.children[0].data, "ab");
        assert!(alternation.children[2].children.is_empty());
    }

    #[test]
    fn test_group_with_alternation() {
        let tree = parse_default("(?<word>a|b)");
        let group = &tree.children[0];
        assert_eq!(group.kind, NodeKind::Group(GroupKind::Named));
        assert_eq!(group.data, "(?<word>");
        assert_eq!(group.span, Span::new(0, 12));
        assert_eq!(child_kinds(group), vec![NodeKind::Alternation]);
    }

    #[test]
    fn test_escapes_and_anchors() {
        let tree = parse_default(r"^\x41\.$");
        assert_eq!(
            child_kinds(&tree),
            vec![
                NodeKind::Anchor(AnchorKind::BeginningOfLine),
                NodeKind::Escape(EscapeKind::Hex),
                NodeKind::Escape(EscapeKind::Dot),
                NodeKind::Anchor(AnchorKind::EndOfLine),
            ]
        );
        assert_eq!(tree.children[1].data, "\\x41");
    }

    #[test]
    fn test_set_with_range() {
        let tree = parse_default("[a-z_]");
        let set = &tree.children[0];
        assert_eq!(set.kind, NodeKind::Set(SetKind::Set));
        assert_eq!(
            child_kinds(set),
            vec![NodeKind::Set(SetKind::Range), NodeKind::Literal]
        );
        assert_eq!(set.children[0].data, "a-z");
        assert_eq!(set.children[0].children[1].data, "z");
    }

    #[test]
    fn test_set_trailing_dash_is_literal() {
        let tree = parse_default("[a-]");
        assert_eq!(
            child_kinds(&tree.children[0]),
            vec![NodeKind::Literal, NodeKind::Literal]
        );
    }

    #[test]
    fn test_set_range_with_escape_endpoint() {
        let tree = parse_default(r"[\x00-\x1F]");
        let range = &tree.children[0].children[0];
        assert_eq!(range.kind, NodeKind::Set(SetKind::Range));
        assert_eq!(range.data, "\\x00-\\x1F");
    }

    #[test]
    fn test_set_intersection() {
        let tree = parse_default("[a-z&&[^aeiou]]");
        let set = &tree.children[0];
        assert_eq!(child_kinds(set), vec![NodeKind::Set(SetKind::Intersection)]);
        let intersection = &set.children[0];
        assert_eq!(intersection.children.len(), 2);
        assert_eq!(
            intersection.children[1].children[0].kind,
            NodeKind::Set(SetKind::NegatedSet)
        );
    }

    #[test]
    fn test_negated_set_and_posix() {
        let tree = parse_default("[^[:alpha:]]");
        let set = &tree.children[0];
        assert_eq!(set.kind, NodeKind::Set(SetKind::NegatedSet));
        assert_eq!(child_kinds(set), vec![NodeKind::Set(SetKind::Posix)]);
        assert_eq!(set.children[0].data, "[:alpha:]");
    }

    #[test]
    fn test_conditional() {
        let tree = parse_default("(a)?(?(1)b|c)");
        let conditional = &tree.children[1];
        assert_eq!(conditional.kind, NodeKind::Conditional);
        assert_eq!(conditional.data, "(?(1)");
        assert_eq!(child_kinds(conditional), vec![NodeKind::Alternation]);
    }

    #[test]
    fn test_extended_mode() {
        let tree = parse("a b", &Options::default().extended(true)).unwrap();
        assert_eq!(tree.children.len(), 3);
        assert!(matches!(tree.children[1].kind, NodeKind::FreeSpace(_)));
    }

    #[test]
    fn test_extended_mode_quantifier_after_space() {
        let options = Options::default().extended(true);
        let tree = parse("a +", &options).unwrap();
        assert_eq!(
            child_kinds(&tree),
            vec![NodeKind::Quantifier(QuantifierKind::OneOrMore, QuantifierMode::Greedy)]
        );
        assert_eq!(tree.children[0].children[0].data, "a");

        let tree = parse("ab #c\n* c", &options).unwrap();
        let kinds = child_kinds(&tree);
        assert_eq!(kinds[0], NodeKind::Literal);
        assert_eq!(tree.children[0].data, "a");
        assert!(matches!(kinds[1], NodeKind::Quantifier(..)));
        assert_eq!(tree.children[1].children[0].data, "b");
    }

    #[test]
    fn test_nested_quantifiers() {
        let tree = parse_default("a**");
        let outer = &tree.children[0];
        assert!(matches!(outer.kind, NodeKind::Quantifier(..)));
        assert!(matches!(outer.children[0].kind, NodeKind::Quantifier(..)));
    }

    #[test]
    fn test_error_unclosed_group() {
        let err = parse("(abc", &Options::default()).unwrap_err();
        assert_eq!(err, RetargetError::Parse(ParseError::UnexpectedEof));
    }

    #[test]
    fn test_error_unmatched_paren() {
        let err = parse("abc)", &Options::default()).unwrap_err();
        assert_eq!(err, RetargetError::Parse(ParseError::UnmatchedParen(3)));
    }

    #[test]
    fn test_error_nothing_to_repeat() {
        let err = parse("*a", &Options::default()).unwrap_err();
        assert_eq!(err, RetargetError::Parse(ParseError::NothingToRepeat(0)));
        assert!(parse("(|+)", &Options::default()).is_err());
    }

    #[test]
    fn test_error_invalid_interval() {
        let err = parse("a{3,1}", &Options::default()).unwrap_err();
        assert_eq!(
            err,
            RetargetError::Parse(ParseError::InvalidQuantifier("{3,1}".to_string()))
        );
    }

    #[test]
    fn test_error_empty_range() {
        let err = parse("[z-a]", &Options::default()).unwrap_err();
        assert_eq!(
            err,
            RetargetError::Parse(ParseError::EmptyRange {
                range: "z-a".to_string(),
                position: 1,
            })
        );
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn test_unexpected_token_has_position() {
        let err = parse("[a-\\d]", &Options::default()).unwrap_err();
        assert_eq!(err.position(), Some(3));
    }
}
