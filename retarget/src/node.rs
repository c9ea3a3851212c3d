//! Syntax tree for Ruby (Onigmo) patterns
//!
//! Every element of a parsed pattern is a [`Node`]: a coarse type, a
//! fine-grained subtype, the raw source text it was parsed from, and its
//! children. The type and subtype live together in [`NodeKind`] so that
//! converters match on one closed enum.
//!
//! Nodes are never mutated after parsing. Converters borrow them and produce
//! strings.

use std::fmt;

use crate::error::Span;

/// A single element of the syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Type and subtype
    pub kind: NodeKind,
    /// Raw source text of this node
    pub data: String,
    /// Location of `data` in the source pattern
    pub span: Span,
    /// Ordered children (empty for leaves)
    pub children: Vec<Node>,
}

/// Coarse node category, used to pick a converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Sequence,
    Alternation,
    Literal,
    Meta,
    Anchor,
    Escape,
    CharType,
    Property,
    Backref,
    Group,
    OptionSwitch,
    Conditional,
    Keep,
    Quantifier,
    Set,
    FreeSpace,
}

/// Type and subtype of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Whole pattern
    Root,
    /// Concatenation
    Sequence,
    /// `a|b|c`; children are the alternatives
    Alternation,
    /// One or more plain characters
    Literal,
    /// `.`
    Meta(MetaKind),
    Anchor(AnchorKind),
    Escape(EscapeKind),
    /// Character type shorthands such as `\d` or `\h`
    CharType(CharTypeKind),
    /// `\p{...}`
    Property(PropertyKind),
    Backref(BackrefKind),
    Group(GroupKind),
    /// `(?imx-imx)` without a body
    OptionSwitch,
    /// `(?(cond)yes|no)`
    Conditional,
    /// `\K`
    Keep,
    /// Quantifier wrapping a single child
    Quantifier(QuantifierKind, QuantifierMode),
    Set(SetKind),
    /// Whitespace and `#` comments in extended mode
    FreeSpace(FreeSpaceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// `^`
    BeginningOfLine,
    /// `$`
    EndOfLine,
    /// `\A`
    BeginningOfString,
    /// `\z`
    EndOfString,
    /// `\Z`
    EndOfStringOrBeforeNewline,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
    /// `\G`
    MatchStart,
}

/// Escape sequences
///
/// Escaped metacharacters that have their own subtype (`\.`, `\*`, ...) are
/// listed individually. Any other escaped punctuation or unknown escaped
/// letter is [`EscapeKind::Literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeKind {
    /// `\\`
    Backslash,
    /// `\^`
    BeginningOfLine,
    /// `\r`
    CarriageReturn,
    /// `\uHHHH`
    Codepoint,
    /// `\.`
    Dot,
    /// `\$`
    EndOfLine,
    /// `\f`
    FormFeed,
    /// `\xHH`
    Hex,
    /// `\{`
    IntervalOpen,
    /// `\}`
    IntervalClose,
    /// `\n`
    Newline,
    /// `\0`, `\012`
    Octal,
    /// `\+`
    OneOrMore,
    /// `\[`
    SetOpen,
    /// `\]`
    SetClose,
    /// `\t`
    Tab,
    /// `\v`
    VerticalTab,
    /// `\*`
    ZeroOrMore,
    /// `\?`
    ZeroOrOne,
    /// Any other escaped character, e.g. `\-` or `\(`
    Literal,
    /// `\b` inside a set
    Backspace,
    /// `\a`
    Bell,
    /// `\e`
    EscapeChar,
    /// `\x{HHHH}`
    HexWide,
    /// `\u{H H ...}`
    CodepointList,
    /// `\cX`, `\C-X`
    Control,
    /// `\M-X`
    Meta,
    /// `\M-\C-X`, `\M-\cX`, `\c\M-X`
    MetaControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharTypeKind {
    Digit,
    NonDigit,
    Word,
    NonWord,
    Space,
    NonSpace,
    /// `\h`
    Hex,
    /// `\H`
    NonHex,
    /// `\R`
    Linebreak,
    /// `\X`
    ExtendedGrapheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// `\p{..}`
    Property,
    /// `\P{..}` or `\p{^..}`
    NonProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackrefKind {
    /// `\1`
    Number,
    /// `\k<name>` or `\k'name'`
    Name,
    /// `\k<-1>`
    NumberRelative,
    /// `\k<name+1>`
    NameRecursionLevel,
    /// `\g<name>`, `\g<1>`
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// `(...)`
    Capture,
    /// `(?:...)`
    NonCapture,
    /// `(?<name>...)` or `(?'name'...)`
    Named,
    /// `(?=...)`
    Lookahead,
    /// `(?!...)`
    NegativeLookahead,
    /// `(?<=...)`
    Lookbehind,
    /// `(?<!...)`
    NegativeLookbehind,
    /// `(?>...)`
    Atomic,
    /// `(?imx-imx:...)`
    Options,
    /// `(?~...)`
    Absence,
    /// `(?#...)`
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantifierKind {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    /// `{n}`, `{n,}`, `{,m}`, `{n,m}`
    Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantifierMode {
    Greedy,
    /// Trailing `?`
    Reluctant,
    /// Trailing `+`
    Possessive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// `[...]`
    Set,
    /// `[^...]`
    NegatedSet,
    /// `a-z`; children are the two endpoints
    Range,
    /// `a&&b`; children are the operands
    Intersection,
    /// `[:alpha:]`
    Posix,
    /// `[:^alpha:]`
    NegatedPosix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeSpaceKind {
    Whitespace,
    Comment,
}

impl NodeType {
    /// Human-readable name, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Root => "pattern",
            NodeType::Sequence => "sequence",
            NodeType::Alternation => "alternation",
            NodeType::Literal => "literal",
            NodeType::Meta => "meta",
            NodeType::Anchor => "anchor",
            NodeType::Escape => "escape",
            NodeType::CharType => "character type",
            NodeType::Property => "property",
            NodeType::Backref => "backreference",
            NodeType::Group => "group",
            NodeType::OptionSwitch => "option switch",
            NodeType::Conditional => "conditional",
            NodeType::Keep => "keep",
            NodeType::Quantifier => "quantifier",
            NodeType::Set => "set",
            NodeType::FreeSpace => "free space",
        }
    }
}

impl NodeKind {
    /// The coarse type of this kind
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::Sequence => NodeType::Sequence,
            NodeKind::Alternation => NodeType::Alternation,
            NodeKind::Literal => NodeType::Literal,
            NodeKind::Meta(_) => NodeType::Meta,
            NodeKind::Anchor(_) => NodeType::Anchor,
            NodeKind::Escape(_) => NodeType::Escape,
            NodeKind::CharType(_) => NodeType::CharType,
            NodeKind::Property(_) => NodeType::Property,
            NodeKind::Backref(_) => NodeType::Backref,
            NodeKind::Group(_) => NodeType::Group,
            NodeKind::OptionSwitch => NodeType::OptionSwitch,
            NodeKind::Conditional => NodeType::Conditional,
            NodeKind::Keep => NodeType::Keep,
            NodeKind::Quantifier(..) => NodeType::Quantifier,
            NodeKind::Set(_) => NodeType::Set,
            NodeKind::FreeSpace(_) => NodeType::FreeSpace,
        }
    }

    /// Stable snake_case name of the subtype (or of the type, for kinds
    /// without subtypes)
    pub fn subtype_name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Sequence => "sequence",
            NodeKind::Alternation => "alternation",
            NodeKind::Literal => "literal",
            NodeKind::Meta(MetaKind::Dot) => "dot",
            NodeKind::Anchor(kind) => kind.name(),
            NodeKind::Escape(kind) => kind.name(),
            NodeKind::CharType(kind) => kind.name(),
            NodeKind::Property(PropertyKind::Property) => "property",
            NodeKind::Property(PropertyKind::NonProperty) => "nonproperty",
            NodeKind::Backref(kind) => kind.name(),
            NodeKind::Group(kind) => kind.name(),
            NodeKind::OptionSwitch => "option_switch",
            NodeKind::Conditional => "conditional",
            NodeKind::Keep => "keep",
            NodeKind::Quantifier(kind, mode) => match (kind, mode) {
                (_, QuantifierMode::Possessive) => "possessive",
                (QuantifierKind::ZeroOrMore, _) => "zero_or_more",
                (QuantifierKind::OneOrMore, _) => "one_or_more",
                (QuantifierKind::ZeroOrOne, _) => "zero_or_one",
                (QuantifierKind::Interval, _) => "interval",
            },
            NodeKind::Set(kind) => kind.name(),
            NodeKind::FreeSpace(FreeSpaceKind::Whitespace) => "whitespace",
            NodeKind::FreeSpace(FreeSpaceKind::Comment) => "comment",
        }
    }
}

impl AnchorKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnchorKind::BeginningOfLine => "bol",
            AnchorKind::EndOfLine => "eol",
            AnchorKind::BeginningOfString => "bos",
            AnchorKind::EndOfString => "eos",
            AnchorKind::EndOfStringOrBeforeNewline => "eos_ob_eol",
            AnchorKind::WordBoundary => "word_boundary",
            AnchorKind::NonWordBoundary => "nonword_boundary",
            AnchorKind::MatchStart => "match_start",
        }
    }
}

impl EscapeKind {
    /// Every escape subtype, in declaration order
    pub const ALL: [EscapeKind; 28] = [
        EscapeKind::Backslash,
        EscapeKind::BeginningOfLine,
        EscapeKind::CarriageReturn,
        EscapeKind::Codepoint,
        EscapeKind::Dot,
        EscapeKind::EndOfLine,
        EscapeKind::FormFeed,
        EscapeKind::Hex,
        EscapeKind::IntervalOpen,
        EscapeKind::IntervalClose,
        EscapeKind::Newline,
        EscapeKind::Octal,
        EscapeKind::OneOrMore,
        EscapeKind::SetOpen,
        EscapeKind::SetClose,
        EscapeKind::Tab,
        EscapeKind::VerticalTab,
        EscapeKind::ZeroOrMore,
        EscapeKind::ZeroOrOne,
        EscapeKind::Literal,
        EscapeKind::Backspace,
        EscapeKind::Bell,
        EscapeKind::EscapeChar,
        EscapeKind::HexWide,
        EscapeKind::CodepointList,
        EscapeKind::Control,
        EscapeKind::Meta,
        EscapeKind::MetaControl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EscapeKind::Backslash => "backslash",
            EscapeKind::BeginningOfLine => "bol",
            EscapeKind::CarriageReturn => "carriage",
            EscapeKind::Codepoint => "codepoint",
            EscapeKind::Dot => "dot",
            EscapeKind::EndOfLine => "eol",
            EscapeKind::FormFeed => "form_feed",
            EscapeKind::Hex => "hex",
            EscapeKind::IntervalOpen => "interval_open",
            EscapeKind::IntervalClose => "interval_close",
            EscapeKind::Newline => "newline",
            EscapeKind::Octal => "octal",
            EscapeKind::OneOrMore => "one_or_more",
            EscapeKind::SetOpen => "set_open",
            EscapeKind::SetClose => "set_close",
            EscapeKind::Tab => "tab",
            EscapeKind::VerticalTab => "vertical_tab",
            EscapeKind::ZeroOrMore => "zero_or_more",
            EscapeKind::ZeroOrOne => "zero_or_one",
            EscapeKind::Literal => "literal",
            EscapeKind::Backspace => "backspace",
            EscapeKind::Bell => "bell",
            EscapeKind::EscapeChar => "escape_char",
            EscapeKind::HexWide => "hex_wide",
            EscapeKind::CodepointList => "codepoint_list",
            EscapeKind::Control => "control",
            EscapeKind::Meta => "meta_sequence",
            EscapeKind::MetaControl => "meta_control_sequence",
        }
    }
}

impl CharTypeKind {
    pub fn name(&self) -> &'static str {
        match self {
            CharTypeKind::Digit => "digit",
            CharTypeKind::NonDigit => "nondigit",
            CharTypeKind::Word => "word",
            CharTypeKind::NonWord => "nonword",
            CharTypeKind::Space => "space",
            CharTypeKind::NonSpace => "nonspace",
            CharTypeKind::Hex => "hex",
            CharTypeKind::NonHex => "nonhex",
            CharTypeKind::Linebreak => "linebreak",
            CharTypeKind::ExtendedGrapheme => "xgrapheme",
        }
    }
}

impl BackrefKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackrefKind::Number => "number",
            BackrefKind::Name => "name_ref",
            BackrefKind::NumberRelative => "number_rel_ref",
            BackrefKind::NameRecursionLevel => "name_recursion_ref",
            BackrefKind::Call => "subexp_call",
        }
    }
}

impl GroupKind {
    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Capture => "capture",
            GroupKind::NonCapture => "passive",
            GroupKind::Named => "named",
            GroupKind::Lookahead => "lookahead",
            GroupKind::NegativeLookahead => "nlookahead",
            GroupKind::Lookbehind => "lookbehind",
            GroupKind::NegativeLookbehind => "nlookbehind",
            GroupKind::Atomic => "atomic",
            GroupKind::Options => "options",
            GroupKind::Absence => "absence",
            GroupKind::Comment => "comment",
        }
    }

    /// Whether this group kind allocates a capture number
    pub fn is_capturing(&self) -> bool {
        matches!(self, GroupKind::Capture | GroupKind::Named)
    }
}

impl SetKind {
    pub fn name(&self) -> &'static str {
        match self {
            SetKind::Set => "character_set",
            SetKind::NegatedSet => "negated_character_set",
            SetKind::Range => "range",
            SetKind::Intersection => "intersection",
            SetKind::Posix => "posixclass",
            SetKind::NegatedPosix => "nonposixclass",
        }
    }
}

impl Node {
    /// Create a leaf node
    pub fn leaf(kind: NodeKind, data: impl Into<String>, span: Span) -> Self {
        Node {
            kind,
            data: data.into(),
            span,
            children: Vec::new(),
        }
    }

    /// Create a node with children
    pub fn branch(
        kind: NodeKind,
        data: impl Into<String>,
        span: Span,
        children: Vec<Node>,
    ) -> Self {
        Node {
            kind,
            data: data.into(),
            span,
            children,
        }
    }

    /// Create an escape node, mostly useful for driving converters directly
    pub fn escape(kind: EscapeKind, data: impl Into<String>) -> Self {
        let data = data.into();
        let span = Span::new(0, data.len());
        Node::leaf(NodeKind::Escape(kind), data, span)
    }

    /// The coarse type of this node
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Write an indented outline of the subtree, one node per line
    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{:?}:{} {:?} @{}",
            "",
            self.node_type(),
            self.kind.subtype_name(),
            self.data,
            self.span,
            indent = depth * 2
        )?;
        for child in &self.children {
            child.write_outline(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Renders the tree outline used by `retarget tree` and debug reports
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_constructor() {
        let node = Node::escape(EscapeKind::Hex, "\\x41");
        assert_eq!(node.kind, NodeKind::Escape(EscapeKind::Hex));
        assert_eq!(node.data, "\\x41");
        assert_eq!(node.span, Span::new(0, 4));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_node_type() {
        let node = Node::escape(EscapeKind::Tab, "\\t");
        assert_eq!(node.node_type(), NodeType::Escape);
        assert_eq!(
            NodeKind::Quantifier(QuantifierKind::Interval, QuantifierMode::Greedy).node_type(),
            NodeType::Quantifier
        );
    }

    #[test]
    fn test_subtype_names() {
        assert_eq!(NodeKind::Escape(EscapeKind::Backspace).subtype_name(), "backspace");
        assert_eq!(NodeKind::Anchor(AnchorKind::BeginningOfLine).subtype_name(), "bol");
        assert_eq!(
            NodeKind::Quantifier(QuantifierKind::OneOrMore, QuantifierMode::Possessive)
                .subtype_name(),
            "possessive"
        );
        assert_eq!(NodeKind::Group(GroupKind::Atomic).subtype_name(), "atomic");
    }

    #[test]
    fn test_all_escape_kinds_are_distinct() {
        let mut names: Vec<_> = EscapeKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EscapeKind::ALL.len());
    }

    #[test]
    fn test_node_count_covers_subtree() {
        let tree = Node::branch(
            NodeKind::Sequence,
            "ab",
            Span::new(0, 2),
            vec![
                Node::leaf(NodeKind::Literal, "a", Span::single(0)),
                Node::leaf(NodeKind::Literal, "b", Span::single(1)),
            ],
        );
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_outline_display() {
        let tree = Node::branch(
            NodeKind::Root,
            "\\t",
            Span::new(0, 2),
            vec![Node::escape(EscapeKind::Tab, "\\t")],
        );
        let outline = tree.to_string();
        assert_eq!(outline, "Root:root \"\\\\t\" @0..2\n  Escape:tab \"\\\\t\" @0..2\n");
    }

    #[test]
    fn test_nodes_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Node>();
    }
}
