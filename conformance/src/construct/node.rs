//! Pattern nodes and their payloads.

use crate::error::BuildError;
use unicode_general_category::GeneralCategory;

/// Cap on the unbounded repetition forms while generating strings.
///
/// Only example length is limited; `x*` still means "any number of x".
pub const MAX_REPEAT: u32 = 7;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a named group, required to build a reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) NodeId);

impl GroupId {
    pub fn node(self) -> NodeId {
        self.0
    }

    /// Name of the group in rendered patterns.
    pub fn name(self) -> String {
        group_name(self.0)
    }
}

pub(crate) fn group_name(id: NodeId) -> String {
    format!("g{}", id.0)
}

/// Repetition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `x?`
    Optional,
    /// `x*`
    Star,
    /// `x+`
    Plus,
    /// `x{n}`
    Exactly(u32),
    /// `x{lo,hi}`
    Between(u32, u32),
    /// `x{n,}`
    AtLeast(u32),
    /// `x{,n}`, rendered `x{0,n}`
    AtMost(u32),
}

impl Repeat {
    /// Inclusive repetition counts used when generating strings.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Repeat::Optional => (0, 1),
            Repeat::Star => (0, MAX_REPEAT),
            Repeat::Plus => (1, MAX_REPEAT),
            Repeat::Exactly(n) => (n, n),
            Repeat::Between(lo, hi) => (lo, hi),
            Repeat::AtLeast(n) => (n, n.max(MAX_REPEAT)),
            Repeat::AtMost(n) => (0, n),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Repeat::Optional => "optional",
            Repeat::Star => "star",
            Repeat::Plus => "plus",
            Repeat::Exactly(_) => "exactly",
            Repeat::Between(..) => "between",
            Repeat::AtLeast(_) => "at least",
            Repeat::AtMost(_) => "at most",
        }
    }

    pub(crate) fn validate(self) -> Result<Self, BuildError> {
        match self {
            Repeat::Between(min, max) if min > max => Err(BuildError::InvertedBounds { min, max }),
            _ => Ok(self),
        }
    }
}

/// One element of a character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetItem {
    Char(char),
    /// Inclusive range, `start < stop`.
    Range(char, char),
}

impl SetItem {
    pub fn range(start: char, stop: char) -> Result<Self, BuildError> {
        if start < stop {
            Ok(SetItem::Range(start, stop))
        } else {
            Err(BuildError::InvertedRange { start, stop })
        }
    }

    pub fn contains(self, c: char) -> bool {
        match self {
            SetItem::Char(x) => x == c,
            SetItem::Range(start, stop) => (start..=stop).contains(&c),
        }
    }
}

/// A non-empty, ordered list of set elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    items: Vec<SetItem>,
}

impl CharSet {
    pub fn new(items: Vec<SetItem>) -> Result<Self, BuildError> {
        if items.is_empty() {
            return Err(BuildError::EmptySet);
        }
        for item in &items {
            if let &SetItem::Range(start, stop) = item {
                SetItem::range(start, stop)?;
            }
        }
        Ok(CharSet { items })
    }

    pub fn items(&self) -> &[SetItem] {
        &self.items
    }

    pub fn contains(&self, c: char) -> bool {
        self.items.iter().any(|item| item.contains(c))
    }

    /// The discrete characters, in order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.items.iter().filter_map(|item| match item {
            SetItem::Char(c) => Some(*c),
            SetItem::Range(..) => None,
        })
    }

    /// Smallest range start and largest range stop, if there are ranges.
    pub fn range_hull(&self) -> Option<(char, char)> {
        let ranges = self.items.iter().filter_map(|item| match item {
            SetItem::Range(start, stop) => Some((*start, *stop)),
            SetItem::Char(_) => None,
        });
        ranges.fold(None, |hull, (start, stop)| match hull {
            None => Some((start, stop)),
            Some((lo, hi)) => Some((lo.min(start), hi.max(stop))),
        })
    }
}

const DECIMAL_NUMBER: &[GeneralCategory] = &[GeneralCategory::DecimalNumber];

/// A backslash class defined by Unicode general categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClass {
    pub tag: char,
    pub categories: &'static [GeneralCategory],
    /// `true` when members of `categories` match.
    pub polarity: bool,
}

impl CharClass {
    /// `\d`
    pub const DIGIT: CharClass = CharClass {
        tag: 'd',
        categories: DECIMAL_NUMBER,
        polarity: true,
    };

    /// `\D`
    pub const NOT_DIGIT: CharClass = CharClass {
        tag: 'D',
        categories: DECIMAL_NUMBER,
        polarity: false,
    };

    pub const ALL: [CharClass; 2] = [CharClass::DIGIT, CharClass::NOT_DIGIT];
}

/// A regex syntax node. Children are referenced by arena index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(char),
    /// A special character matched literally, rendered `\c`.
    Escape(char),
    /// Any character except line feed.
    Dot,
    Class(CharClass),
    Set(CharSet),
    /// `[^...]`
    Complement(CharSet),
    Repetition {
        child: NodeId,
        repeat: Repeat,
        /// Rendering only; a lazy quantifier matches the same strings.
        lazy: bool,
    },
    Sequence(Vec<NodeId>),
    Disjunction(Vec<NodeId>),
    NamedGroup {
        child: NodeId,
    },
    GroupReference {
        group: NodeId,
    },
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Literal(_) => "literal",
            Node::Escape(_) => "escape",
            Node::Dot => "dot",
            Node::Class(_) => "class",
            Node::Set(_) => "set",
            Node::Complement(_) => "complement",
            Node::Repetition { .. } => "repetition",
            Node::Sequence(_) => "sequence",
            Node::Disjunction(_) => "disjunction",
            Node::NamedGroup { .. } => "group",
            Node::GroupReference { .. } => "reference",
        }
    }
}
