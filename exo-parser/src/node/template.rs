//! Template placeholders.
//!
//! A template such as `$e[2;9]\{5}` describes how to draw a random value rather than a value
//! itself. The parser only records the description; drawing happens in the generation engine.

use super::Node;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Nature {
    /// `$e`: an integer.
    Integer,

    /// `$ep`: an even integer.
    EvenInteger,

    /// `$ei`: an odd integer, whose sign is drawn at random.
    OddInteger,

    /// `$d`: a decimal number.
    Decimal,

    /// `$l`: one of an explicit list of choices.
    List,

    /// `${expr}`: the value of an expression, as an integer or a fraction.
    Fraction,

    /// `$$p{expr}`: the value of an expression, rounded to a decimal.
    DecimalValue,

    /// `$N` or `${N}`: the `N`th value generated so far, counting from 1.
    BackReference {
        index: usize,

        /// Whether the reference was written with braces, `${N}`.
        braced: bool,
    },
}

impl Nature {
    /// Returns true for `$e`, `$ep` and `$ei`.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::EvenInteger | Self::OddInteger)
    }
}

/// The constraints a template draws its value under.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bounds {
    /// No bounds were given (`$e`). Accepted when matching, rejected when generating.
    Unbounded,

    /// `{max}` or `{min;max}`: a number of digits.
    Digits {
        min: Option<Node>,
        max: Node,
    },

    /// `[min;max]`: an inclusive range of values.
    Range {
        min: Node,
        max: Node,
    },

    /// `{i;f}` or `{i1:i2;f1:f2}`: the number of digits of the integer and fractional parts of a
    /// decimal, each either fixed or ranged.
    DecimalDigits {
        integer: (Node, Option<Node>),
        fraction: (Node, Option<Node>),
    },

    /// `{a;b;c}`: the choices of a list.
    Choices(Vec<Node>),

    /// `{expr}`: the expression evaluated by `$` and `$$`.
    Value(Node),
}

/// A template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Template {
    pub nature: Nature,
    pub bounds: Bounds,

    /// `r`: the sign of the value is drawn at random.
    pub relative: bool,

    /// `s`: a positive value may be written with an explicit `+`.
    pub signed: bool,

    /// The number of decimals kept by `$$`, if given.
    pub precision: Option<u32>,

    /// `\{a;b}`: values that must not be drawn.
    pub exclude: Vec<Node>,

    /// `\[a;b]`: a range of values that must not be drawn.
    pub exclude_range: Option<(Node, Node)>,

    /// `\m{a;b}`: the value must not be a multiple of any of these.
    pub exclude_multiple: Vec<Node>,

    /// `\d{a;b}`: the value must not divide any of these.
    pub exclude_divider: Vec<Node>,

    /// `\g{a;b}`: the value must be coprime with each of these.
    pub exclude_common_dividers_with: Vec<Node>,
}

impl Template {
    /// A template of the given nature and bounds, without flags or exclusions.
    pub fn new(nature: Nature, bounds: Bounds) -> Self {
        Self {
            nature,
            bounds,
            relative: false,
            signed: false,
            precision: None,
            exclude: Vec::new(),
            exclude_range: None,
            exclude_multiple: Vec::new(),
            exclude_divider: Vec::new(),
            exclude_common_dividers_with: Vec::new(),
        }
    }

    /// A back-reference to the `index`th generated value.
    pub fn back_reference(index: usize) -> Self {
        Self::new(Nature::BackReference { index, braced: false }, Bounds::Unbounded)
    }

    /// Returns true if any exclusion is configured.
    pub fn has_exclusions(&self) -> bool {
        !self.exclude.is_empty()
            || self.exclude_range.is_some()
            || !self.exclude_multiple.is_empty()
            || !self.exclude_divider.is_empty()
            || !self.exclude_common_dividers_with.is_empty()
    }

    /// Wraps this template into a node.
    pub fn into_node(self) -> Node {
        Node::new(super::Expr::Template(Box::new(self)))
    }
}
