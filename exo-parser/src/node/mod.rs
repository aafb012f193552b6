//! The expression tree shared by every component of the toolkit.
//!
//! A [`Node`] pairs an expression ([`Expr`]) with an optional unit of measure. Nodes own their
//! children exclusively and are never mutated once built: every transform returns a new tree.
//!
//! Nodes do not point back at their parent. Transforms that need to know where a node sits pass
//! a [`Parent`] value down alongside the child instead (see [`Node::map_children`]), so
//! structural equality is never affected by where a subtree came from.

pub mod fmt;
pub mod number;
pub mod template;

use number::Number;
use std::{convert::Infallible, ops::{Add, Div, Mul, Neg, Sub}};
use template::Template;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The comparison used by an [`Expr::Inequality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Relation {
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl Relation {
    /// The symbol of the relation, as written in source text.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        }
    }
}

/// An expression, without its unit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A non-negative decimal literal. Negative values are wrapped in [`Expr::Opposite`].
    Number(Number),

    /// A single-letter variable, or a named constant such as `pi`.
    Symbol(String),

    /// The length of a segment, written as two uppercase letters, such as `AB`.
    SegmentLength(String),

    /// A hole (`?`) left for the learner to fill in.
    Hole,

    /// An expression that could not be understood, with a description of the problem.
    Error(String),

    /// Explicit grouping: `(a)`.
    Bracket(Box<Node>),

    /// Unary minus: `-a`.
    Opposite(Box<Node>),

    /// Unary plus: `+a`.
    Positive(Box<Node>),

    /// `a+b`.
    Sum(Box<Node>, Box<Node>),

    /// `a-b`.
    Difference(Box<Node>, Box<Node>),

    /// `a*b`, explicit or implicit (`2a`).
    Product(Box<Node>, Box<Node>),

    /// `a/b`, a fraction.
    Quotient(Box<Node>, Box<Node>),

    /// `a:b`, an inline division.
    Division(Box<Node>, Box<Node>),

    /// `a^b`.
    Power(Box<Node>, Box<Node>),

    /// `a%`.
    Percentage(Box<Node>),

    /// A call to a named function, such as `pgcd(12;18)`.
    Function(String, Vec<Node>),

    /// `true` or `false`.
    Boolean(bool),

    /// `a=b`.
    Equality(Box<Node>, Box<Node>),

    /// `a!=b`.
    Unequality(Box<Node>, Box<Node>),

    /// `a<b`, `a<=b`, `a>b` or `a>=b`.
    Inequality(Relation, Box<Node>, Box<Node>),

    /// A placeholder resolved by the template generation engine.
    Template(Box<Template>),
}

/// The kind of an [`Expr`], without any of its contents.
///
/// The declaration order is the rank used when sorting operands of different kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    Number,
    Symbol,
    SegmentLength,
    Hole,
    Boolean,
    Template,
    Error,
    Function,
    Power,
    Percentage,
    Product,
    Quotient,
    Division,
    Sum,
    Difference,
    Opposite,
    Positive,
    Bracket,
    Equality,
    Unequality,
    Inequality,
}

impl Kind {
    /// Returns true for the binary arithmetic operators.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Sum | Self::Difference | Self::Product | Self::Quotient | Self::Division | Self::Power
        )
    }

    /// Returns true for `=`, `!=` and the inequalities.
    pub fn is_relation(self) -> bool {
        matches!(self, Self::Equality | Self::Unequality | Self::Inequality)
    }

    /// Returns true for the unary sign wrappers.
    pub fn is_sign(self) -> bool {
        matches!(self, Self::Opposite | Self::Positive)
    }
}

/// Where a child sits inside the node that owns it.
///
/// This is what transforms use in place of a parent pointer: it is handed to the closure of
/// [`Node::map_children`] along with each child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent {
    /// The kind of the owning node.
    pub kind: Kind,

    /// The position of the child among its siblings.
    pub index: usize,

    /// The number of children of the owning node.
    pub len: usize,
}

impl Parent {
    pub fn new(kind: Kind, index: usize, len: usize) -> Self {
        Self { kind, index, len }
    }

    /// Returns true if the child is the first operand.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true if the child is the last operand.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }
}

/// A node of the expression tree: an expression and the unit of measure attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// The expression.
    pub expr: Expr,

    /// The unit attached to the expression, such as the `km` of `3 km`.
    pub unit: Option<Box<Node>>,
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

impl Node {
    /// Creates a node without a unit.
    pub fn new(expr: Expr) -> Self {
        Self { expr, unit: None }
    }

    /// Replaces the unit of this node.
    pub fn with_unit(mut self, unit: Option<Box<Node>>) -> Self {
        self.unit = unit;
        self
    }

    /// Copies the unit of `other` onto this node, keeping this node's own unit if `other` has
    /// none.
    pub fn with_unit_of(mut self, other: &Node) -> Self {
        if other.unit.is_some() {
            self.unit = other.unit.clone();
        }
        self
    }

    /// A number node.
    pub fn number(number: Number) -> Self {
        Self::new(Expr::Number(number))
    }

    /// A number node holding a non-negative integer.
    pub fn integer(value: u64) -> Self {
        Self::number(Number::from(value))
    }

    /// A symbol node.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::new(Expr::Symbol(name.into()))
    }

    /// A hole (`?`).
    pub fn hole() -> Self {
        Self::new(Expr::Hole)
    }

    /// A function call.
    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self::new(Expr::Function(name.into(), args))
    }

    /// `self+rhs`.
    pub fn add(self, rhs: Node) -> Self {
        Self::new(Expr::Sum(Box::new(self), Box::new(rhs)))
    }

    /// `self-rhs`.
    pub fn sub(self, rhs: Node) -> Self {
        Self::new(Expr::Difference(Box::new(self), Box::new(rhs)))
    }

    /// `self*rhs`.
    pub fn mult(self, rhs: Node) -> Self {
        Self::new(Expr::Product(Box::new(self), Box::new(rhs)))
    }

    /// `self:rhs`.
    pub fn div(self, rhs: Node) -> Self {
        Self::new(Expr::Division(Box::new(self), Box::new(rhs)))
    }

    /// `self/rhs`.
    pub fn frac(self, rhs: Node) -> Self {
        Self::new(Expr::Quotient(Box::new(self), Box::new(rhs)))
    }

    /// `self^rhs`.
    pub fn pow(self, rhs: Node) -> Self {
        Self::new(Expr::Power(Box::new(self), Box::new(rhs)))
    }

    /// `-self`.
    pub fn oppose(self) -> Self {
        Self::new(Expr::Opposite(Box::new(self)))
    }

    /// `+self`.
    pub fn positive(self) -> Self {
        Self::new(Expr::Positive(Box::new(self)))
    }

    /// `(self)`.
    pub fn bracket(self) -> Self {
        Self::new(Expr::Bracket(Box::new(self)))
    }

    /// Builds a binary node of the given kind. Returns [`None`] if `kind` is not a binary
    /// arithmetic operator or a relation other than an inequality.
    pub fn binary(kind: Kind, lhs: Node, rhs: Node) -> Option<Self> {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        let expr = match kind {
            Kind::Sum => Expr::Sum(lhs, rhs),
            Kind::Difference => Expr::Difference(lhs, rhs),
            Kind::Product => Expr::Product(lhs, rhs),
            Kind::Quotient => Expr::Quotient(lhs, rhs),
            Kind::Division => Expr::Division(lhs, rhs),
            Kind::Power => Expr::Power(lhs, rhs),
            Kind::Equality => Expr::Equality(lhs, rhs),
            Kind::Unequality => Expr::Unequality(lhs, rhs),
            _ => return None,
        };
        Some(Self::new(expr))
    }

    /// The kind of this node.
    pub fn kind(&self) -> Kind {
        match &self.expr {
            Expr::Number(_) => Kind::Number,
            Expr::Symbol(_) => Kind::Symbol,
            Expr::SegmentLength(_) => Kind::SegmentLength,
            Expr::Hole => Kind::Hole,
            Expr::Error(_) => Kind::Error,
            Expr::Bracket(_) => Kind::Bracket,
            Expr::Opposite(_) => Kind::Opposite,
            Expr::Positive(_) => Kind::Positive,
            Expr::Sum(..) => Kind::Sum,
            Expr::Difference(..) => Kind::Difference,
            Expr::Product(..) => Kind::Product,
            Expr::Quotient(..) => Kind::Quotient,
            Expr::Division(..) => Kind::Division,
            Expr::Power(..) => Kind::Power,
            Expr::Percentage(_) => Kind::Percentage,
            Expr::Function(..) => Kind::Function,
            Expr::Boolean(_) => Kind::Boolean,
            Expr::Equality(..) => Kind::Equality,
            Expr::Unequality(..) => Kind::Unequality,
            Expr::Inequality(..) => Kind::Inequality,
            Expr::Template(_) => Kind::Template,
        }
    }

    /// Returns true if this node is of the given kind.
    pub fn is(&self, kind: Kind) -> bool {
        self.kind() == kind
    }

    /// The children of this node, in order. Templates are leaves.
    pub fn children(&self) -> Vec<&Node> {
        match &self.expr {
            Expr::Number(_)
            | Expr::Symbol(_)
            | Expr::SegmentLength(_)
            | Expr::Hole
            | Expr::Error(_)
            | Expr::Boolean(_)
            | Expr::Template(_) => Vec::new(),
            Expr::Bracket(child)
            | Expr::Opposite(child)
            | Expr::Positive(child)
            | Expr::Percentage(child) => vec![child],
            Expr::Sum(lhs, rhs)
            | Expr::Difference(lhs, rhs)
            | Expr::Product(lhs, rhs)
            | Expr::Quotient(lhs, rhs)
            | Expr::Division(lhs, rhs)
            | Expr::Power(lhs, rhs)
            | Expr::Equality(lhs, rhs)
            | Expr::Unequality(lhs, rhs)
            | Expr::Inequality(_, lhs, rhs) => vec![lhs, rhs],
            Expr::Function(_, args) => args.iter().collect(),
        }
    }

    /// The first child of this node, if any.
    pub fn first(&self) -> Option<&Node> {
        self.children().first().copied()
    }

    /// The last child of this node, if any.
    pub fn last(&self) -> Option<&Node> {
        self.children().last().copied()
    }

    /// The operand of a bracket or sign wrapper.
    pub fn inner(&self) -> Option<&Node> {
        match &self.expr {
            Expr::Bracket(child) | Expr::Opposite(child) | Expr::Positive(child) => Some(child),
            _ => None,
        }
    }

    /// Rebuilds this node from its children transformed by `f`, which receives each child along
    /// with its [`Parent`] link. The unit is copied. Leaves are cloned as they are.
    pub fn try_map_children<E, F>(&self, mut f: F) -> Result<Node, E>
    where
        F: FnMut(&Node, Parent) -> Result<Node, E>,
    {
        let kind = self.kind();
        let link = |index, len| Parent::new(kind, index, len);

        macro_rules! unary {
            ($variant:path, $child:expr) => {
                $variant(Box::new(f($child, link(0, 1))?))
            };
        }

        macro_rules! binary {
            ($variant:path, $lhs:expr, $rhs:expr) => {{
                let lhs = Box::new(f($lhs, link(0, 2))?);
                let rhs = Box::new(f($rhs, link(1, 2))?);
                $variant(lhs, rhs)
            }};
        }

        let expr = match &self.expr {
            Expr::Number(_)
            | Expr::Symbol(_)
            | Expr::SegmentLength(_)
            | Expr::Hole
            | Expr::Error(_)
            | Expr::Boolean(_)
            | Expr::Template(_) => return Ok(self.clone()),
            Expr::Bracket(child) => unary!(Expr::Bracket, child),
            Expr::Opposite(child) => unary!(Expr::Opposite, child),
            Expr::Positive(child) => unary!(Expr::Positive, child),
            Expr::Percentage(child) => unary!(Expr::Percentage, child),
            Expr::Sum(lhs, rhs) => binary!(Expr::Sum, lhs, rhs),
            Expr::Difference(lhs, rhs) => binary!(Expr::Difference, lhs, rhs),
            Expr::Product(lhs, rhs) => binary!(Expr::Product, lhs, rhs),
            Expr::Quotient(lhs, rhs) => binary!(Expr::Quotient, lhs, rhs),
            Expr::Division(lhs, rhs) => binary!(Expr::Division, lhs, rhs),
            Expr::Power(lhs, rhs) => binary!(Expr::Power, lhs, rhs),
            Expr::Equality(lhs, rhs) => binary!(Expr::Equality, lhs, rhs),
            Expr::Unequality(lhs, rhs) => binary!(Expr::Unequality, lhs, rhs),
            Expr::Inequality(relation, lhs, rhs) => {
                let lhs = Box::new(f(lhs, link(0, 2))?);
                let rhs = Box::new(f(rhs, link(1, 2))?);
                Expr::Inequality(*relation, lhs, rhs)
            },
            Expr::Function(name, args) => {
                let len = args.len();
                let args = args.iter()
                    .enumerate()
                    .map(|(i, arg)| f(arg, link(i, len)))
                    .collect::<Result<Vec<_>, _>>()?;
                Expr::Function(name.clone(), args)
            },
        };

        Ok(Node { expr, unit: self.unit.clone() })
    }

    /// Infallible version of [`Node::try_map_children`].
    pub fn map_children<F>(&self, mut f: F) -> Node
    where
        F: FnMut(&Node, Parent) -> Node,
    {
        match self.try_map_children(|child, parent| Ok::<_, Infallible>(f(child, parent))) {
            Ok(node) => node,
            Err(never) => match never {},
        }
    }

    /// The operands of a chain of unit-less sums, left to right. A node that is not a sum is
    /// its own single term.
    pub fn terms(&self) -> Vec<&Node> {
        self.flatten(Kind::Sum)
    }

    /// The operands of a chain of unit-less products, left to right.
    pub fn factors(&self) -> Vec<&Node> {
        self.flatten(Kind::Product)
    }

    fn flatten(&self, kind: Kind) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let chained = node.kind() == kind && (std::ptr::eq(node, self) || node.unit.is_none());
            match &node.expr {
                Expr::Sum(lhs, rhs) | Expr::Product(lhs, rhs) if chained => {
                    stack.push(rhs);
                    stack.push(lhs);
                },
                _ => out.push(node),
            }
        }
        out
    }

    /// Strips every bracket wrapping this node, returning the innermost node and the number of
    /// brackets removed.
    pub fn unbracketed(&self) -> (&Node, usize) {
        let mut node = self;
        let mut depth = 0;
        while let Expr::Bracket(inner) = &node.expr {
            node = inner;
            depth += 1;
        }
        (node, depth)
    }

    /// Returns a reference to the template of this node, if it is one.
    pub fn as_template(&self) -> Option<&Template> {
        match &self.expr {
            Expr::Template(template) => Some(template),
            _ => None,
        }
    }

    /// Returns true if this node or any of its descendants is a template.
    pub fn has_template(&self) -> bool {
        matches!(self.expr, Expr::Template(_)) || self.children().into_iter().any(Node::has_template)
    }
}

impl Add for Node {
    type Output = Node;

    fn add(self, rhs: Node) -> Node {
        Node::add(self, rhs)
    }
}

impl Sub for Node {
    type Output = Node;

    fn sub(self, rhs: Node) -> Node {
        Node::sub(self, rhs)
    }
}

impl Mul for Node {
    type Output = Node;

    fn mul(self, rhs: Node) -> Node {
        self.mult(rhs)
    }
}

impl Div for Node {
    type Output = Node;

    /// Builds a fraction (`/`), not an inline division (`:`).
    fn div(self, rhs: Node) -> Node {
        self.frac(rhs)
    }
}

impl Neg for Node {
    type Output = Node;

    fn neg(self) -> Node {
        self.oppose()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Node {
        Node::symbol(name)
    }

    #[test]
    fn flatten_terms() {
        let node = sym("a") + (sym("b") + sym("c")) + sym("d");
        let terms = node.terms().into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(terms, vec![sym("a"), sym("b"), sym("c"), sym("d")]);
    }

    #[test]
    fn flatten_stops_at_brackets_and_units() {
        let unit = Some(Box::new(sym("m")));
        let inner = (sym("b") + sym("c")).with_unit(unit);
        let node = sym("a") + inner.clone() + (sym("d") + sym("e")).bracket();
        assert_eq!(node.terms().len(), 3);
        assert_eq!(node.terms()[1], &inner);
    }

    #[test]
    fn factors_of_non_product() {
        let node = sym("a") + sym("b");
        assert_eq!(node.factors(), vec![&node]);
    }

    #[test]
    fn map_children_passes_links() {
        let node = Node::function("pgcd", vec![Node::integer(12), Node::integer(18), Node::integer(4)]);
        let mut seen = Vec::new();
        node.map_children(|child, parent| {
            seen.push((parent.kind, parent.is_first(), parent.is_last()));
            child.clone()
        });
        assert_eq!(seen, vec![
            (Kind::Function, true, false),
            (Kind::Function, false, false),
            (Kind::Function, false, true),
        ]);
    }

    #[test]
    fn map_children_copies_unit() {
        let node = (Node::integer(1) + Node::integer(2)).with_unit(Some(Box::new(sym("km"))));
        let mapped = node.map_children(|child, _| child.clone());
        assert_eq!(mapped, node);
    }

    #[test]
    fn unbracketed_depth() {
        let node = sym("a").bracket().bracket();
        assert_eq!(node.unbracketed(), (&sym("a"), 2));
    }

    #[test]
    fn binary_rebuilds_kind() {
        let node = Node::binary(Kind::Quotient, sym("a"), sym("b")).unwrap();
        assert_eq!(node, sym("a") / sym("b"));
        assert!(Node::binary(Kind::Bracket, sym("a"), sym("b")).is_none());
    }
}
