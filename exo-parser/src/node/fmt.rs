//! Canonical text output.
//!
//! The output mirrors the tree exactly: brackets appear only where the tree holds a
//! [`Expr::Bracket`] node, every product is written with `*`, and templates are written back in
//! their source syntax.

use super::{template::{Bounds, Nature, Template}, Expr, Node};
use std::fmt::{self, Display, Formatter};

/// Writes the items separated by `;`.
fn write_list(f: &mut Formatter, items: &[Node]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ";")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Writes `a` or `a:b`.
fn write_span(f: &mut Formatter, (first, second): &(Node, Option<Node>)) -> fmt::Result {
    write!(f, "{}", first)?;
    if let Some(second) = second {
        write!(f, ":{}", second)?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Symbol(name) | Self::SegmentLength(name) => write!(f, "{}", name),
            Self::Hole => write!(f, "?"),
            Self::Error(message) => write!(f, "Error: {}", message),
            Self::Bracket(inner) => write!(f, "({})", inner),
            Self::Opposite(inner) => write!(f, "-{}", inner),
            Self::Positive(inner) => write!(f, "+{}", inner),
            Self::Sum(lhs, rhs) => write!(f, "{}+{}", lhs, rhs),
            Self::Difference(lhs, rhs) => write!(f, "{}-{}", lhs, rhs),
            Self::Product(lhs, rhs) => write!(f, "{}*{}", lhs, rhs),
            Self::Quotient(lhs, rhs) => write!(f, "{}/{}", lhs, rhs),
            Self::Division(lhs, rhs) => write!(f, "{}:{}", lhs, rhs),
            Self::Power(lhs, rhs) => write!(f, "{}^{}", lhs, rhs),
            Self::Percentage(inner) => write!(f, "{}%", inner),
            Self::Function(name, args) => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            },
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Equality(lhs, rhs) => write!(f, "{}={}", lhs, rhs),
            Self::Unequality(lhs, rhs) => write!(f, "{}!={}", lhs, rhs),
            Self::Inequality(relation, lhs, rhs) => write!(f, "{}{}{}", lhs, relation.symbol(), rhs),
            Self::Template(template) => write!(f, "{}", template),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.nature {
            Nature::Integer => write!(f, "$e")?,
            Nature::EvenInteger => write!(f, "$ep")?,
            Nature::OddInteger => write!(f, "$ei")?,
            Nature::Decimal => write!(f, "$d")?,
            Nature::List => write!(f, "$l")?,
            Nature::Fraction => write!(f, "$")?,
            Nature::DecimalValue => {
                write!(f, "$$")?;
                if let Some(precision) = self.precision {
                    write!(f, "{}", precision)?;
                }
            },
            Nature::BackReference { index, braced: true } => return write!(f, "${{{}}}", index),
            Nature::BackReference { index, braced: false } => return write!(f, "${}", index),
        }

        if self.relative {
            write!(f, "r")?;
        }
        if self.signed {
            write!(f, "s")?;
        }

        match &self.bounds {
            Bounds::Unbounded => {},
            Bounds::Digits { min: None, max } => write!(f, "{{{}}}", max)?,
            Bounds::Digits { min: Some(min), max } => write!(f, "{{{};{}}}", min, max)?,
            Bounds::Range { min, max } => write!(f, "[{};{}]", min, max)?,
            Bounds::DecimalDigits { integer, fraction } => {
                write!(f, "{{")?;
                write_span(f, integer)?;
                write!(f, ";")?;
                write_span(f, fraction)?;
                write!(f, "}}")?;
            },
            Bounds::Choices(choices) => {
                write!(f, "{{")?;
                write_list(f, choices)?;
                write!(f, "}}")?;
            },
            Bounds::Value(value) => write!(f, "{{{}}}", value)?,
        }

        if !self.exclude.is_empty() {
            write!(f, "\\{{")?;
            write_list(f, &self.exclude)?;
            write!(f, "}}")?;
        }
        if let Some((min, max)) = &self.exclude_range {
            write!(f, "\\[{};{}]", min, max)?;
        }
        for (tag, list) in [
            ('m', &self.exclude_multiple),
            ('d', &self.exclude_divider),
            ('g', &self.exclude_common_dividers_with),
        ] {
            if !list.is_empty() {
                write!(f, "\\{}{{", tag)?;
                write_list(f, list)?;
                write!(f, "}}")?;
            }
        }

        Ok(())
    }
}
