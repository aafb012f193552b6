//! The template generation engine.
//!
//! [`generate`] walks an expression depth-first, left to right, and replaces every template
//! placeholder by a random value drawn under its constraints:
//!
//! | Template          | Draws                                                         |
//! | ----------------- | ------------------------------------------------------------- |
//! | `$e{2}`           | an integer of 1 or 2 digits                                   |
//! | `$e{2;3}`         | an integer of 2 or 3 digits                                   |
//! | `$e[2;9]`         | an integer between 2 and 9                                    |
//! | `$ep`, `$ei`      | an even, or odd and randomly signed, integer                  |
//! | `$d{1;2}`         | a decimal with 1 integer digit and 2 fractional digits        |
//! | `$l{a;b;c}`       | one of the choices                                            |
//! | `${2/4}`, `$$1{}` | the value of the expression, as a fraction or a decimal       |
//! | `$1`, `${1}`      | the first value generated by this call                        |
//!
//! Bounds and exclusions may themselves contain templates, which are generated first, and
//! symbols bound in [`GenerateOptions::bindings`], which are substituted before the bounds are
//! evaluated. Draws rejected by an exclusion are redrawn, at most
//! [`GenerateOptions::max_attempts`] times.
//!
//! Every generated value is recorded, in generation order, in a ledger owned by the call. The
//! back-references `$N` read from it.
//!
//! ```
//! use exo_compute::template::generate;
//! use exo_parser::parse;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let node = parse("$e[2;9]*$1").unwrap();
//! let generated = generate(&node, &mut rng).unwrap().to_string();
//! let (a, b) = generated.split_once('*').unwrap();
//! assert_eq!(a, b);
//! ```

pub mod error;
pub mod exclusion;
pub mod matching;

pub use matching::match_template;

use crate::{
    consts::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PRECISION, MAX_DIGITS, MAX_PRECISION},
    numerical::{decimal_node, error::NonNumeric, eval, integer_value, value, EvalOptions},
    symbolic::{group, substitute_with, SubstituteOptions},
};
use error::{BackReferenceOutOfRange, GenerationExhausted, MalformedTemplate};
use exclusion::Exclusions;
use exo_error::Error;
use exo_parser::{Bounds, Nature, Node, Template};
use rand::Rng;
use rug::{ops::Pow, Integer, Rational};
use std::collections::HashMap;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [`generate_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerateOptions {
    /// How many draws a template may make before [`GenerationExhausted`] is returned.
    pub max_attempts: usize,

    /// The number of decimals kept by `$$` templates that do not give their own.
    pub precision: u32,

    /// Parameters substituted into bounds and exclusions before they are evaluated.
    pub bindings: HashMap<String, String>,

    pub substitution: SubstituteOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            precision: DEFAULT_PRECISION,
            bindings: HashMap::new(),
            substitution: SubstituteOptions::default(),
        }
    }
}

/// Replaces every template in `node` by a random value, using the default [`GenerateOptions`].
pub fn generate<R: Rng + ?Sized>(node: &Node, rng: &mut R) -> Result<Node, Error> {
    generate_with(node, rng, &GenerateOptions::default())
}

/// Like [`generate`], with explicit options.
pub fn generate_with<R: Rng + ?Sized>(
    node: &Node,
    rng: &mut R,
    options: &GenerateOptions,
) -> Result<Node, Error> {
    Generator { rng, options, ledger: Vec::new() }.generate(node)
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::unspanned(MalformedTemplate { reason: reason.into() })
}

/// A random integer with between `min` and `max` digits, `0` counting as a number with no
/// digits. The number of digits is drawn first, then the value among the numbers with at least
/// `min` digits and at most that many.
fn int_of_digits<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> i64 {
    if max == 0 {
        return 0;
    }
    let low = if min == 0 { 0 } else { 10i64.pow(min - 1) };
    let high = 10i64.pow(rng.gen_range(min..=max));
    rng.gen_range(low..high)
}

/// The digits of a fractional part of exactly `digits` digits, never ending with `0`.
fn fraction_digits<R: Rng + ?Sized>(rng: &mut R, digits: u32) -> i64 {
    if digits == 0 {
        return 0;
    }
    int_of_digits(rng, digits - 1, digits - 1) * 10 + rng.gen_range(1..10)
}

/// The state of one generation call.
struct Generator<'a, R: ?Sized> {
    rng: &'a mut R,
    options: &'a GenerateOptions,

    /// The values generated so far, in generation order.
    ledger: Vec<Node>,
}

impl<R: Rng + ?Sized> Generator<'_, R> {
    fn generate(&mut self, node: &Node) -> Result<Node, Error> {
        if let Some(template) = node.as_template() {
            return self.template(template, node);
        }
        node.try_map_children(|child, parent| {
            let generated = self.generate(child)?;
            if child.as_template().is_some() {
                Ok(group(generated, parent))
            } else {
                Ok(generated)
            }
        })
    }

    /// Generates the value of one template, and records it unless it is a back-reference.
    fn template(&mut self, template: &Template, node: &Node) -> Result<Node, Error> {
        debug!(template = %template, "generating");
        let value = match template.nature {
            Nature::BackReference { index, .. } => {
                let value = index.checked_sub(1)
                    .and_then(|i| self.ledger.get(i))
                    .cloned()
                    .ok_or_else(|| Error::unspanned(BackReferenceOutOfRange {
                        index,
                        len: self.ledger.len(),
                    }))?;
                return Ok(value.with_unit_of(node));
            },
            Nature::Integer | Nature::EvenInteger | Nature::OddInteger => self.integer(template)?,
            Nature::Decimal => self.decimal(template)?,
            Nature::List => self.list(template)?,
            Nature::Fraction | Nature::DecimalValue => self.value(template)?,
        };

        let value = value.with_unit_of(node);
        trace!(index = self.ledger.len() + 1, value = %value, "recorded");
        self.ledger.push(value.clone());
        Ok(value)
    }

    /// Generates, substitutes and evaluates a bound or an exclusion operand. A template is
    /// generated and used as is.
    fn resolve(&mut self, node: &Node, options: EvalOptions) -> Result<Node, Error> {
        if let Some(template) = node.as_template() {
            return self.template(template, node);
        }
        let generated = self.generate(node)?;
        let substituted = substitute_with(&generated, &self.options.bindings, self.options.substitution)?;
        eval(&substituted, options)
    }

    /// Like [`Generator::resolve`], keeping the substituted expression when it has no value.
    fn resolve_loosely(&mut self, node: &Node) -> Result<Node, Error> {
        if let Some(template) = node.as_template() {
            return self.template(template, node);
        }
        let generated = self.generate(node)?;
        let substituted = substitute_with(&generated, &self.options.bindings, self.options.substitution)?;
        match eval(&substituted, self.fraction()) {
            Err(err) if err.is::<NonNumeric>() => Ok(substituted),
            result => result,
        }
    }

    fn fraction(&self) -> EvalOptions {
        EvalOptions { decimal: false, precision: self.options.precision }
    }

    fn resolve_value(&mut self, node: &Node) -> Result<Rational, Error> {
        let options = self.fraction();
        value(&self.resolve(node, options)?)
    }

    /// Resolves a number of digits, between 0 and [`MAX_DIGITS`].
    fn digit_count(&mut self, node: &Node) -> Result<u32, Error> {
        let options = self.fraction();
        let resolved = self.resolve(node, options)?;
        integer_value(&resolved)?
            .and_then(|count| count.to_u32())
            .filter(|count| *count <= MAX_DIGITS)
            .ok_or_else(|| malformed(format!(
                "a number of digits must be an integer between 0 and {}, found `{}`",
                MAX_DIGITS,
                resolved,
            )))
    }

    /// Resolves `min` or `min:max` to an inclusive range of digit counts.
    fn digit_span(&mut self, (min, max): &(Node, Option<Node>)) -> Result<(u32, u32), Error> {
        let min = self.digit_count(min)?;
        let max = match max {
            Some(max) => self.digit_count(max)?,
            None => min,
        };
        if min > max {
            return Err(malformed(format!("empty digit range {}:{}", min, max)));
        }
        Ok((min, max))
    }

    fn exclusions(&mut self, template: &Template) -> Result<Exclusions, Error> {
        let mut exclusions = Exclusions::default();
        for node in &template.exclude {
            let value = self.resolve_loosely(node)?;
            exclusions.values.push(value);
        }
        if let Some((min, max)) = &template.exclude_range {
            exclusions.range = Some((self.resolve_value(min)?, self.resolve_value(max)?));
        }
        for (nodes, values) in [
            (&template.exclude_multiple, &mut exclusions.multiples),
            (&template.exclude_divider, &mut exclusions.dividers),
            (&template.exclude_common_dividers_with, &mut exclusions.coprimes),
        ] {
            for node in nodes {
                values.push(self.resolve_value(node)?);
            }
        }
        Ok(exclusions)
    }

    /// Draws until `accept` holds, at most [`GenerateOptions::max_attempts`] times.
    fn sample<T>(
        &mut self,
        mut draw: impl FnMut(&mut R) -> T,
        accept: impl Fn(&T) -> bool,
    ) -> Result<T, Error> {
        for _ in 0..self.options.max_attempts {
            let candidate = draw(&mut *self.rng);
            if accept(&candidate) {
                return Ok(candidate);
            }
        }
        debug!(attempts = self.options.max_attempts, "sampling exhausted");
        Err(Error::unspanned(GenerationExhausted { attempts: self.options.max_attempts }))
    }

    /// Gives a drawn value its sign.
    ///
    /// Relative templates and `$ei` invert a non-zero value on a coin flip. When such a template
    /// is also signed, a value left positive is always written with an explicit `+`, so `$ers`
    /// never shows a bare number. A signed template that cannot invert writes its non-negative
    /// value with a `+` on a coin flip of its own.
    fn sign(&mut self, template: &Template, value: Rational) -> Node {
        let invertible = template.relative || template.nature == Nature::OddInteger;
        if invertible && value.cmp0().is_ne() {
            if self.rng.gen_bool(0.5) {
                return decimal_node(&-value);
            }
            let node = decimal_node(&value);
            return if template.signed && value.cmp0().is_gt() { node.positive() } else { node };
        }

        let node = decimal_node(&value);
        if template.signed && value.cmp0().is_ge() && self.rng.gen_bool(0.5) {
            node.positive()
        } else {
            node
        }
    }

    /// `$e`, `$ep` and `$ei`.
    fn integer(&mut self, template: &Template) -> Result<Node, Error> {
        #[derive(Clone, Copy)]
        enum Draw {
            Digits(u32, u32),
            Range(i64, i64),
        }

        let draw = match &template.bounds {
            Bounds::Digits { min, max } => {
                let min = match min {
                    Some(min) => self.digit_count(min)?,
                    None => 1,
                };
                let max = self.digit_count(max)?;
                if max != 0 && min > max {
                    return Err(malformed(format!("empty digit range {};{}", min, max)));
                }
                Draw::Digits(min, max)
            },
            Bounds::Range { min, max } => {
                let (min, max) = (self.resolve_value(min)?.ceil(), self.resolve_value(max)?.floor());
                match (min.numer().to_i64(), max.numer().to_i64()) {
                    (Some(min), Some(max)) if min <= max => Draw::Range(min, max),
                    _ => return Err(malformed(format!("unusable integer range [{};{}]", min, max))),
                }
            },
            Bounds::Unbounded => {
                return Err(malformed(format!("`{}` needs bounds to be generated", template)));
            },
            _ => return Err(malformed(format!("`{}` has bounds of the wrong shape", template))),
        };

        let exclusions = self.exclusions(template)?;
        let parity = match template.nature {
            Nature::EvenInteger => Some(0),
            Nature::OddInteger => Some(1),
            _ => None,
        };

        let drawn = self.sample(
            |rng| match draw {
                Draw::Digits(min, max) => int_of_digits(rng, min, max),
                Draw::Range(min, max) => rng.gen_range(min..=max),
            },
            |candidate| {
                parity.map_or(true, |parity| candidate.rem_euclid(2) == parity)
                    && !exclusions.rejects(&decimal_node(&Rational::from(*candidate)))
            },
        )?;
        Ok(self.sign(template, Rational::from(drawn)))
    }

    /// `$d`.
    fn decimal(&mut self, template: &Template) -> Result<Node, Error> {
        let Bounds::DecimalDigits { integer, fraction } = &template.bounds else {
            return Err(malformed(format!("`{}` needs digit counts such as {{1;2}}", template)));
        };
        let (integer_min, integer_max) = self.digit_span(integer)?;
        let (fraction_min, fraction_max) = self.digit_span(fraction)?;
        let exclusions = self.exclusions(template)?;

        let drawn = self.sample(
            |rng| {
                let integer_digits = rng.gen_range(integer_min..=integer_max);
                let fraction_digits_count = rng.gen_range(fraction_min..=fraction_max);
                let integer_part = Rational::from(int_of_digits(rng, integer_digits, integer_digits));
                let scale = Integer::from(10).pow(fraction_digits_count);
                let fraction_part = Rational::from((fraction_digits(rng, fraction_digits_count), scale));
                integer_part + fraction_part
            },
            |candidate| !exclusions.rejects(&decimal_node(candidate)),
        )?;
        Ok(self.sign(template, drawn))
    }

    /// `$l`.
    fn list(&mut self, template: &Template) -> Result<Node, Error> {
        let Bounds::Choices(choices) = &template.bounds else {
            return Err(malformed(format!("`{}` needs a list of choices", template)));
        };
        let exclusions = self.exclusions(template)?;

        let remaining = choices.iter()
            .filter(|choice| !exclusions.is_listed(choice))
            .collect::<Vec<_>>();
        if remaining.is_empty() {
            debug!(template = %template, "every choice is excluded");
            return Err(Error::unspanned(GenerationExhausted { attempts: 0 }));
        }

        let chosen = self.sample(
            |rng| remaining[rng.gen_range(0..remaining.len())],
            |choice| !exclusions.rejects(choice),
        )?;
        self.generate(chosen)
    }

    /// `$` and `$$`.
    fn value(&mut self, template: &Template) -> Result<Node, Error> {
        let Bounds::Value(expr) = &template.bounds else {
            return Err(malformed(format!("`{}` needs an expression", template)));
        };
        let options = match template.nature {
            Nature::DecimalValue => {
                let precision = template.precision.unwrap_or(self.options.precision);
                if precision > MAX_PRECISION {
                    return Err(malformed(format!(
                        "`{}` rounds to {} decimal places, at most {} are allowed",
                        template, precision, MAX_PRECISION,
                    )));
                }
                EvalOptions::decimal(precision)
            },
            _ => self.fraction(),
        };
        self.resolve(expr, options)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use exo_parser::parse;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn generate_text(text: &str, rng: &mut StdRng) -> Result<Node, Error> {
        generate(&parse(text).unwrap(), rng)
    }

    fn draw_value(text: &str, rng: &mut StdRng) -> Rational {
        value(&generate_text(text, rng).unwrap()).unwrap()
    }

    #[test]
    fn plain_expressions_are_unchanged() {
        let mut rng = rng();
        let node = parse("2a+(b-3)*cos(x)").unwrap();
        assert_eq!(generate(&node, &mut rng).unwrap(), node);
    }

    #[test]
    fn integer_digits() {
        let mut rng = rng();
        for _ in 0..500 {
            let v = draw_value("$e{2;3}", &mut rng);
            assert!(v >= 10 && v < 1000, "{}", v);
            let v = draw_value("$e{2}", &mut rng);
            assert!(v >= 1 && v < 100, "{}", v);
            let v = draw_value("$e{0;1}", &mut rng);
            assert!(v >= 0 && v < 10, "{}", v);
        }
        assert_eq!(draw_value("$e{0}", &mut rng), 0);
        assert_eq!(draw_value("$e{0;0}", &mut rng), 0);
    }

    #[test]
    fn integer_ranges_and_parity() {
        let mut rng = rng();
        for _ in 0..500 {
            let v = draw_value("$ep[1;9]", &mut rng);
            assert!(v >= 2 && v <= 8 && v.numer().is_even(), "{}", v);

            let v = draw_value("$ei[1;9]", &mut rng);
            let magnitude = Rational::from(v.abs_ref());
            assert!(magnitude >= 1 && magnitude <= 9 && magnitude.numer().is_odd(), "{}", v);

            let v = draw_value("$er[-3;3]", &mut rng);
            assert!(v >= -3 && v <= 3, "{}", v);
        }
    }

    #[test]
    fn relative_draws_both_signs() {
        let mut rng = rng();
        let signs = (0..200)
            .map(|_| draw_value("$er[1;9]", &mut rng).cmp0())
            .collect::<Vec<_>>();
        assert!(signs.iter().any(|sign| sign.is_lt()));
        assert!(signs.iter().any(|sign| sign.is_gt()));
    }

    #[test]
    fn signed_writes_a_plus() {
        let mut rng = rng();
        let texts = (0..200)
            .map(|_| generate_text("$es[1;9]", &mut rng).unwrap().to_string())
            .collect::<Vec<_>>();
        assert!(texts.iter().any(|text| text.starts_with('+')));
        assert!(texts.iter().any(|text| !text.starts_with('+')));
        assert!(texts.iter().all(|text| !text.starts_with('-')));
    }

    #[test]
    fn relative_signed_is_always_explicit() {
        let mut rng = rng();
        let texts = (0..200)
            .map(|_| generate_text("$ers[1;9]", &mut rng).unwrap().to_string())
            .collect::<Vec<_>>();
        assert!(texts.iter().all(|text| text.starts_with('+') || text.starts_with('-')), "{:?}", texts);
        assert!(texts.iter().any(|text| text.starts_with('+')));
        assert!(texts.iter().any(|text| text.starts_with('-')));
    }

    #[test]
    fn exclusions() {
        let mut rng = rng();
        for _ in 0..500 {
            let v = draw_value("$e[1;10]\\{5}", &mut rng);
            assert_ne!(v, 5);

            let v = draw_value("$e[1;20]\\[3;15]", &mut rng);
            assert!(v < 3 || v > 15, "{}", v);

            let v = draw_value("$e[1;20]\\m{3}", &mut rng);
            assert!(!v.numer().is_divisible_u(3), "{}", v);

            let v = draw_value("$e[1;12]\\d{12}", &mut rng);
            assert!(!Integer::from(12).is_divisible(v.numer()), "{}", v);

            let v = draw_value("$e[1;30]\\g{6}", &mut rng);
            assert_eq!(Integer::from(v.numer().gcd_ref(&Integer::from(6))), 1);
        }
    }

    #[test]
    fn exhausted() {
        let mut rng = rng();
        let err = generate_text("$e[5;5]\\{5}", &mut rng).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GenerationExhausted>(),
            Some(&GenerationExhausted { attempts: DEFAULT_MAX_ATTEMPTS }),
        );

        let options = GenerateOptions { max_attempts: 3, ..Default::default() };
        let err = generate_with(&parse("$ep[3;3]").unwrap(), &mut rng, &options).unwrap_err();
        assert_eq!(err.downcast_ref::<GenerationExhausted>(), Some(&GenerationExhausted { attempts: 3 }));

        let err = generate_text("$l{a;b}\\{a;b}", &mut rng).unwrap_err();
        assert!(err.is::<GenerationExhausted>());
    }

    #[test]
    fn decimals() {
        let mut rng = rng();
        for _ in 0..500 {
            let text = generate_text("$d{2;3}", &mut rng).unwrap().to_string();
            let (integer, fraction) = text.split_once('.').unwrap();
            assert_eq!(integer.len(), 2, "{}", text);
            assert_eq!(fraction.len(), 3, "{}", text);
            assert!(!fraction.ends_with('0'), "{}", text);

            let text = generate_text("$d{1:2;0:1}", &mut rng).unwrap().to_string();
            let integer = text.split('.').next().unwrap();
            assert!((1..=2).contains(&integer.len()), "{}", text);
        }
        assert_eq!(generate_text("$d{0;0}", &mut rng).unwrap().to_string(), "0");
    }

    #[test]
    fn lists() {
        let mut rng = rng();
        for _ in 0..200 {
            let text = generate_text("$l{a;b;c}\\{b}", &mut rng).unwrap().to_string();
            assert!(text == "a" || text == "c", "{}", text);

            let v = draw_value("$l{2;3;4;6}\\m{2}", &mut rng);
            assert_eq!(v, 3);

            let v = draw_value("$l{$e[1;3];7}", &mut rng);
            assert!(v >= 1 && v <= 7, "{}", v);
        }
    }

    #[test]
    fn values() {
        let mut rng = rng();
        assert_eq!(generate_text("${2/4}", &mut rng).unwrap().to_string(), "1/2");
        assert_eq!(generate_text("$${2/3}", &mut rng).unwrap().to_string(), "0.67");
        assert_eq!(generate_text("$$1{2/3}", &mut rng).unwrap().to_string(), "0.7");
        assert_eq!(
            generate_text("$$70{1/3}", &mut rng).unwrap().to_string(),
            format!("0.{}", "3".repeat(70)),
        );

        let options = GenerateOptions {
            bindings: HashMap::from([("a".to_string(), "3".to_string())]),
            ..Default::default()
        };
        let node = generate_with(&parse("${2a+pi}").unwrap(), &mut rng, &options).unwrap();
        assert_eq!(node.to_string(), "457/50");
    }

    #[test]
    fn back_references() {
        let mut rng = rng();
        for _ in 0..200 {
            let text = generate_text("$e{1}+${1}", &mut rng).unwrap().to_string();
            let (a, b) = text.split_once('+').unwrap();
            assert_eq!(a, b);

            let text = generate_text("$e[2;5]*$e[6;9]-$2", &mut rng).unwrap().to_string();
            let (product, reference) = text.split_once('-').unwrap();
            assert_eq!(product.split_once('*').unwrap().1, reference);
        }

        let err = generate_text("$e{1}+$2", &mut rng).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BackReferenceOutOfRange>(),
            Some(&BackReferenceOutOfRange { index: 2, len: 1 }),
        );
    }

    #[test]
    fn nested_bounds_are_generated_first() {
        let mut rng = rng();
        for _ in 0..200 {
            let text = generate_text("$e[1;$e[2;4]]+$1", &mut rng).unwrap().to_string();
            let (value, bound) = text.split_once('+').unwrap();
            let (value, bound) = (value.parse::<u32>().unwrap(), bound.parse::<u32>().unwrap());
            assert!((2..=4).contains(&bound));
            assert!(value >= 1 && value <= bound);
        }
    }

    #[test]
    fn negative_values_are_bracketed() {
        let mut rng = rng();
        for _ in 0..100 {
            let node = generate_text("3+$er[1;9]", &mut rng).unwrap();
            let text = node.to_string();
            assert!(!text.contains("+-"), "{}", text);
            assert_eq!(parse(&text).unwrap(), node);
        }
    }

    #[test]
    fn units_are_attached() {
        let mut rng = rng();
        let text = generate_text("$e[3;3] km", &mut rng).unwrap().to_string();
        assert_eq!(text, "3 km");
    }

    #[test]
    fn malformed_templates() {
        let mut rng = rng();
        assert!(generate_text("$e", &mut rng).unwrap_err().is::<MalformedTemplate>());
        assert!(generate_text("$e[5;2]", &mut rng).unwrap_err().is::<MalformedTemplate>());
        assert!(generate_text("$e{3;2}", &mut rng).unwrap_err().is::<MalformedTemplate>());
        assert!(generate_text("$e{19}", &mut rng).unwrap_err().is::<MalformedTemplate>());
        assert!(generate_text("$$4000000000{1}", &mut rng).unwrap_err().is::<MalformedTemplate>());
    }

    #[test]
    fn ledgers_are_not_shared() {
        let mut rng = rng();
        generate_text("$e{1}", &mut rng).unwrap();
        assert!(generate_text("$1", &mut rng).unwrap_err().is::<BackReferenceOutOfRange>());
    }
}
