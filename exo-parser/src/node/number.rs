use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A non-negative decimal literal.
///
/// The digits are kept in normalized textual form: no leading zeros in the integer part, no
/// trailing zeros in the fractional part, and `.` as the decimal separator. Two numbers are
/// therefore equal exactly when their values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Number(String);

impl Number {
    /// Builds a number from its integer and fractional digit strings. Every character of both
    /// strings must be an ASCII digit; returns [`None`] otherwise.
    pub fn from_parts(integer: &str, fraction: &str) -> Option<Self> {
        if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        let integer = if integer.is_empty() { "0" } else { integer };

        if fraction.is_empty() {
            Some(Self(integer.to_owned()))
        } else {
            Some(Self(format!("{}.{}", integer, fraction)))
        }
    }

    /// The normalized text of the number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digits before the decimal point.
    pub fn integer_part(&self) -> &str {
        self.0.split('.').next().unwrap_or("0")
    }

    /// The digits after the decimal point, empty for integers.
    pub fn fraction_part(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, fraction)| fraction)
    }

    /// Returns true if the number has no fractional digits.
    pub fn is_integer(&self) -> bool {
        !self.0.contains('.')
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    /// The value of the number as a `u64`, if it is an integer small enough to fit.
    pub fn to_u64(&self) -> Option<u64> {
        if self.is_integer() {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for Number {
    type Err = ();

    /// Parses `123`, `00123,4500` or `0.5` (either `.` or `,` separates the fractional part).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (integer, fraction) = match s.split_once(['.', ',']) {
            Some((integer, fraction)) => (integer, fraction),
            None => (s, ""),
        };
        Self::from_parts(integer, fraction).ok_or(())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn strips_leading_and_trailing_zeros() {
        assert_eq!(Number::from_parts("00123", "44500").unwrap().as_str(), "123.445");
        assert_eq!(Number::from_parts("000", "000").unwrap().as_str(), "0");
        assert_eq!(Number::from_parts("", "5").unwrap().as_str(), "0.5");
    }

    #[test]
    fn comma_separator() {
        let n: Number = "123,45".parse().unwrap();
        assert_eq!(n.as_str(), "123.45");
        assert_eq!(n.integer_part(), "123");
        assert_eq!(n.fraction_part(), "45");
        assert!(!n.is_integer());
    }

    #[test]
    fn rejects_non_digits() {
        assert!("12a".parse::<Number>().is_err());
        assert!(Number::from_parts("1", "-2").is_none());
    }

    #[test]
    fn small_integers() {
        assert_eq!(Number::from(42).to_u64(), Some(42));
        assert_eq!("4.2".parse::<Number>().unwrap().to_u64(), None);
    }
}
