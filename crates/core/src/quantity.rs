//! Free-text quantities and their numeric reading.
//!
//! Sheets store every numeric field as the text the user typed. Arithmetic
//! reads that text through [`Quantity::coerce`], which never fails: anything
//! that is not a plain decimal reads as zero.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Neg, Sub};
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Strip every character that is not an ASCII digit or `.`.
///
/// Applied on each keystroke of a numeric field, so malformed characters
/// never reach a table.
pub fn sanitize_numeric(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// A decimal quantity (stock, received, consumed).
///
/// Addition and subtraction saturate at the decimal range instead of
/// overflowing, so no digit-only input can make a sheet fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Read a stored field as a number.
    ///
    /// Accepts an optional leading `-`, digits and at most one `.` (a bare
    /// leading or trailing `.` is fine: `".5"`, `"5."`). Empty, a lone `.`,
    /// anything else, or a value out of decimal range reads as zero.
    pub fn coerce(raw: &str) -> Self {
        parse_plain_decimal(raw).map(Self).unwrap_or(Self::ZERO)
    }

    /// Text form used when a computed value is written back into a table.
    ///
    /// Trailing zeros are dropped (`12.50` renders as `12.5`).
    pub fn render(&self) -> String {
        self.0.normalize().to_string()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

fn parse_plain_decimal(raw: &str) -> Option<Decimal> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if body.matches('.').count() > 1 {
        return None;
    }

    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let plain = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    let value = Decimal::from_str(&plain).ok()?;
    Some(if negative { -value } else { value })
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, q| acc + q)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(raw: &str) -> Decimal {
        Quantity::coerce(raw).value()
    }

    #[test]
    fn sanitize_strips_everything_but_digits_and_dots() {
        assert_eq!(sanitize_numeric("1a2,3.4 kg"), "123.4");
        assert_eq!(sanitize_numeric("-5"), "5");
        assert_eq!(sanitize_numeric("abc"), "");
        assert_eq!(sanitize_numeric("1..2"), "1..2");
    }

    #[test]
    fn coerce_reads_plain_decimals() {
        assert_eq!(q("10"), Decimal::from(10));
        assert_eq!(q("2.5"), Decimal::from_str("2.5").unwrap());
        assert_eq!(q(".5"), Decimal::from_str("0.5").unwrap());
        assert_eq!(q("5."), Decimal::from(5));
        assert_eq!(q("-3"), Decimal::from(-3));
        assert_eq!(q("007"), Decimal::from(7));
    }

    #[test]
    fn coerce_reads_garbage_as_zero() {
        for raw in ["", ".", "-", "1.2.3", "12a", " 1", "1e3", "--1"] {
            assert_eq!(Quantity::coerce(raw), Quantity::ZERO, "input {raw:?}");
        }
    }

    #[test]
    fn render_drops_trailing_zeros() {
        let total = Quantity::coerce("10.50") + Quantity::coerce("2");
        assert_eq!(total.render(), "12.5");
        assert_eq!(Quantity::from(9).render(), "9");
        assert_eq!((Quantity::from(1) - Quantity::from(4)).render(), "-3");
        assert_eq!((Quantity::from(3) - Quantity::from(3)).render(), "0");
    }

    #[test]
    fn decimal_sums_are_exact() {
        let total: Quantity = ["0.1", "0.2"].iter().map(|r| Quantity::coerce(r)).sum();
        assert_eq!(total.render(), "0.3");
    }

    #[test]
    fn arithmetic_saturates_instead_of_overflowing() {
        let big = Quantity::coerce("50000000000000000000000000000");
        assert_ne!(big, Quantity::ZERO);

        assert_eq!((big + big).value(), Decimal::MAX);
        assert_eq!((-big - big).value(), Decimal::MIN);

        let total: Quantity = [big, big, Quantity::from(1)].into_iter().sum();
        assert_eq!(total.value(), Decimal::MAX);
    }

    #[test]
    fn negative_detection_ignores_zero() {
        assert!(Quantity::from(-1).is_negative());
        assert!(!Quantity::ZERO.is_negative());
        assert!(!Quantity::coerce("-0").is_negative());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: sanitized text equals the input minus every disallowed char.
            #[test]
            fn sanitize_removes_exactly_the_disallowed_chars(raw in ".{0,40}") {
                let expected: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                prop_assert_eq!(sanitize_numeric(&raw), expected);
            }

            /// Property: sanitizing is idempotent.
            #[test]
            fn sanitize_is_idempotent(raw in ".{0,40}") {
                let once = sanitize_numeric(&raw);
                prop_assert_eq!(sanitize_numeric(&once), once.clone());
            }

            /// Property: rendering an integer and reading it back is lossless.
            #[test]
            fn rendered_integers_coerce_back(n in -1_000_000i64..1_000_000i64) {
                let qty = Quantity::from(n);
                prop_assert_eq!(Quantity::coerce(&qty.render()), qty);
            }
        }
    }
}
