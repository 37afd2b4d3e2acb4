//! Monetary amounts with precise decimal arithmetic
//!
//! This module provides a single-currency monetary value backed by
//! rust_decimal. Balance checks across journal lines must be exact, so
//! equality and ordering are exact decimal comparisons; the only sanctioned
//! tolerance is [`Amount::approx_eq`], used at input-validation boundaries
//! to absorb client-side rounding before lines are constructed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A monetary amount in the system's single operating currency
///
/// Amounts are stored with four decimal places internally; display uses two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new amount
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp(4))
    }

    /// Creates an amount from an integer number of cents
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Compares two amounts within a tolerance
    ///
    /// This is an input-boundary check only. Once journal lines exist,
    /// invariants are verified with exact equality.
    pub fn approx_eq(&self, other: Amount, tolerance: Decimal) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

/// Default tolerance applied when validating client-supplied line totals
pub fn input_tolerance() -> Decimal {
    dec!(0.001)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_creation() {
        let a = Amount::new(dec!(150.00));
        assert_eq!(a.value(), dec!(150.00));
        assert!(a.is_positive());
    }

    #[test]
    fn test_amount_from_cents() {
        let a = Amount::from_cents(10050);
        assert_eq!(a.value(), dec!(100.50));
    }

    #[test]
    fn test_amount_arithmetic_is_exact() {
        let a = Amount::new(dec!(0.1));
        let b = Amount::new(dec!(0.2));
        assert_eq!((a + b).value(), dec!(0.3));
        assert_eq!((b - a).value(), dec!(0.1));
    }

    #[test]
    fn test_amount_negation() {
        let a = Amount::new(dec!(42.00));
        assert_eq!((-a).value(), dec!(-42.00));
        assert!((-a).is_negative());
    }

    #[test]
    fn test_amount_sum() {
        let total: Amount = [dec!(1.10), dec!(2.20), dec!(3.30)]
            .into_iter()
            .map(Amount::new)
            .sum();
        assert_eq!(total.value(), dec!(6.60));
    }

    #[test]
    fn test_approx_eq_within_tolerance() {
        let a = Amount::new(dec!(50.0004));
        let b = Amount::new(dec!(50.00));
        assert!(a.approx_eq(b, input_tolerance()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_approx_eq_outside_tolerance() {
        let a = Amount::new(dec!(50.00));
        let b = Amount::new(dec!(30.00));
        assert!(!a.approx_eq(b, input_tolerance()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn addition_is_commutative(a in -1_000_000i64..1_000_000i64, b in -1_000_000i64..1_000_000i64) {
            let ma = Amount::from_cents(a);
            let mb = Amount::from_cents(b);
            prop_assert_eq!(ma + mb, mb + ma);
        }

        #[test]
        fn add_then_sub_round_trips(a in -1_000_000i64..1_000_000i64, b in -1_000_000i64..1_000_000i64) {
            let ma = Amount::from_cents(a);
            let mb = Amount::from_cents(b);
            prop_assert_eq!((ma + mb) - mb, ma);
        }

        #[test]
        fn negation_is_involutive(a in -1_000_000i64..1_000_000i64) {
            let ma = Amount::from_cents(a);
            prop_assert_eq!(-(-ma), ma);
        }
    }
}
