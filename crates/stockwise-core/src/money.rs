//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Cost 15.00 → 1500 cents, Sale 22.50 → 2250 cents                    │
//! │    Every comparison (negative price? margin?) is exact                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockwise_core::money::{margin_percent, Money};
//!
//! let cost = Money::parse("15.00").unwrap();
//! let sale = Money::from_cents(2250);
//!
//! assert_eq!(cost.cents(), 1500);
//! assert_eq!(margin_percent(cost, sale), 50.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that a discount or a negative input can be represented and then
/// rejected by validation instead of wrapping silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockwise_core::money::Money;
    ///
    /// let price = Money::from_cents(950); // 9.50
    /// assert_eq!(price.cents(), 950);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount typed by a user ("22.50", "9,5", "-3").
    ///
    /// ## Rules
    /// - Either `.` or `,` is accepted as the decimal separator
    /// - At most two fractional digits
    /// - Leading `-` is kept (validation decides whether it is allowed)
    ///
    /// ## Example
    /// ```rust
    /// use stockwise_core::money::Money;
    ///
    /// assert_eq!(Money::parse("22.50").unwrap().cents(), 2250);
    /// assert_eq!(Money::parse("9,5").unwrap().cents(), 950);
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        if digits.is_empty() {
            return Err(invalid("must be a number"));
        }

        let normalized = digits.replace(',', ".");
        let (major_str, minor_str) = match normalized.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (normalized.as_str(), ""),
        };

        if minor_str.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(major_str) || !all_digits(minor_str) || (major_str.is_empty() && minor_str.is_empty()) {
            return Err(invalid("must be a number"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("must be a number"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity (sale item subtotals).
    ///
    /// ## Example
    /// ```rust
    /// use stockwise_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(950);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 2850);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Margin
// =============================================================================

/// Profit margin of `sale` over `cost`, as a percentage with two decimals.
///
/// ## Formula
/// ```text
/// margin = round(((sale - cost) / cost) × 100, 2)
/// ```
///
/// A cost of zero or less yields `0.0` instead of dividing by zero.
/// Rounding is half-to-even on the hundredths of a percent, computed in
/// integer basis points so the result is exact.
///
/// ## Example
/// ```rust
/// use stockwise_core::money::{margin_percent, Money};
///
/// assert_eq!(margin_percent(Money::from_cents(0), Money::from_cents(10000)), 0.0);
/// assert_eq!(margin_percent(Money::from_cents(1000), Money::from_cents(1500)), 50.0);
/// assert_eq!(margin_percent(Money::from_cents(2000), Money::from_cents(1500)), -25.0);
/// ```
pub fn margin_percent(cost: Money, sale: Money) -> f64 {
    if cost.cents() <= 0 {
        return 0.0;
    }

    // Basis points: 1 bps = 0.01%
    let numerator = (sale.cents() as i128 - cost.cents() as i128) * 10_000;
    let bps = div_round_half_even(numerator, cost.cents() as i128);

    bps as f64 / 100.0
}

/// Integer division rounding to the nearest value, ties to even.
fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    if remainder == 0 {
        return quotient;
    }

    let twice = remainder.abs() * 2;
    let away = if (numerator < 0) != (denominator < 0) { -1 } else { 1 };

    match twice.cmp(&denominator.abs()) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + away,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + away,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering ("22.50"); currency symbols belong to the
/// application configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(2250);
        assert_eq!(money.cents(), 2250);
        assert_eq!(money.major(), 22);
        assert_eq!(money.minor(), 50);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Money::default(), Money::zero());
        assert!(Money::default().is_zero());
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(15, 0).cents(), 1500);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("15").unwrap().cents(), 1500);
        assert_eq!(Money::parse("15.00").unwrap().cents(), 1500);
        assert_eq!(Money::parse(" 22.5 ").unwrap().cents(), 2250);
        assert_eq!(Money::parse("9,50").unwrap().cents(), 950);
        assert_eq!(Money::parse(".99").unwrap().cents(), 99);
        assert_eq!(Money::parse("-1.25").unwrap().cents(), -125);

        assert!(Money::parse("").is_err());
        assert!(Money::parse("-").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("12a").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(2250).to_string(), "22.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(2250);
        let b = Money::from_cents(1500);

        assert_eq!((a + b).cents(), 3750);
        assert_eq!((a - b).cents(), 750);
        assert_eq!((b * 3).cents(), 4500);
        assert_eq!(b.multiply_quantity(2).cents(), 3000);
    }

    #[test]
    fn test_margin_guarded_division() {
        assert_eq!(margin_percent(Money::zero(), Money::from_cents(10000)), 0.0);
        assert_eq!(margin_percent(Money::from_cents(-100), Money::from_cents(100)), 0.0);
    }

    #[test]
    fn test_margin_values() {
        assert_eq!(margin_percent(Money::from_cents(1000), Money::from_cents(1500)), 50.0);
        assert_eq!(margin_percent(Money::from_cents(2000), Money::from_cents(1500)), -25.0);
        assert_eq!(margin_percent(Money::from_cents(1500), Money::from_cents(2250)), 50.0);
        assert_eq!(margin_percent(Money::from_cents(600), Money::from_cents(950)), 58.33);
    }

    #[test]
    fn test_margin_rounds_half_to_even() {
        // 1/8 = 12.5 bps -> 12 bps, 3/8 = 37.5 bps -> 38 bps
        assert_eq!(div_round_half_even(125, 10), 12);
        assert_eq!(div_round_half_even(375, 10), 38);
        assert_eq!(div_round_half_even(-125, 10), -12);
        assert_eq!(div_round_half_even(-376, 10), -38);
    }
}
