// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exact monetary and percentage values.
//!
//! Amounts are whole cents so sums over payments, allocations and item
//! prices reconcile without floating point drift. Percentages are basis
//! points (1% = 100).

use crate::error::DomainError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Basis points in 100%.
const FULL_BASIS_POINTS: i64 = 10_000;

/// A monetary amount in cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a count of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount as a count of cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the result does not fit.
    pub const fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        match self.0.checked_add(other.0) {
            Some(cents) => Ok(Self(cents)),
            None => Err(DomainError::AmountOverflow),
        }
    }

    /// Adds two amounts, clamping at the representable maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `other`, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        let diff: i64 = self.0.saturating_sub(other.0);
        if diff < 0 { Self::ZERO } else { Self(diff) }
    }

    /// Absolute difference between two amounts.
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> Self {
        if self.0 >= other.0 {
            Self(self.0.saturating_sub(other.0))
        } else {
            Self(other.0.saturating_sub(self.0))
        }
    }

    /// Sums a sequence of amounts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the sum does not fit.
    pub fn sum<I>(amounts: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Applies a percentage, rounding half away from zero to the cent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the result does not fit.
    pub fn apply_percentage(self, percentage: Percentage) -> Result<Self, DomainError> {
        let product: Decimal = self
            .to_decimal()
            .checked_mul(percentage.to_decimal())
            .ok_or(DomainError::AmountOverflow)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        hundredths(product).map(Self).ok_or(DomainError::AmountOverflow)
    }

    /// The amount as a decimal in currency units.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, CENT_SCALE)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// Number of decimal places kept for amounts and percentages.
const CENT_SCALE: u32 = 2;

/// Parses a plain decimal such as `150`, `150,5` or `-1.50`.
///
/// Only digits, an optional leading `-` and one `.` or `,` separator are
/// accepted; exponents, `+` and digit separators are not. Values with more
/// than two decimal places are rejected.
fn parse_plain_decimal(input: &str) -> Option<Decimal> {
    let normalized: String = input.trim().replace(',', ".");
    let digits: &str = normalized.strip_prefix('-').unwrap_or(&normalized);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let value: Decimal = Decimal::from_str(&normalized).ok()?;
    (value.scale() <= CENT_SCALE).then_some(value)
}

/// Converts a decimal with at most two places into an integer count of
/// hundredths.
fn hundredths(value: Decimal) -> Option<i64> {
    let mut scaled: Decimal = value;
    scaled.rescale(CENT_SCALE);
    i64::try_from(scaled.mantissa()).ok()
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_plain_decimal(s)
            .and_then(hundredths)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidAmount(s.to_string()))
    }
}

/// A percentage stored as basis points, between 0% and 100% inclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// Creates a percentage from basis points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPercentage` outside `0..=10000`.
    pub fn from_basis_points(basis_points: i64) -> Result<Self, DomainError> {
        if (0..=FULL_BASIS_POINTS).contains(&basis_points) {
            Ok(Self(basis_points))
        } else {
            Err(DomainError::InvalidPercentage(format!(
                "{basis_points} basis points"
            )))
        }
    }

    /// Returns the value in basis points.
    #[must_use]
    pub const fn basis_points(self) -> i64 {
        self.0
    }

    /// Returns true for 0%.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The percentage as a fraction of one (10% is `0.1000`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 4)
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", Decimal::new(self.0, CENT_SCALE))
    }
}

impl FromStr for Percentage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let basis_points: i64 = parse_plain_decimal(s.trim().trim_end_matches('%'))
            .and_then(hundredths)
            .ok_or_else(|| DomainError::InvalidPercentage(s.to_string()))?;
        Self::from_basis_points(basis_points)
            .map_err(|_| DomainError::InvalidPercentage(s.to_string()))
    }
}
