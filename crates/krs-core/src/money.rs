//! # Money Module
//!
//! Provides the `Money` type for tuition amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Course fees are quoted in whole Rupiah (Rp 450.000, Rp 600.000).      │
//! │                                                                         │
//! │  The Rupiah has no minor unit in practice, so the amount is stored     │
//! │  as a plain i64 count of Rupiah. Sums over a whole semester stay       │
//! │  exact and never touch floating point.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use krs_core::money::Money;
//!
//! let fee = Money::from_rupiah(450_000);
//! let total = fee + Money::from_rupiah(600_000);
//! assert_eq!(total.to_string(), "Rp 1.050.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole Rupiah.
///
/// ## Where Money is Used
/// ```text
/// Course.cost ──► AggregateSnapshot.total_cost ──► CommitRecord.total_cost
///                              │
///                              └──► "Rp 1.050.000" in the review dialog
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a Rupiah amount.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the amount in Rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Zero Rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds. Catalog costs are unbounded from
// above, so a sum must never wrap into a small or negative total.

/// Formats with Indonesian digit grouping: `Rp 1.050.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_rupiah(0).to_string(), "Rp 0");
        assert_eq!(Money::from_rupiah(950).to_string(), "Rp 950");
        assert_eq!(Money::from_rupiah(4_500).to_string(), "Rp 4.500");
        assert_eq!(Money::from_rupiah(450_000).to_string(), "Rp 450.000");
        assert_eq!(Money::from_rupiah(1_050_000).to_string(), "Rp 1.050.000");
        assert_eq!(Money::from_rupiah(-600_000).to_string(), "-Rp 600.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(600_000);
        let b = Money::from_rupiah(450_000);

        assert_eq!((a + b).rupiah(), 1_050_000);
        assert_eq!((a - b).rupiah(), 150_000);

        let mut c = Money::zero();
        c += a;
        assert_eq!(c, a);
    }

    #[test]
    fn test_sum() {
        let fees = [Money::from_rupiah(450_000), Money::from_rupiah(600_000)];
        let total: Money = fees.iter().sum();
        assert_eq!(total.rupiah(), 1_050_000);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_saturating_arithmetic() {
        let big = Money::from_rupiah(i64::MAX - 10);
        let total: Money = [big, Money::from_rupiah(600_000)].iter().sum();
        assert_eq!(total.rupiah(), i64::MAX);

        let mut c = big;
        c += big;
        assert_eq!(c.rupiah(), i64::MAX);

        assert_eq!((Money::from_rupiah(i64::MIN) - big).rupiah(), i64::MIN);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_rupiah(450_000)).unwrap();
        assert_eq!(json, "450000");
    }
}
