//! Rupiah amounts
//!
//! Money is stored as whole rupiah in an `i64`. Fractional inputs (a cost
//! line of 2.5 kg, a 11% tax) are multiplied in floating point and rounded
//! half away from zero back to whole rupiah, once, at the point the amount
//! is produced.
//!
//! The operators saturate at the `i64` bounds so aggregates over stored
//! rows never panic. Ledger writes go through the `checked_*` methods,
//! which turn an overflow into `InvalidInput` before anything is stored.

use crate::error::{NiagaError, NiagaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// An amount of Indonesian rupiah.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    /// Zero rupiah.
    pub const ZERO: Rupiah = Rupiah(0);

    /// Largest single amount accepted as input (Rp 1.000.000.000.000.000).
    pub const MAX_INPUT: Rupiah = Rupiah(1_000_000_000_000_000);

    /// Create from whole rupiah.
    pub const fn new(amount: i64) -> Self {
        Rupiah(amount)
    }

    /// Whole rupiah.
    pub const fn amount(self) -> i64 {
        self.0
    }

    /// Round a floating amount to whole rupiah (half away from zero).
    pub fn from_f64_rounded(amount: f64) -> Self {
        Rupiah(amount.round() as i64)
    }

    /// Multiply by a unit count, saturating.
    pub fn times(self, units: i64) -> Self {
        Rupiah(self.0.saturating_mul(units))
    }

    /// `self + rhs`, or `InvalidInput` on overflow.
    pub fn checked_add(self, rhs: Rupiah) -> NiagaResult<Self> {
        self.0.checked_add(rhs.0).map(Rupiah).ok_or_else(out_of_range)
    }

    /// `self − rhs`, or `InvalidInput` on overflow.
    pub fn checked_sub(self, rhs: Rupiah) -> NiagaResult<Self> {
        self.0.checked_sub(rhs.0).map(Rupiah).ok_or_else(out_of_range)
    }

    /// `self × units`, or `InvalidInput` on overflow.
    pub fn checked_times(self, units: i64) -> NiagaResult<Self> {
        self.0.checked_mul(units).map(Rupiah).ok_or_else(out_of_range)
    }

    /// Sum of `amounts`, or `InvalidInput` on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Rupiah>) -> NiagaResult<Self> {
        amounts
            .into_iter()
            .try_fold(Rupiah::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Multiply by a fractional quantity, rounding the result.
    pub fn times_quantity(self, quantity: f64) -> Self {
        Self::from_f64_rounded(self.0 as f64 * quantity)
    }

    /// `percent`% of this amount, rounded.
    pub fn percent(self, percent: f64) -> Self {
        Self::from_f64_rounded(self.0 as f64 * percent / 100.0)
    }

    /// Divide by `units`, rounding half away from zero.
    ///
    /// Returns `None` when `units` is zero.
    pub fn div_round(self, units: u64) -> Option<Self> {
        if units == 0 {
            return None;
        }
        let value = self.0 as i128;
        let units = units as i128;
        let quotient = value / units;
        let remainder = value % units;
        let rounded = if remainder.abs() * 2 >= units {
            quotient + value.signum()
        } else {
            quotient
        };
        Some(Rupiah(rounded as i64))
    }

    /// Round up to the next multiple of `step` (no-op for `step <= 0`).
    pub fn round_up_to(self, step: i64) -> Self {
        if step <= 0 {
            return self;
        }
        let remainder = self.0.rem_euclid(step);
        if remainder == 0 {
            self
        } else {
            Rupiah(self.0.saturating_add(step - remainder))
        }
    }

    /// True when below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// True when zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True when above zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Absolute value.
    pub const fn abs(self) -> Self {
        Rupiah(self.0.saturating_abs())
    }

    /// Parse user input such as `"Rp 1.250.000"`, `"1250000"` or `"12,5"`.
    ///
    /// Dots are thousands separators and a comma is the decimal mark.
    pub fn parse(input: &str) -> NiagaResult<Self> {
        let cleaned: String = input
            .replace("Rp", "")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        if cleaned.is_empty() {
            return Err(NiagaError::invalid_input("empty amount"));
        }
        let value: f64 = cleaned
            .parse()
            .map_err(|_| NiagaError::invalid_input(format!("invalid amount '{}'", input)))?;
        if !value.is_finite() {
            return Err(NiagaError::invalid_input(format!("invalid amount '{}'", input)));
        }
        Ok(Self::from_f64_rounded(value))
    }
}

fn out_of_range() -> NiagaError {
    NiagaError::invalid_input("amount out of range")
}

/// Group digits in threes with `.` separators.
fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(".")
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "Rp {}{}", sign, group_thousands(self.0.unsigned_abs()))
    }
}

impl FromStr for Rupiah {
    type Err = NiagaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rupiah::parse(s)
    }
}

impl From<i64> for Rupiah {
    fn from(amount: i64) -> Self {
        Rupiah(amount)
    }
}

impl Add for Rupiah {
    type Output = Rupiah;

    fn add(self, rhs: Rupiah) -> Rupiah {
        Rupiah(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Rupiah {
    type Output = Rupiah;

    fn sub(self, rhs: Rupiah) -> Rupiah {
        Rupiah(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Rupiah {
    type Output = Rupiah;

    fn neg(self) -> Rupiah {
        Rupiah(self.0.saturating_neg())
    }
}

impl AddAssign for Rupiah {
    fn add_assign(&mut self, rhs: Rupiah) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl SubAssign for Rupiah {
    fn sub_assign(&mut self, rhs: Rupiah) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Rupiah>>(iter: I) -> Rupiah {
        iter.fold(Rupiah::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Rupiah> for Rupiah {
    fn sum<I: Iterator<Item = &'a Rupiah>>(iter: I) -> Rupiah {
        iter.copied().sum()
    }
}
