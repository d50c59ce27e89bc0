//! Fixed-point money.
//!
//! Amounts are stored as a whole number of minor units (cents). Conversion from
//! a float rounds half up for non-negative values; negative inputs round toward
//! zero instead, which never matters because recorded amounts are non-negative.

use sea_orm::DeriveValueType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// An amount of money in minor units
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveValueType,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Currency(i64);

impl Currency {
    /// Zero minor units
    pub const ZERO: Self = Self(0);

    /// Wraps a raw count of minor units.
    #[must_use]
    pub const fn from_minor_units(units: i64) -> Self {
        Self(units)
    }

    /// Raw count of minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Converts a major-unit float, e.g. `1.345` becomes 135 minor units.
    ///
    /// Multiplies by 100, adds 0.5 and truncates toward zero. Out-of-range
    /// inputs saturate and NaN becomes zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::suboptimal_flops)]
    pub fn from_float(value: f64) -> Self {
        Self((value * 100.0 + 0.5) as i64)
    }

    /// Converts back to major units, e.g. 123 minor units becomes `1.23`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Add for Currency {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Currency {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Currency {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", units / 100, units % 100)
    }
}
