// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Minor units per major unit (cents per dollar, kopeks per ruble).
pub const MINOR_PER_MAJOR: i64 = 100;
const SCALE: u32 = 2;

/// Signed monetary amount held as an exact count of minor units.
///
/// Stored as `INTEGER`, displayed with exactly two fractional digits:
///
/// ```rust
/// use ledgerlens::money::Money;
///
/// let amount: Money = "123.04".parse().unwrap();
/// assert_eq!(amount.minor_units(), 12_304);
/// assert_eq!(amount.to_string(), "123.04");
/// assert_eq!(Money::from_minor(-5).to_string(), "-0.05");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Converts a display amount into minor units without rounding.
    ///
    /// Amounts finer than one minor unit are rejected rather than rounded.
    pub fn from_decimal(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.normalize().scale() > SCALE {
            return Err(ValidationError::InvalidAmount(format!(
                "{amount} has more than {SCALE} decimal places"
            )));
        }
        amount
            .checked_mul(Decimal::from(MINOR_PER_MAJOR))
            .and_then(|minor| minor.to_i64())
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidAmount(format!("{amount} is out of range")))
    }

    /// Rounds a fractional minor-unit value (store averages and
    /// percentiles) to the nearest minor unit, half away from zero.
    #[must_use]
    pub fn from_minor_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let rounded = value.round();
        if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
            return None;
        }
        Some(Self(rounded as i64))
    }

    /// Integer mean of `self` over `count` entries, rounded half away from zero.
    #[must_use]
    pub fn div_round(self, count: u64) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let numerator = i128::from(self.0);
        let denominator = i128::from(count);
        let quotient = numerator / denominator;
        let remainder = numerator % denominator;
        let adjust = if 2 * remainder.abs() >= denominator {
            numerator.signum()
        } else {
            0
        };
        i64::try_from(quotient + adjust).ok().map(Self)
    }

    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

/// Sign-preserving: the sign is written once, major and minor parts come
/// from the absolute value (`-5` minor units is `-0.05`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidAmount("empty amount".to_string()));
        }
        let amount = trimmed.parse::<Decimal>().map_err(|_| {
            ValidationError::InvalidAmount(format!("'{trimmed}' is not a number"))
        })?;
        Self::from_decimal(amount)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}
