//! An amount of Thai baht, backed by [rust_decimal::Decimal].

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Error;

/// Amounts are kept to the satang (one hundredth of a baht).
const DECIMAL_PLACES: u32 = 2;

/// A non-negative amount of money with at most two decimal places.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero baht.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wrap `value` as an amount.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `value` is negative or has more than
    /// two decimal places.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        if value.normalize().scale() > DECIMAL_PLACES {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        Ok(Self(value))
    }

    /// Create an amount from a whole number of satang.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `satang` is negative.
    pub fn from_satang(satang: i64) -> Result<Self, Error> {
        Self::new(Decimal::new(satang, DECIMAL_PLACES))
    }

    /// Create an amount from a whole number of baht.
    pub fn from_baht(baht: u32) -> Self {
        Self(Decimal::from(baht))
    }

    /// The amount as a whole number of satang, saturating at [i64::MAX].
    pub fn as_satang(self) -> i64 {
        (self.0 * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// The amount in baht as a float, for charting.
    pub fn as_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse a number of baht with at most two decimal places, e.g. "1500",
    /// "99.5" or "1,250.75".
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAmount(text.to_owned());
        let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();

        // Signs and exponents are not accepted.
        if !cleaned.chars().any(|c| c.is_ascii_digit())
            || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(invalid());
        }

        let value = match cleaned.strip_prefix('.') {
            Some(fraction) => Decimal::from_str(&format!("0.{fraction}")),
            None => Decimal::from_str(&cleaned),
        }
        .map_err(|_| invalid())?;

        Self::new(value).map_err(|_| invalid())
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract().is_zero() {
            write!(f, "{}", self.0.trunc().normalize())
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Amounts travel as JSON numbers.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;

        Amount::new(value.round_dp(DECIMAL_PLACES)).map_err(de::Error::custom)
    }
}
