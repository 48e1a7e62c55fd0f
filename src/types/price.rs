use crate::types::errors::PriceError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A positive listing price in whole currency units.
///
/// Chat senders quote prices as bare integers (`3000`), occasionally with a
/// fractional part (`13.5`). Fractions are truncated toward zero, matching how
/// the listings are published, and anything that truncates to zero is rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Price(u32);

impl Price {
    pub fn new(value: u32) -> Result<Self, PriceError> {
        if value == 0 {
            return Err(PriceError::NotPositive);
        }

        Ok(Price(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Inclusive range check used by the per-grammar plausibility bounds.
    pub fn within(&self, min: u32, max: u32) -> bool {
        (min..=max).contains(&self.0)
    }

    /// Converts an already-parsed decimal, truncating any fraction.
    pub fn from_decimal(value: Decimal) -> Result<Self, PriceError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceError::NotPositive);
        }

        let whole = value.trunc().to_u32().ok_or(PriceError::Overflow)?;

        Price::new(whole)
    }
}

impl Display for Price {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(PriceError::InvalidFormat("Value is an empty string".to_string()));
        }

        //NOTE: Digit runs captured from chat text can be arbitrarily long, so the integer path is checked before the decimal one
        if value.bytes().all(|byte| byte.is_ascii_digit()) {
            let whole: u32 = value.parse().map_err(|_| PriceError::Overflow)?;
            return Price::new(whole);
        }

        let decimal = Decimal::from_str(value).map_err(|error| {
            PriceError::InvalidFormat(format!("Value is not a number: {error}"))
        })?;

        Price::from_decimal(decimal)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}
