//! Helpers for partial updates and field validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Deserializes a present field into `Some`, keeping `null` as `Some(None)`.
///
/// Used with `#[serde(default)]` on `Option<Option<T>>` fields: an absent
/// field stays `None` (leave untouched), `null` clears the value and anything
/// else sets it.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("must_not_be_negative"));
    }
    Ok(())
}

pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("must_be_positive"));
    }
    Ok(())
}

/// APR in percent.
pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    if *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("must_be_at_most_100"));
    }
    Ok(())
}

/// ISO 4217 style code: three ASCII uppercase letters.
pub fn currency_code(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_currency_code"))
    }
}
