//! Business-value checks shared by the merchant and transaction operations.

use crate::{
    core::currency::Currency,
    errors::{Error, Result},
};
use sea_orm::prelude::Uuid;
use validator::ValidateEmail;

/// Validates an email address and returns it lower-cased.
pub fn normalize_email(email: &str) -> Result<String> {
    let trimmed = email.trim();
    if !trimmed.validate_email() {
        return Err(Error::Validation {
            message: format!("{email:?} is not a valid email address"),
        });
    }
    Ok(trimmed.to_lowercase())
}

/// Parses an externally supplied transaction identifier.
pub fn parse_external_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|e| Error::Validation {
        message: format!("{value:?} is not a valid uuid: {e}"),
    })
}

/// Largest amount, in major units, whose minor units fit the stored column.
#[allow(clippy::cast_precision_loss)]
const MAX_AMOUNT: f64 = i64::MAX as f64 / 100.0;

/// Converts a major-unit amount, rejecting negative, non-finite and
/// unrepresentably large values.
pub fn parse_amount(amount: f64) -> Result<Currency> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation {
            message: format!("{amount} is not a valid amount"),
        });
    }
    if amount >= MAX_AMOUNT {
        return Err(Error::Validation {
            message: format!("{amount} exceeds the largest storable amount"),
        });
    }
    Ok(Currency::from_float(amount))
}
