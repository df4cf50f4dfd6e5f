//! Policy validation rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::PolicyError;
use super::types::{NewPolicy, Policy, PolicyChanges};

/// Checks that coverage ends strictly after it starts.
pub fn validate_term(effective: NaiveDate, expiration: NaiveDate) -> Result<(), PolicyError> {
    if expiration <= effective {
        return Err(PolicyError::InvalidTerm {
            effective,
            expiration,
        });
    }
    Ok(())
}

/// Decimal places a premium may carry.
pub const PREMIUM_SCALE: u32 = 2;

/// Largest premium a `NUMERIC(12, 2)` column holds.
#[must_use]
pub fn max_premium() -> Decimal {
    Decimal::new(999_999_999_999, PREMIUM_SCALE)
}

/// Checks that a premium is not negative and fits `NUMERIC(12, 2)`.
///
/// Trailing zeros do not count against the scale, so `1250.500` passes.
pub fn validate_premium(premium: Decimal) -> Result<(), PolicyError> {
    if premium.is_sign_negative() && !premium.is_zero() {
        return Err(PolicyError::NegativePremium(premium));
    }
    if premium > max_premium() {
        return Err(PolicyError::PremiumTooLarge(premium));
    }
    if premium.normalize().scale() > PREMIUM_SCALE {
        return Err(PolicyError::PremiumPrecision(premium));
    }
    Ok(())
}

/// Checks that details is a JSON object.
pub fn validate_details(details: &serde_json::Value) -> Result<(), PolicyError> {
    if details.is_object() {
        Ok(())
    } else {
        Err(PolicyError::InvalidDetails)
    }
}

/// Validates a new policy.
pub fn validate_new_policy(policy: &NewPolicy) -> Result<(), PolicyError> {
    validate_term(policy.effective_date, policy.expiration_date)?;
    validate_premium(policy.premium)?;
    validate_details(&policy.details)
}

/// Validates changes against the stored policy they would be applied to.
pub fn validate_changes(current: &Policy, changes: &PolicyChanges) -> Result<(), PolicyError> {
    if changes.effective_date.is_some() || changes.expiration_date.is_some() {
        let (effective, expiration) = changes.merged_term(current);
        validate_term(effective, expiration)?;
    }
    if let Some(premium) = changes.premium {
        validate_premium(premium)?;
    }
    if let Some(details) = &changes.details {
        validate_details(details)?;
    }
    Ok(())
}
