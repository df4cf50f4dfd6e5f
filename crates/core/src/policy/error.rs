//! Policy error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Policy rule violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// Coverage must end after it starts.
    #[error("expiration_date ({expiration}) must be after effective_date ({effective})")]
    InvalidTerm {
        /// First day of coverage.
        effective: NaiveDate,
        /// Last day of coverage.
        expiration: NaiveDate,
    },

    /// Premiums cannot be negative.
    #[error("premium must be zero or greater, got {0}")]
    NegativePremium(Decimal),

    /// Premium does not fit the stored precision.
    #[error("premium must be at most 9999999999.99, got {0}")]
    PremiumTooLarge(Decimal),

    /// Premiums are stored in cents.
    #[error("premium must have at most 2 decimal places, got {0}")]
    PremiumPrecision(Decimal),

    /// Details must be a JSON object.
    #[error("details must be a JSON object")]
    InvalidDetails,
}
