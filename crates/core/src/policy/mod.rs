//! Insurance policies.
//!
//! Types, statuses and the rules a policy must satisfy before it is stored.

mod error;
mod types;
mod validation;

pub use error::PolicyError;
pub use types::{NewPolicy, Policy, PolicyChanges, PolicyStatus, PolicyType, PolicyWithClient};
pub use validation::{
    PREMIUM_SCALE, max_premium, validate_changes, validate_details, validate_new_policy,
    validate_premium, validate_term,
};
