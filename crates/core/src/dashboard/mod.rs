//! Dashboard metrics types.
//!
//! This module provides types for dashboard data:
//! - Headline agency statistics
//! - Renewal rows with days-until-expiration
//! - Upcoming open activities

pub mod types;

pub use types::*;
