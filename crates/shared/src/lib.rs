//! Shared types, errors, and configuration for BrokerDesk.
//!
//! This crate provides common types used across all other crates:
//! - JWT claims and token validation
//! - Pagination and response envelope types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtError, JwtService};
