//! Core business logic for BrokerDesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `client` - Client records and contact normalization
//! - `policy` - Policy types, statuses and term validation
//! - `activity` - Activity types and completion rules
//! - `note` - Client notes
//! - `links` - Client/policy linkage rules shared by activities and documents
//! - `renewal` - Renewal windows, urgency and agency-local "today"
//! - `listing` - Sort whitelists for list endpoints
//! - `search` - Global search query parsing and result merging
//! - `dashboard` - Dashboard metric types
//! - `document` - Document records and signed URL workflow
//! - `storage` - Object storage via OpenDAL

pub mod activity;
pub mod client;
pub mod dashboard;
pub mod document;
pub mod links;
pub mod listing;
pub mod note;
pub mod policy;
pub mod renewal;
pub mod search;
pub mod storage;
