//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped to the caller's agency.

pub mod activity;
pub mod agency;
pub mod client;
pub mod dashboard;
pub mod document;
pub mod note;
pub mod policy;
pub mod search;

mod query;

#[cfg(test)]
mod fixtures;

pub use activity::{ActivityError, ActivityFilter, ActivityRepository};
pub use agency::AgencyRepository;
pub use client::{ClientError, ClientFilter, ClientRepository};
pub use dashboard::DashboardRepository;
pub use document::{DocumentFilter, DocumentRepository};
pub use note::{NoteError, NoteRepository};
pub use policy::{PolicyError, PolicyFilter, PolicyRepository};
pub use search::SearchRepository;
