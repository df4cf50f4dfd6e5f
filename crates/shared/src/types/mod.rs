//! Common types used across the application.

pub mod pagination;
pub mod response;

pub use pagination::{PageRequest, PageResponse};
pub use response::{ApiResponse, ErrorBody};
