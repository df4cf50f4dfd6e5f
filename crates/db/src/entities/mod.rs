//! `SeaORM` entities.

pub mod activities;
pub mod agencies;
pub mod client_notes;
pub mod client_summary;
pub mod clients;
pub mod documents;
pub mod policies;
pub mod sea_orm_active_enums;
