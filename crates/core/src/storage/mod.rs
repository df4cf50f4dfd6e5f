//! Object storage for documents using Apache OpenDAL.
//!
//! Supported backends:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! Browsers upload and download directly against signed URLs; the API only
//! hands those out and removes objects when a document is deleted.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Apache OpenDAL                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ op.presign_write("key", ttl)   │ op.presign_read("key", ttl)     │
//! │ op.delete("key")               │                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{
    MAX_DOWNLOAD_TTL_SECS, MIN_DOWNLOAD_TTL_SECS, PresignedUrl, StorageService, sanitize_filename,
};
