//! Storage service implementation using Apache OpenDAL.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use opendal::{Operator, services};
use serde::Serialize;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Shortest download URL lifetime a caller may request.
pub const MIN_DOWNLOAD_TTL_SECS: u64 = 60;

/// Longest download URL lifetime a caller may request (7 days).
pub const MAX_DOWNLOAD_TTL_SECS: u64 = 604_800;

/// Presigned URL for upload or download.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,
    /// HTTP method to use (PUT for upload, GET for download).
    pub method: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
    /// Required headers for the request.
    pub headers: HashMap<String, String>,
}

/// Storage service for client and policy documents.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.config.provider.name())
            .field("bucket", &self.config.provider.bucket())
            .finish_non_exhaustive()
    }
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// Either value may be unknown up front; only known values are checked.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(
        &self,
        content_type: Option<&str>,
        size: Option<u64>,
    ) -> Result<(), StorageError> {
        if let Some(size) = size
            && size > self.config.max_file_size
        {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if let Some(content_type) = content_type
            && !self.config.is_mime_type_allowed(content_type)
        {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate presigned URL for uploading to `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if presigning is not supported or fails.
    pub async fn presign_upload(
        &self,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<PresignedUrl, StorageError> {
        let ttl_secs = self.config.presign_upload_ttl_secs;

        let presigned = self
            .operator
            .presign_write(key, Duration::from_secs(ttl_secs))
            .await
            .map_err(StorageError::from)?;

        let mut headers = HashMap::new();
        if let Some(content_type) = content_type {
            headers.insert("Content-Type".to_string(), content_type.to_string());
        }

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: expires_at(ttl_secs),
            headers,
        })
    }

    /// Generate presigned URL for download.
    ///
    /// `ttl_secs` overrides the configured lifetime and is clamped to
    /// `MIN_DOWNLOAD_TTL_SECS..=MAX_DOWNLOAD_TTL_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if presigning is not supported or fails.
    pub async fn presign_download(
        &self,
        key: &str,
        ttl_secs: Option<u64>,
    ) -> Result<PresignedUrl, StorageError> {
        let ttl_secs = self.download_ttl(ttl_secs);

        let presigned = self
            .operator
            .presign_read(key, Duration::from_secs(ttl_secs))
            .await
            .map_err(StorageError::from)?;

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: expires_at(ttl_secs),
            headers: HashMap::new(),
        })
    }

    /// Resolves the download URL lifetime for an optional request.
    #[must_use]
    pub fn download_ttl(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.config.presign_download_ttl_secs)
            .clamp(MIN_DOWNLOAD_TTL_SECS, MAX_DOWNLOAD_TTL_SECS)
    }

    /// Delete an object from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Expiry instant for a URL issued now. Saturates at the latest
/// representable time instead of overflowing.
fn expires_at(ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Sanitize a file name for use in an object key.
///
/// Keeps ASCII letters, digits, dots and hyphens; everything else becomes `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
