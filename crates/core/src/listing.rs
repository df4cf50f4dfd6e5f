//! Sorting for list endpoints.
//!
//! Each resource whitelists the columns it can be sorted by. Unknown fields
//! and orders fall back to the resource default rather than failing.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Parses `asc` / `desc`, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// A whitelisted sort column.
pub trait SortField: Copy + Sized {
    /// Column used when none (or an unknown one) is requested.
    const DEFAULT: Self;
    /// Direction used when none (or an unknown one) is requested.
    const DEFAULT_ORDER: SortOrder;

    /// Parses a query-string field name.
    fn parse(s: &str) -> Option<Self>;
}

/// A resolved sort: field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    /// Column.
    pub field: F,
    /// Direction.
    pub order: SortOrder,
}

impl<F: SortField> Default for Sort<F> {
    fn default() -> Self {
        Self {
            field: F::DEFAULT,
            order: F::DEFAULT_ORDER,
        }
    }
}

impl<F: SortField> Sort<F> {
    /// Resolves raw `sort_by` / `sort_order` query values.
    #[must_use]
    pub fn from_query(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            field: sort_by.and_then(F::parse).unwrap_or(F::DEFAULT),
            order: sort_order
                .and_then(SortOrder::parse)
                .unwrap_or(F::DEFAULT_ORDER),
        }
    }
}

/// Sortable client columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSort {
    /// `created_at`
    CreatedAt,
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `email`
    Email,
    /// `policy_count`
    PolicyCount,
    /// `total_premium`
    TotalPremium,
}

impl SortField for ClientSort {
    const DEFAULT: Self = Self::CreatedAt;
    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;

    fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "policy_count" => Some(Self::PolicyCount),
            "total_premium" => Some(Self::TotalPremium),
            _ => None,
        }
    }
}

/// Sortable policy columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySort {
    /// `created_at`
    CreatedAt,
    /// `expiration_date`
    ExpirationDate,
    /// `effective_date`
    EffectiveDate,
    /// `premium`
    Premium,
    /// `carrier`
    Carrier,
    /// `policy_number`
    PolicyNumber,
    /// `status`
    Status,
    /// `type`
    Type,
}

impl SortField for PolicySort {
    const DEFAULT: Self = Self::CreatedAt;
    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;

    fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "expiration_date" => Some(Self::ExpirationDate),
            "effective_date" => Some(Self::EffectiveDate),
            "premium" => Some(Self::Premium),
            "carrier" => Some(Self::Carrier),
            "policy_number" => Some(Self::PolicyNumber),
            "status" => Some(Self::Status),
            "type" => Some(Self::Type),
            _ => None,
        }
    }
}

/// Sortable activity columns. Due dates sort with nulls last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySort {
    /// `due_date`
    DueDate,
    /// `created_at`
    CreatedAt,
    /// `type`
    Type,
    /// `completed`
    Completed,
}

impl SortField for ActivitySort {
    const DEFAULT: Self = Self::DueDate;
    const DEFAULT_ORDER: SortOrder = SortOrder::Asc;

    fn parse(s: &str) -> Option<Self> {
        match s {
            "due_date" => Some(Self::DueDate),
            "created_at" => Some(Self::CreatedAt),
            "type" => Some(Self::Type),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Sortable document columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSort {
    /// `uploaded_at`
    UploadedAt,
    /// `file_name`
    FileName,
    /// `file_size`
    FileSize,
}

impl SortField for DocumentSort {
    const DEFAULT: Self = Self::UploadedAt;
    const DEFAULT_ORDER: SortOrder = SortOrder::Desc;

    fn parse(s: &str) -> Option<Self> {
        match s {
            "uploaded_at" => Some(Self::UploadedAt),
            "file_name" => Some(Self::FileName),
            "file_size" => Some(Self::FileSize),
            _ => None,
        }
    }
}
