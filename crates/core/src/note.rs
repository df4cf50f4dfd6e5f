//! Free-form notes attached to a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note on a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientNote {
    /// Note ID.
    pub id: Uuid,
    /// Client the note belongs to.
    pub client_id: Uuid,
    /// Note body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Trims note content, rejecting blank notes.
#[must_use]
pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_content() {
        assert_eq!(normalize_content("  "), None);
        assert_eq!(
            normalize_content("\n Called about renewal. "),
            Some("Called about renewal.".to_string())
        );
    }
}
