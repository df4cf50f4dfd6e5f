//! Document types and object path rules.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::sanitize_filename;

/// A stored file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID.
    pub id: Uuid,
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
    /// Original file name.
    pub file_name: String,
    /// Object key in storage.
    pub file_path: String,
    /// Size in bytes, when known.
    pub file_size: Option<i64>,
    /// MIME type, when known.
    pub mime_type: Option<String>,
    /// When the record was created.
    pub uploaded_at: DateTime<Utc>,
}

/// Which folder an upload lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOwner {
    /// `clients/{id}`
    Client(Uuid),
    /// `policies/{id}`
    Policy(Uuid),
    /// `general`
    General,
}

impl DocumentOwner {
    /// Picks the folder for an upload. A client link wins over a policy link.
    #[must_use]
    pub fn from_links(client_id: Option<Uuid>, policy_id: Option<Uuid>) -> Self {
        match (client_id, policy_id) {
            (Some(client_id), _) => Self::Client(client_id),
            (None, Some(policy_id)) => Self::Policy(policy_id),
            (None, None) => Self::General,
        }
    }

    fn folder(&self) -> String {
        match self {
            Self::Client(id) => format!("clients/{id}"),
            Self::Policy(id) => format!("policies/{id}"),
            Self::General => "general".to_string(),
        }
    }
}

/// Object key for a new upload:
/// `{agency_id}/{clients/{id} | policies/{id} | general}/{unix_millis}-{sanitized_name}`.
#[must_use]
pub fn object_path(
    agency_id: Uuid,
    owner: DocumentOwner,
    uploaded_at: DateTime<Utc>,
    file_name: &str,
) -> String {
    format!(
        "{agency_id}/{}/{}-{}",
        owner.folder(),
        uploaded_at.timestamp_millis(),
        sanitize_filename(file_name)
    )
}

/// Returns true if `path` lives under the agency's prefix and has no
/// relative or empty segments.
#[must_use]
pub fn is_agency_path(agency_id: Uuid, path: &str) -> bool {
    let prefix = format!("{agency_id}/");
    path.strip_prefix(&prefix).is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .split('/')
                .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
    })
}

/// Input for requesting an upload URL.
#[derive(Debug, Clone)]
pub struct RequestUploadInput {
    /// Agency the file belongs to.
    pub agency_id: Uuid,
    /// Client to file under.
    pub client_id: Option<Uuid>,
    /// Policy to file under.
    pub policy_id: Option<Uuid>,
    /// Original file name.
    pub file_name: String,
    /// MIME type, when the browser knows it.
    pub content_type: Option<String>,
    /// Size in bytes, when the browser knows it.
    pub file_size: Option<u64>,
}

/// Signed upload URL and the path to record afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTicket {
    /// Presigned upload URL.
    pub url: String,
    /// Object key to pass back when creating the document record.
    pub path: String,
    /// HTTP method to use.
    pub method: String,
    /// Headers the upload must send.
    pub headers: HashMap<String, String>,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
}

/// Input for creating a document record after upload.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
    /// Original file name.
    pub file_name: String,
    /// Object key returned by the upload ticket.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: Option<i64>,
    /// MIME type.
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn agency() -> Uuid {
        Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").expect("valid uuid")
    }

    #[test]
    fn test_owner_precedence() {
        let client = Uuid::new_v4();
        let policy = Uuid::new_v4();

        assert_eq!(
            DocumentOwner::from_links(Some(client), Some(policy)),
            DocumentOwner::Client(client)
        );
        assert_eq!(
            DocumentOwner::from_links(None, Some(policy)),
            DocumentOwner::Policy(policy)
        );
        assert_eq!(DocumentOwner::from_links(None, None), DocumentOwner::General);
    }

    #[test]
    fn test_object_path_format() {
        let client = Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").expect("valid uuid");
        let at = Utc.timestamp_millis_opt(1_760_000_000_123).unwrap();

        let path = object_path(agency(), DocumentOwner::Client(client), at, "Auto ID card.pdf");
        assert_eq!(
            path,
            format!("{}/clients/{client}/1760000000123-Auto_ID_card.pdf", agency())
        );

        let path = object_path(agency(), DocumentOwner::General, at, "memo.txt");
        assert_eq!(path, format!("{}/general/1760000000123-memo.txt", agency()));
    }

    #[test]
    fn test_is_agency_path() {
        let a = agency();
        assert!(is_agency_path(a, &format!("{a}/general/1-memo.txt")));
        assert!(!is_agency_path(a, "general/1-memo.txt"));
        assert!(!is_agency_path(a, &format!("{}/general/x", Uuid::new_v4())));
        assert!(!is_agency_path(a, &format!("{a}/../other/x")));
        assert!(!is_agency_path(a, &format!("{a}/")));
        assert!(!is_agency_path(a, &format!("{a}//x")));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_generated_paths_are_agency_paths(
            file_name in ".{1,40}",
            millis in 0i64..4_000_000_000_000,
            owner_kind in 0u8..3,
        ) {
            let agency_id = Uuid::new_v4();
            let owner = match owner_kind {
                0 => DocumentOwner::Client(Uuid::new_v4()),
                1 => DocumentOwner::Policy(Uuid::new_v4()),
                _ => DocumentOwner::General,
            };
            let at = DateTime::<Utc>::from_timestamp_millis(millis).unwrap();

            let path = object_path(agency_id, owner, at, &file_name);
            prop_assert!(is_agency_path(agency_id, &path));
            prop_assert!(!is_agency_path(Uuid::new_v4(), &path));
        }
    }
}
