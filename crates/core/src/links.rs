//! Client/policy linkage for activities and documents.
//!
//! A record may point at a client, a policy, both or neither. When it points
//! at a policy, the client is implied by the policy's owner and any explicit
//! client must match it.

use thiserror::Error;
use uuid::Uuid;

/// Resolved links for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordLinks {
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
}

/// A policy reference after it has been looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRef {
    /// Policy ID.
    pub id: Uuid,
    /// Client that owns the policy.
    pub client_id: Uuid,
}

/// Linkage violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The policy is owned by a different client.
    #[error("policy {policy_id} does not belong to client {client_id}")]
    PolicyClientMismatch {
        /// Policy requested.
        policy_id: Uuid,
        /// Client requested.
        client_id: Uuid,
    },
}

/// Combines the requested client with a looked-up policy.
pub fn resolve_links(
    client_id: Option<Uuid>,
    policy: Option<PolicyRef>,
) -> Result<RecordLinks, LinkError> {
    match (client_id, policy) {
        (Some(client_id), Some(policy)) if policy.client_id != client_id => {
            Err(LinkError::PolicyClientMismatch {
                policy_id: policy.id,
                client_id,
            })
        }
        (_, Some(policy)) => Ok(RecordLinks {
            client_id: Some(policy.client_id),
            policy_id: Some(policy.id),
        }),
        (client_id, None) => Ok(RecordLinks {
            client_id,
            policy_id: None,
        }),
    }
}
