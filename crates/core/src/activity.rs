//! Activities: calls, emails, tasks, meetings and notes logged against
//! clients and policies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Phone call.
    Call,
    /// Email.
    Email,
    /// To-do item.
    Task,
    /// Meeting.
    Meeting,
    /// Logged note.
    Note,
}

impl ActivityType {
    /// All activity types.
    pub const ALL: [Self; 5] = [
        Self::Call,
        Self::Email,
        Self::Task,
        Self::Meeting,
        Self::Note,
    ];

    /// Convert to database string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Task => "task",
            Self::Meeting => "meeting",
            Self::Note => "note",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// An activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID.
    pub id: Uuid,
    /// Kind of activity.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// What happened or needs to happen.
    pub description: String,
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
    /// When it is due.
    pub due_date: Option<DateTime<Utc>>,
    /// Whether it is done.
    pub completed: bool,
    /// When it was marked done.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An activity with the linked client's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWithClient {
    /// The activity.
    #[serde(flatten)]
    pub activity: Activity,
    /// "First Last" of the linked client.
    pub client_name: Option<String>,
}

/// Input for creating an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Kind of activity.
    pub activity_type: ActivityType,
    /// Description.
    pub description: String,
    /// Linked client.
    pub client_id: Option<Uuid>,
    /// Linked policy.
    pub policy_id: Option<Uuid>,
    /// When it is due.
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for an activity.
#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    /// New kind.
    pub activity_type: Option<ActivityType>,
    /// New description.
    pub description: Option<String>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Completion flag.
    pub completed: Option<bool>,
}

/// Effect of a completion flag on the stored activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    /// Leave `completed` and `completed_at` alone.
    Unchanged,
    /// Mark done at the given instant.
    Complete(DateTime<Utc>),
    /// Mark not done and clear the completion time.
    Reopen,
}

impl CompletionChange {
    /// Resolves the requested flag into a change. Completing always stamps `now`.
    #[must_use]
    pub fn from_request(completed: Option<bool>, now: DateTime<Utc>) -> Self {
        match completed {
            None => Self::Unchanged,
            Some(true) => Self::Complete(now),
            Some(false) => Self::Reopen,
        }
    }

    /// The `(completed, completed_at)` pair to store, if any.
    #[must_use]
    pub const fn columns(self) -> Option<(bool, Option<DateTime<Utc>>)> {
        match self {
            Self::Unchanged => None,
            Self::Complete(at) => Some((true, Some(at))),
            Self::Reopen => Some((false, None)),
        }
    }
}
