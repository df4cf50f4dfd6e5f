//! Global keyword search.
//!
//! Search fans out over clients, policies and activities. Policies are
//! matched twice (on their own fields, then through the owning client's
//! name) and the two result sets are merged here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::ActivityWithClient;
use crate::client::Client;
use crate::policy::PolicyWithClient;

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// Results per category when no limit is given.
pub const DEFAULT_LIMIT: u64 = 5;

/// Largest per-category limit.
pub const MAX_LIMIT: u64 = 10;

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    limit: u64,
}

impl SearchQuery {
    /// Parses raw query-string values.
    ///
    /// Returns `None` when the trimmed term is too short to search on.
    #[must_use]
    pub fn parse(q: Option<&str>, limit: Option<u64>) -> Option<Self> {
        let term = q.map(str::trim).unwrap_or_default();
        if term.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        Some(Self {
            term: term.to_string(),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        })
    }

    /// The trimmed search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Per-category result limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Lower-cased `%term%` pattern with LIKE wildcards escaped.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        like_pattern(&self.term)
    }
}

/// Builds a lower-cased `%term%` pattern, escaping `\`, `%` and `_` with `\`.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Anything with a stable row ID.
pub trait Identified {
    /// Row ID.
    fn id(&self) -> Uuid;
}

impl Identified for Client {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for PolicyWithClient {
    fn id(&self) -> Uuid {
        self.policy.id
    }
}

impl Identified for ActivityWithClient {
    fn id(&self) -> Uuid {
        self.activity.id
    }
}

/// Concatenates `primary` and `secondary`, keeping the first occurrence of
/// each ID and at most `limit` items. Order is preserved.
#[must_use]
pub fn merge_unique<T: Identified>(primary: Vec<T>, secondary: Vec<T>, limit: usize) -> Vec<T> {
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .chain(secondary)
        .filter(|item| seen.insert(item.id()))
        .take(limit)
        .collect()
}

/// Search results grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching clients.
    pub clients: Vec<Client>,
    /// Matching policies, each with its client's name.
    pub policies: Vec<PolicyWithClient>,
    /// Matching activities, each with its client's name.
    pub activities: Vec<ActivityWithClient>,
}

impl SearchResults {
    /// Total number of hits across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.clients.len() + self.policies.len() + self.activities.len()
    }
}
