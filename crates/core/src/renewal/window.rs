//! Renewal window math.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default look-ahead for renewal queries, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Shortest window a caller may ask for.
pub const MIN_WINDOW_DAYS: i64 = 1;

/// Longest window a caller may ask for.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Policies expiring within this many days are urgent.
pub const URGENT_DAYS: i64 = 7;

/// Clamps a requested look-ahead into `MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS`.
#[must_use]
pub fn clamp_days(requested: Option<i64>, default: i64) -> i64 {
    requested
        .unwrap_or(default)
        .clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS)
}

/// Whole days from `today` until `expiration`. Negative once expired.
#[must_use]
pub fn days_until_expiration(expiration: NaiveDate, today: NaiveDate) -> i64 {
    (expiration - today).num_days()
}

/// A date range `[today, today + days]` used to select expiring policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalWindow {
    days: i64,
}

impl Default for RenewalWindow {
    fn default() -> Self {
        Self {
            days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl RenewalWindow {
    /// Builds a window from an optional requested length, clamped.
    #[must_use]
    pub fn from_days(days: Option<i64>) -> Self {
        Self {
            days: clamp_days(days, DEFAULT_WINDOW_DAYS),
        }
    }

    /// Window length in days.
    #[must_use]
    pub const fn days(&self) -> i64 {
        self.days
    }

    /// Last date inside the window.
    #[must_use]
    pub fn end_date(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.days)
    }

    /// Returns true if `expiration` falls inside the window.
    #[must_use]
    pub fn contains(&self, today: NaiveDate, expiration: NaiveDate) -> bool {
        expiration >= today && expiration <= self.end_date(today)
    }
}

/// How pressing a renewal is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalUrgency {
    /// Already past expiration.
    Expired,
    /// Expires within a week.
    Urgent,
    /// Expires within the default window.
    Upcoming,
    /// Further out.
    Scheduled,
}

impl RenewalUrgency {
    /// Classifies a day count from [`days_until_expiration`].
    #[must_use]
    pub const fn classify(days: i64) -> Self {
        if days < 0 {
            Self::Expired
        } else if days <= URGENT_DAYS {
            Self::Urgent
        } else if days <= DEFAULT_WINDOW_DAYS {
            Self::Upcoming
        } else {
            Self::Scheduled
        }
    }
}

/// Short human-readable countdown.
#[must_use]
pub fn describe(days: i64) -> String {
    match days {
        0 => "Expires today".to_string(),
        1 => "1 day left".to_string(),
        d if d > 1 => format!("{d} days left"),
        -1 => "Expired 1 day ago".to_string(),
        d => format!("Expired {} days ago", -d),
    }
}
