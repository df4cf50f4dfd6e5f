//! Agency-local calendar dates.
//!
//! Renewal windows are counted in calendar days as the agency sees them, so
//! "today" depends on the agency's time zone.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use moka::sync::Cache;
use uuid::Uuid;

/// Default cache capacity (number of agencies).
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

/// Default time-to-live for cached zones (10 minutes).
const DEFAULT_TTL_SECS: u64 = 600;

/// Parses an IANA zone name, falling back to UTC for unknown names.
#[must_use]
pub fn parse_timezone(name: &str) -> Tz {
    name.trim().parse::<Tz>().unwrap_or(Tz::UTC)
}

/// The calendar date at `now` in `tz`.
#[must_use]
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Cache of agency time zones keyed by agency ID.
#[derive(Clone)]
pub struct TimezoneCache {
    cache: Cache<Uuid, Tz>,
}

impl Default for TimezoneCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimezoneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimezoneCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl TimezoneCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 1000 agencies max, 10 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Cached zone for an agency.
    #[must_use]
    pub fn get(&self, agency_id: Uuid) -> Option<Tz> {
        self.cache.get(&agency_id)
    }

    /// Stores the zone for an agency.
    pub fn insert(&self, agency_id: Uuid, tz: Tz) {
        self.cache.insert(agency_id, tz);
    }

    /// Drops a cached zone, e.g. after the agency changes it.
    pub fn invalidate(&self, agency_id: Uuid) {
        self.cache.invalidate(&agency_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/Chicago"), Tz::America__Chicago);
        assert_eq!(parse_timezone(" UTC "), Tz::UTC);
        assert_eq!(parse_timezone("Mars/Olympus_Mons"), Tz::UTC);
        assert_eq!(parse_timezone(""), Tz::UTC);
    }

    #[test]
    fn test_today_in_zone_behind_utc() {
        // 03:00 UTC on Oct 16 is still Oct 15 in Chicago.
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap();
        assert_eq!(
            today_in(Tz::America__Chicago, now),
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
        assert_eq!(
            today_in(Tz::UTC, now),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
    }

    #[test]
    fn test_cache_roundtrip() {
        let cache = TimezoneCache::new();
        let agency = Uuid::new_v4();

        assert_eq!(cache.get(agency), None);
        cache.insert(agency, Tz::America__Chicago);
        assert_eq!(cache.get(agency), Some(Tz::America__Chicago));
        cache.invalidate(agency);
        assert_eq!(cache.get(agency), None);
    }
}
