//! Renewal windows.
//!
//! A renewal window is the number of days between the agency's "today" and a
//! policy's expiration date. It drives the expiring-policies list, the
//! dashboard renewals panel and the urgency badges.

mod clock;
mod window;

pub use clock::{TimezoneCache, parse_timezone, today_in};
pub use window::{
    DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS, MIN_WINDOW_DAYS, RenewalUrgency, RenewalWindow,
    URGENT_DAYS, clamp_days, days_until_expiration, describe,
};
