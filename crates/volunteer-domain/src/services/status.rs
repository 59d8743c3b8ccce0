//! Temporal status resolution

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::value_objects::ActivityStatus;

/// Maps an activity window onto `upcoming | ongoing | completed`
pub struct StatusResolver;

impl StatusResolver {
    /// Resolve the status of a window at `now`.
    ///
    /// - no start: `Upcoming`
    /// - end in the past: `Completed`
    /// - started, and end absent or not yet passed: `Ongoing`
    /// - otherwise `Upcoming`
    pub fn resolve(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ActivityStatus {
        let Some(start) = start_date else {
            return ActivityStatus::Upcoming;
        };
        if end_date.is_some_and(|end| end < now) {
            return ActivityStatus::Completed;
        }
        if start <= now {
            return ActivityStatus::Ongoing;
        }
        ActivityStatus::Upcoming
    }

    /// Resolve from raw API strings. Unparseable dates count as absent.
    pub fn resolve_raw(
        start_date: Option<&str>,
        end_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> ActivityStatus {
        Self::resolve(
            start_date.and_then(parse_instant),
            end_date.and_then(parse_instant),
            now,
        )
    }
}

/// Parse an instant as the backing API emits it.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]` (read as UTC) and
/// bare `YYYY-MM-DD` (midnight UTC). Anything else is `None`.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
