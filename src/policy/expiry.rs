//! Expiration semantics.

use crate::clock::Clock;
use crate::LicensorError;
use chrono::{DateTime, NaiveDate, Utc};

/// Parse a caller-supplied expiry timestamp.
///
/// Accepts RFC 3339 (any offset, normalized to UTC) or a bare `YYYY-MM-DD`
/// date, which means midnight UTC at the start of that day.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, LicensorError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LicensorError::InvalidRequest(format!(
            "{} cannot be empty",
            field
        )));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            LicensorError::InvalidRequest(format!(
                "{} must be an RFC 3339 timestamp or YYYY-MM-DD date, got {:?}",
                field, raw
            ))
        })
}

/// A license is expired only when `now` is strictly after `expires_at`.
pub fn is_expired_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

/// Check expiry against a clock, returning the evaluation time as well.
pub fn check_expiry<C: Clock + ?Sized>(
    expires_at: DateTime<Utc>,
    clock: &C,
) -> (bool, DateTime<Utc>) {
    let now = clock.now_utc();
    (is_expired_at(expires_at, now), now)
}
