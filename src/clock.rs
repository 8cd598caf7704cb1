//! Deterministic clock abstraction for testable time-dependent logic.

use chrono::{DateTime, Utc};

/// Clock trait for deterministic time in tests.
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System clock using actual wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for deterministic testing.
///
/// Interior mutability lets a test move time forward while the authority
/// holds the clock behind an `Arc`.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug)]
pub struct MockClock {
    now: std::sync::RwLock<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Create a mock clock frozen at the given time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::RwLock::new(now),
        }
    }

    /// Create a mock clock from an RFC 3339 string.
    pub fn from_rfc3339(s: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(s)
                .expect("valid RFC 3339")
                .with_timezone(&Utc),
        )
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.write().expect("mock clock lock poisoned");
        *now += duration;
    }

    /// Jump the clock to an absolute time.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.write().expect("mock clock lock poisoned") = at;
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read().expect("mock clock lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn system_clock_returns_time() {
        let clock = SystemClock;
        let now = clock.now_utc();
        assert!(now.year() >= 2024);
    }

    #[test]
    fn mock_clock_is_deterministic() {
        let clock = MockClock::from_rfc3339("2025-01-15T12:00:00Z");
        assert_eq!(clock.now_utc().to_rfc3339(), "2025-01-15T12:00:00+00:00");
        assert_eq!(clock.now_utc().to_rfc3339(), "2025-01-15T12:00:00+00:00");
    }

    #[test]
    fn mock_clock_advances_through_shared_reference() {
        let clock = std::sync::Arc::new(MockClock::from_rfc3339("2025-01-15T12:00:00Z"));
        let shared: std::sync::Arc<dyn Clock> = clock.clone();
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(shared.now_utc().to_rfc3339(), "2025-01-15T13:00:00+00:00");
    }

    #[test]
    fn mock_clock_set_jumps() {
        let clock = MockClock::from_rfc3339("2025-01-15T12:00:00Z");
        clock.set(MockClock::from_rfc3339("2030-06-01T00:00:00Z").now_utc());
        assert_eq!(clock.now_utc().to_rfc3339(), "2030-06-01T00:00:00+00:00");
    }
}
