//! Activity Windows
//!
//! The period during which a promotion may apply.

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
    tz::TimeZone,
};

/// The validity window of a promotion.
///
/// Both bounds are inclusive. A window whose stored dates could not be parsed
/// is kept as [`ActivityWindow::Malformed`] so the promotion is never treated
/// as active, rather than comparing against an invalid instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityWindow {
    /// A window with known start and end instants.
    Bounded {
        /// First instant at which the promotion applies
        starts_at: Timestamp,

        /// Last instant at which the promotion applies
        ends_at: Timestamp,
    },

    /// At least one of the stored dates could not be parsed.
    Malformed,
}

impl ActivityWindow {
    /// Create a window from two instants.
    pub const fn new(starts_at: Timestamp, ends_at: Timestamp) -> Self {
        Self::Bounded { starts_at, ends_at }
    }

    /// Parse a window from its stored string representation.
    ///
    /// Returns [`ActivityWindow::Malformed`] if either bound is unparseable.
    pub fn parse(starts_at: &str, ends_at: &str) -> Self {
        match (parse_instant(starts_at), parse_instant(ends_at)) {
            (Some(starts_at), Some(ends_at)) => Self::Bounded { starts_at, ends_at },
            _ => Self::Malformed,
        }
    }

    /// Return whether `now` falls within the window, bounds included.
    pub fn contains(&self, now: Timestamp) -> bool {
        match self {
            Self::Bounded { starts_at, ends_at } => *starts_at <= now && now <= *ends_at,
            Self::Malformed => false,
        }
    }

    /// Return whether the window could not be parsed.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed)
    }
}

/// Parse a stored date into an instant.
///
/// Accepts RFC 3339 timestamps (`2025-01-31T23:59:59Z`). Civil date-times and
/// bare dates carry no offset and are read as UTC.
pub fn parse_instant(value: &str) -> Option<Timestamp> {
    let value = value.trim();

    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Some(timestamp);
    }

    if let Ok(datetime) = value.parse::<DateTime>() {
        return datetime
            .to_zoned(TimeZone::UTC)
            .ok()
            .map(|zoned| zoned.timestamp());
    }

    value
        .parse::<Date>()
        .ok()
        .and_then(|date| date.to_zoned(TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_instant_accepts_rfc3339() -> TestResult {
        let parsed = parse_instant("2025-03-01T10:00:00.000Z");

        assert_eq!(parsed, Some("2025-03-01T10:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn parse_instant_reads_bare_dates_as_utc_midnight() -> TestResult {
        assert_eq!(
            parse_instant("2025-03-01"),
            Some("2025-03-01T00:00:00Z".parse()?)
        );

        assert_eq!(
            parse_instant("2025-03-01T08:30:00"),
            Some("2025-03-01T08:30:00Z".parse()?)
        );

        Ok(())
    }

    #[test]
    fn parse_instant_rejects_garbage() {
        assert_eq!(parse_instant("not a date"), None);
        assert_eq!(parse_instant(""), None);
        assert_eq!(parse_instant("2025-13-45"), None);
    }

    #[test]
    fn bounds_are_inclusive() -> TestResult {
        let starts_at: Timestamp = "2025-01-01T00:00:00Z".parse()?;
        let ends_at: Timestamp = "2025-01-31T23:59:59Z".parse()?;
        let window = ActivityWindow::new(starts_at, ends_at);
        let tick = SignedDuration::from_nanos(1);

        assert!(window.contains(starts_at));
        assert!(window.contains(ends_at));
        assert!(!window.contains(starts_at.checked_sub(tick)?));
        assert!(!window.contains(ends_at.checked_add(tick)?));

        Ok(())
    }

    #[test]
    fn malformed_window_never_contains() -> TestResult {
        let window = ActivityWindow::parse("2025-01-01", "whenever");

        assert!(window.is_malformed());
        assert!(!window.contains("2025-01-02T00:00:00Z".parse()?));

        Ok(())
    }
}
