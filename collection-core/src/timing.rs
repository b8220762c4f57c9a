//! Clock backends
//!
//! Date criteria are relative to "now", so the converters read time through a
//! [`Clock`] instead of calling `chrono` directly.
//!
//! - `SystemClock`: local wall-clock time, used by the CLI
//! - `FixedClock`: a frozen instant, used by tests

use chrono::{DateTime, FixedOffset, Local, NaiveTime, TimeZone};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant in the clock's time zone
    fn now(&self) -> DateTime<FixedOffset>;

    /// Backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Wall-clock time in the host's local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Create a clock that always returns `instant`
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Parse an RFC 3339 timestamp, e.g. `2013-03-28T14:30:00+01:00`
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => panic!("23:59:59 is a valid time of day"),
};

/// First second of the day containing `instant`, in its own offset
pub fn earliest_time(instant: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    at_time(instant, NaiveTime::MIN)
}

/// Last whole second of the day containing `instant`, in its own offset
pub fn latest_time(instant: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    at_time(instant, END_OF_DAY)
}

fn at_time(instant: &DateTime<FixedOffset>, time: NaiveTime) -> DateTime<FixedOffset> {
    let naive = instant.date_naive().and_time(time);
    // A fixed offset has no gaps or folds, so the mapping is always single.
    instant
        .offset()
        .from_local_datetime(&naive)
        .single()
        .unwrap_or(*instant)
}

/// Whether `instant` falls on the same calendar day as `now`, in `now`'s offset
pub fn is_same_day(instant: &DateTime<FixedOffset>, now: &DateTime<FixedOffset>) -> bool {
    instant.with_timezone(now.offset()).date_naive() == now.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_frozen() {
        let clock = FixedClock::parse("2013-03-28T14:30:00+01:00").unwrap();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.name(), "fixed");
    }

    #[test]
    fn test_day_bounds() {
        let now = DateTime::parse_from_rfc3339("2013-03-28T14:30:00+01:00").unwrap();
        assert_eq!(
            earliest_time(&now).to_rfc3339(),
            "2013-03-28T00:00:00+01:00"
        );
        assert_eq!(latest_time(&now).to_rfc3339(), "2013-03-28T23:59:59+01:00");
    }

    #[test]
    fn test_same_day() {
        let now = DateTime::parse_from_rfc3339("2013-03-28T14:30:00+01:00").unwrap();
        let later = DateTime::parse_from_rfc3339("2013-03-28T23:00:00+01:00").unwrap();
        let tomorrow = DateTime::parse_from_rfc3339("2013-03-29T00:00:01+01:00").unwrap();
        assert!(is_same_day(&later, &now));
        assert!(!is_same_day(&tomorrow, &now));
    }
}
