//! Timestamp formatting in the local time zone.

use std::fmt;

use jiff::{SignedDuration, Timestamp, tz::TimeZone};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zoned = self.0.to_zoned(TimeZone::system());
        write!(f, "{}", zoned.strftime("%Y-%m-%d %H:%M:%S %Z"))
    }
}

/// Wall-clock length of a run, e.g. `1m 04s` or `12.3s`.
pub struct RunDuration {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl RunDuration {
    /// Duration between two optional timestamps, when both are known.
    pub fn between(start: Option<Timestamp>, end: Option<Timestamp>) -> Option<Self> {
        Some(Self {
            start: start?,
            end: end?,
        })
    }

    fn elapsed(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }
}

impl fmt::Display for RunDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.elapsed();
        let secs = elapsed.as_secs().max(0);
        if secs >= 60 {
            write!(f, "{}m {:02}s", secs / 60, secs % 60)
        } else {
            write!(f, "{:.1}s", elapsed.as_secs_f64().max(0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_duration_formats() {
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        let short = RunDuration {
            start,
            end: Timestamp::from_second(1_700_000_012).unwrap(),
        };
        assert_eq!(short.to_string(), "12.0s");

        let long = RunDuration {
            start,
            end: Timestamp::from_second(1_700_000_064).unwrap(),
        };
        assert_eq!(long.to_string(), "1m 04s");

        assert!(RunDuration::between(Some(start), None).is_none());
    }
}
