//! Common types used across the dashboard

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one calendar day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Milliseconds since the Unix epoch at midnight UTC of `date`
pub fn date_to_millis(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .timestamp_millis()
}

/// Convert a JavaScript-style epoch timestamp into a UTC instant
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Inclusive span of calendar dates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether `date` falls inside the range, both ends inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_to_millis_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(date_to_millis(epoch), MILLIS_PER_DAY);
    }

    #[test]
    fn test_millis_round_trip_through_datetime() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let instant = millis_to_datetime(date_to_millis(date)).unwrap();
        assert_eq!(instant.date_naive(), date);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
        };
        assert_eq!(range.days(), 10);
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()));
    }
}
