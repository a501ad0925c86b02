use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// A contiguous run of available calendar days, inclusive on both ends.
///
/// Invariant: `start <= end`. Ranges produced by the reconciler are sorted,
/// non-overlapping and separated by gaps of at least one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A degenerate range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day covered by the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// A user-chosen stay: check-in inclusive, check-out exclusive.
///
/// Only constructible through [`StayInterval::new`], which rejects zero-night
/// stays, so a value of this type always spans at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayInterval {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayInterval {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> CoreResult<Self> {
        if check_in >= check_out {
            return Err(CoreError::ZeroNightStay {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights in the stay, always >= 1.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every night of the stay: each date in `[check_in, check_out)`.
    pub fn nights_iter(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < check_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = DateRange {
            start: date("2025-06-01"),
            end: date("2025-06-03"),
        };
        assert!(range.contains(date("2025-06-01")));
        assert!(range.contains(date("2025-06-03")));
        assert!(!range.contains(date("2025-06-04")));
        assert!(!range.contains(date("2025-05-31")));
    }

    #[test]
    fn test_range_days_expansion() {
        let range = DateRange {
            start: date("2025-06-01"),
            end: date("2025-06-03"),
        };
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(
            days,
            vec![date("2025-06-01"), date("2025-06-02"), date("2025-06-03")]
        );
        assert_eq!(DateRange::single(date("2025-06-05")).days().count(), 1);
    }

    #[test]
    fn test_zero_night_stay_rejected() {
        let result = StayInterval::new(date("2025-06-01"), date("2025-06-01"));
        assert!(matches!(result, Err(CoreError::ZeroNightStay { .. })));

        // Reversed endpoints are rejected the same way
        let result = StayInterval::new(date("2025-06-02"), date("2025-06-01"));
        assert!(result.is_err());
    }

    #[test]
    fn test_nights_count() {
        let interval = StayInterval::new(date("2025-06-01"), date("2025-06-04")).unwrap();
        assert_eq!(interval.nights(), 3);
        let nights: Vec<NaiveDate> = interval.nights_iter().collect();
        assert_eq!(
            nights,
            vec![date("2025-06-01"), date("2025-06-02"), date("2025-06-03")]
        );
    }

    #[test]
    fn test_range_serialization() {
        let json = r#"{ "start": "2025-06-01", "end": "2025-06-03" }"#;
        let range: DateRange = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(range.start, date("2025-06-01"));
        assert_eq!(range.end, date("2025-06-03"));
    }
}
