use chrono::NaiveDate;
use tracing::warn;

use crate::{CoreError, CoreResult, DateRange, StayInterval};

/// Merge a raw list of available days into contiguous ranges.
///
/// Input may be unsorted and may contain duplicates; both are handled here.
/// Output ranges are sorted ascending, non-overlapping, and consecutive
/// ranges are separated by at least one missing day (abutting days always
/// collapse into one range).
pub fn merge_to_ranges(dates: &[NaiveDate]) -> Vec<DateRange> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return ranges;
    };

    let mut current = DateRange::single(first);
    for date in iter {
        if current.end.succ_opt() == Some(date) {
            current.end = date;
        } else {
            ranges.push(current);
            current = DateRange::single(date);
        }
    }
    ranges.push(current);
    ranges
}

/// Strict ISO-8601 (`YYYY-MM-DD`) parse of a single calendar date.
pub fn parse_calendar_date(raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CoreError::InvalidDate(raw.to_string()))
}

/// Tolerant parse of the raw availability payload a backend returns.
///
/// Malformed entries are dropped with a warning rather than failing the whole
/// fetch; the reconciler downstream only ever sees valid dates.
pub fn parse_available_dates(raw: &[String]) -> Vec<NaiveDate> {
    raw.iter()
        .filter_map(|value| match parse_calendar_date(value) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!(value = %value, "discarding malformed availability date");
                None
            }
        })
        .collect()
}

/// Whether a calendar day may be offered to the user as selectable.
///
/// Days before `today` are never selectable. While the user has picked a
/// check-in but not yet a check-out, `chosen_start` additionally rules out
/// anything before that pick.
pub fn is_date_selectable(
    date: NaiveDate,
    ranges: &[DateRange],
    today: NaiveDate,
    chosen_start: Option<NaiveDate>,
) -> bool {
    if date < today {
        return false;
    }
    if let Some(start) = chosen_start {
        if date < start {
            return false;
        }
    }
    ranges.iter().any(|range| range.contains(date))
}

/// First night of the stay not covered by any available range, if any.
///
/// Every night in `[check_in, check_out)` is checked individually, so a stay
/// spanning two abutting ranges that were never merged is still judged
/// correctly.
pub fn first_uncovered_night(interval: &StayInterval, ranges: &[DateRange]) -> Option<NaiveDate> {
    interval
        .nights_iter()
        .find(|night| !ranges.iter().any(|range| range.contains(*night)))
}

/// Whether every night of the stay is covered by the available ranges.
pub fn is_interval_fully_available(interval: &StayInterval, ranges: &[DateRange]) -> bool {
    first_uncovered_night(interval, ranges).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn dates(raw: &[&str]) -> Vec<NaiveDate> {
        raw.iter().map(|s| date(s)).collect()
    }

    #[test]
    fn test_merge_scenario() {
        let input = dates(&["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-05"]);
        let ranges = merge_to_ranges(&input);
        assert_eq!(
            ranges,
            vec![
                DateRange {
                    start: date("2025-06-01"),
                    end: date("2025-06-03"),
                },
                DateRange::single(date("2025-06-05")),
            ]
        );
    }

    #[test]
    fn test_merge_empty_and_single() {
        assert!(merge_to_ranges(&[]).is_empty());

        let ranges = merge_to_ranges(&dates(&["2025-06-01"]));
        assert_eq!(ranges, vec![DateRange::single(date("2025-06-01"))]);
    }

    #[test]
    fn test_merge_unsorted_with_duplicates() {
        let input = dates(&[
            "2025-06-05",
            "2025-06-02",
            "2025-06-01",
            "2025-06-02",
            "2025-06-03",
            "2025-06-05",
        ]);
        let ranges = merge_to_ranges(&input);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, date("2025-06-01"));
        assert_eq!(ranges[0].end, date("2025-06-03"));
    }

    #[test]
    fn test_merge_output_properties() {
        let input = dates(&[
            "2025-06-10",
            "2025-06-01",
            "2025-06-02",
            "2025-06-11",
            "2025-06-04",
            "2025-06-30",
        ]);
        let ranges = merge_to_ranges(&input);

        for window in ranges.windows(2) {
            // Sorted, disjoint, and separated by at least one missing day
            assert!(window[0].end < window[1].start);
            assert!(window[0].end.succ_opt().unwrap() < window[1].start);
        }

        // Union of expanded day-sets equals the deduplicated input
        let mut expanded: Vec<NaiveDate> = ranges.iter().flat_map(|r| r.days()).collect();
        let mut expected = input.clone();
        expected.sort_unstable();
        expected.dedup();
        expanded.sort_unstable();
        assert_eq!(expanded, expected);
    }

    #[test]
    fn test_merge_idempotent() {
        let input = dates(&["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-05"]);
        let ranges = merge_to_ranges(&input);
        let expanded: Vec<NaiveDate> = ranges.iter().flat_map(|r| r.days()).collect();
        assert_eq!(merge_to_ranges(&expanded), ranges);
    }

    #[test]
    fn test_parse_drops_malformed() {
        let raw = vec![
            "2025-06-01".to_string(),
            "not-a-date".to_string(),
            "2025-13-40".to_string(),
            "2025-06-02".to_string(),
        ];
        let parsed = parse_available_dates(&raw);
        assert_eq!(parsed, dates(&["2025-06-01", "2025-06-02"]));
    }

    #[test]
    fn test_selectable_rejects_past_dates() {
        let ranges = merge_to_ranges(&dates(&["2025-06-01", "2025-06-02", "2025-06-03"]));
        let today = date("2025-06-02");

        assert!(!is_date_selectable(date("2025-06-01"), &ranges, today, None));
        assert!(is_date_selectable(date("2025-06-02"), &ranges, today, None));
        assert!(is_date_selectable(date("2025-06-03"), &ranges, today, None));
        assert!(!is_date_selectable(date("2025-06-04"), &ranges, today, None));
    }

    #[test]
    fn test_selectable_respects_chosen_start() {
        let ranges = merge_to_ranges(&dates(&["2025-06-01", "2025-06-02", "2025-06-03"]));
        let today = date("2025-06-01");
        let chosen = Some(date("2025-06-02"));

        assert!(!is_date_selectable(date("2025-06-01"), &ranges, today, chosen));
        assert!(is_date_selectable(date("2025-06-02"), &ranges, today, chosen));
        assert!(is_date_selectable(date("2025-06-03"), &ranges, today, chosen));
    }

    #[test]
    fn test_selectable_monotone_within_range() {
        // If a later day is selectable, every earlier in-range day >= today is too
        let ranges = merge_to_ranges(&dates(&[
            "2025-06-01",
            "2025-06-02",
            "2025-06-03",
            "2025-06-04",
        ]));
        let today = date("2025-06-01");

        assert!(is_date_selectable(date("2025-06-04"), &ranges, today, None));
        for earlier in ranges[0].days().filter(|d| *d < date("2025-06-04")) {
            assert!(is_date_selectable(earlier, &ranges, today, None));
        }
    }

    #[test]
    fn test_interval_every_night_checked() {
        // 06-01..06-03 available, 06-04 missing, 06-05 available
        let ranges = merge_to_ranges(&dates(&[
            "2025-06-01",
            "2025-06-02",
            "2025-06-03",
            "2025-06-05",
        ]));

        // Endpoints are both available but night 06-04 is not: the stay must
        // be rejected, not waved through on an endpoints-only check.
        let gappy = StayInterval::new(date("2025-06-03"), date("2025-06-06")).unwrap();
        assert!(!is_interval_fully_available(&gappy, &ranges));
        assert_eq!(first_uncovered_night(&gappy, &ranges), Some(date("2025-06-04")));

        let covered = StayInterval::new(date("2025-06-01"), date("2025-06-04")).unwrap();
        assert!(is_interval_fully_available(&covered, &ranges));
    }

    #[test]
    fn test_interval_across_abutting_unmerged_ranges() {
        // Two abutting ranges that a buggy upstream failed to merge must still
        // cover a stay spanning them both.
        let ranges = vec![
            DateRange {
                start: date("2025-06-01"),
                end: date("2025-06-02"),
            },
            DateRange {
                start: date("2025-06-03"),
                end: date("2025-06-04"),
            },
        ];
        let interval = StayInterval::new(date("2025-06-01"), date("2025-06-05")).unwrap();
        assert!(is_interval_fully_available(&interval, &ranges));
    }

    #[test]
    fn test_checkout_night_not_required() {
        // The check-out day itself is not a night of the stay
        let ranges = merge_to_ranges(&dates(&["2025-06-01", "2025-06-02"]));
        let interval = StayInterval::new(date("2025-06-01"), date("2025-06-03")).unwrap();
        assert!(is_interval_fully_available(&interval, &ranges));
    }
}
