//! Monthly extraction windows
//!
//! A run covers one calendar month expressed as the half-open interval
//! `[start, end)`: a record stamped exactly at `end` belongs to the next
//! month's run, never to both.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Wire format for window bounds (`YYYY-MM-DDTHH:MM:SSZ`)
pub const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Half-open UTC interval covering one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    year: i32,
    month: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Compute the window for `(year, month)`.
///
/// `end` is the first instant of the following month, rolling over to
/// January of `year + 1` for December.
pub fn compute_window(year: i32, month: u32) -> Result<Window> {
    if !(1..=12).contains(&month) {
        return Err(Error::invalid_window(year, month));
    }

    let (end_year, end_month) = if month == 12 {
        (year.checked_add(1), 1)
    } else {
        (Some(year), month + 1)
    };

    let start = first_instant(year, month).ok_or_else(|| Error::invalid_window(year, month))?;
    let end = end_year
        .and_then(|y| first_instant(y, end_month))
        .ok_or_else(|| Error::invalid_window(year, month))?;

    Ok(Window {
        year,
        month,
        start,
        end,
    })
}

fn first_instant(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
}

impl Window {
    /// Calendar year this window covers
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12) this window covers
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Inclusive lower bound
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Lower bound in wire format
    pub fn start_str(&self) -> String {
        self.start.format(WINDOW_FORMAT).to_string()
    }

    /// Upper bound in wire format
    pub fn end_str(&self) -> String {
        self.end.format(WINDOW_FORMAT).to_string()
    }

    /// Whether `ts` falls inside `[start, end)`
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Number of days spanned (28-31)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_str(), self.end_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    #[test]
    fn test_regular_month() {
        let window = compute_window(2021, 3).unwrap();
        assert_eq!(window.start_str(), "2021-03-01T00:00:00Z");
        assert_eq!(window.end_str(), "2021-04-01T00:00:00Z");
        assert_eq!(window.year(), 2021);
        assert_eq!(window.month(), 3);
    }

    #[test]
    fn test_december_rolls_year() {
        let window = compute_window(2021, 12).unwrap();
        assert_eq!(window.start_str(), "2021-12-01T00:00:00Z");
        assert_eq!(window.end_str(), "2022-01-01T00:00:00Z");
    }

    #[test_case(0 ; "zero")]
    #[test_case(13 ; "thirteen")]
    #[test_case(u32::MAX ; "max")]
    fn test_invalid_month(month: u32) {
        let err = compute_window(2021, month).unwrap_err();
        assert!(matches!(err, Error::InvalidWindow { year: 2021, .. }));
    }

    #[test_case(2021, 2, 28 ; "february")]
    #[test_case(2020, 2, 29 ; "leap february")]
    #[test_case(2021, 4, 30 ; "april")]
    #[test_case(2021, 12, 31 ; "december")]
    fn test_days_in_window(year: i32, month: u32, days: i64) {
        assert_eq!(compute_window(year, month).unwrap().days(), days);
    }

    #[test]
    fn test_every_month_spans_one_calendar_month() {
        for year in [1999, 2000, 2021, 2024] {
            for month in 1..=12 {
                let window = compute_window(year, month).unwrap();
                assert!(window.start() < window.end());
                assert!((28..=31).contains(&window.days()));

                let next = if month == 12 {
                    compute_window(year + 1, 1).unwrap()
                } else {
                    compute_window(year, month + 1).unwrap()
                };
                assert_eq!(window.end(), next.start());
            }
        }
    }

    #[test]
    fn test_half_open_bounds() {
        let window = compute_window(2021, 3).unwrap();
        let start = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2021, 4, 1, 0, 0, 0).unwrap();

        assert!(window.contains(start));
        assert!(window.contains(end - Duration::seconds(1)));
        assert!(!window.contains(end));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn test_display() {
        let window = compute_window(2021, 3).unwrap();
        assert_eq!(
            window.to_string(),
            "[2021-03-01T00:00:00Z, 2021-04-01T00:00:00Z)"
        );
    }
}
