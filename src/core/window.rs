//! Date windows that scope one query call each
//!
//! Windows are half-open `[start, end)` ranges. A range is split lazily into
//! contiguous windows at day or calendar-month granularity.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use clap::ValueEnum;
use serde::Deserialize;

use crate::consts::DATE_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Granularity {
    /// One window per calendar day
    Day,
    /// One window per calendar month
    Month,
}

impl Granularity {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) start: NaiveDate,
    /// Exclusive
    pub(crate) end: NaiveDate,
}

impl Window {
    pub(crate) fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub(crate) fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub(crate) fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

/// Lazy iterator over the windows of a range
#[derive(Debug, Clone)]
pub(crate) struct Windows {
    cursor: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.cursor >= self.end {
            return None;
        }
        let boundary = match self.granularity {
            Granularity::Day => self.cursor.succ_opt(),
            Granularity::Month => next_month_start(self.cursor),
        };
        let next = boundary.map_or(self.end, |d| d.min(self.end));
        let window = Window {
            start: self.cursor,
            end: next,
        };
        self.cursor = next;
        Some(window)
    }
}

fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))
}

/// Split `[start, end)` into windows. Monthly windows follow calendar months,
/// so a range starting mid-month gets a short first window.
pub(crate) fn windows(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Windows {
    Windows {
        cursor: start,
        end,
        granularity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_covers(all: &[Window], start: NaiveDate, end: NaiveDate) {
        assert_eq!(all.first().map(|w| w.start), Some(start));
        assert_eq!(all.last().map(|w| w.end), Some(end));
        for pair in all.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap at {}", pair[0]);
        }
        assert!(all.iter().all(|w| w.start < w.end));
    }

    #[test]
    fn daily_windows_match_month_lengths() {
        let cases = [
            (2023, 1, 31),
            (2023, 2, 28),
            (2024, 2, 29),
            (2023, 4, 30),
            (2023, 12, 31),
            (1900, 2, 28),
            (2000, 2, 29),
        ];
        for (y, m, expected) in cases {
            let start = date(y, m, 1);
            let end = next_month_start(start).unwrap();
            let all: Vec<_> = windows(start, end, Granularity::Day).collect();
            assert_eq!(all.len(), expected, "{y}-{m:02}");
            assert_covers(&all, start, end);
            assert!(all.iter().all(|w| w.days() == 1));
        }
    }

    #[test]
    fn monthly_windows_cover_a_year() {
        let start = date(2023, 1, 1);
        let end = date(2024, 1, 1);
        let all: Vec<_> = windows(start, end, Granularity::Month).collect();
        assert_eq!(all.len(), 12);
        assert_covers(&all, start, end);
        assert_eq!(all[1], Window { start: date(2023, 2, 1), end: date(2023, 3, 1) });
        assert_eq!(all[1].days(), 28);
        let days: i64 = all.iter().map(Window::days).sum();
        assert_eq!(days, 365);
    }

    #[test]
    fn monthly_windows_leap_february() {
        let all: Vec<_> =
            windows(date(2024, 2, 1), date(2024, 3, 1), Granularity::Month).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].days(), 29);
    }

    #[test]
    fn monthly_windows_align_to_calendar() {
        let start = date(2023, 1, 31);
        let end = date(2023, 4, 15);
        let all: Vec<_> = windows(start, end, Granularity::Month).collect();
        assert_covers(&all, start, end);
        assert_eq!(
            all,
            vec![
                Window { start: date(2023, 1, 31), end: date(2023, 2, 1) },
                Window { start: date(2023, 2, 1), end: date(2023, 3, 1) },
                Window { start: date(2023, 3, 1), end: date(2023, 4, 1) },
                Window { start: date(2023, 4, 1), end: date(2023, 4, 15) },
            ]
        );
    }

    #[test]
    fn daily_windows_cross_year_boundary() {
        let start = date(2023, 12, 30);
        let end = date(2024, 1, 3);
        let all: Vec<_> = windows(start, end, Granularity::Day).collect();
        assert_eq!(all.len(), 4);
        assert_covers(&all, start, end);
    }

    #[test]
    fn empty_or_inverted_range_yields_nothing() {
        let d = date(2023, 5, 1);
        assert_eq!(windows(d, d, Granularity::Day).count(), 0);
        assert_eq!(windows(d, date(2023, 4, 1), Granularity::Month).count(), 0);
    }

    #[test]
    fn iterator_is_restartable() {
        let a: Vec<_> = windows(date(2023, 1, 1), date(2023, 3, 1), Granularity::Month).collect();
        let b: Vec<_> = windows(date(2023, 1, 1), date(2023, 3, 1), Granularity::Month).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn window_display() {
        let w = Window { start: date(2023, 1, 1), end: date(2023, 2, 1) };
        assert_eq!(w.to_string(), "2023-01-01..2023-02-01");
    }
}
