use std::fmt::Display;
use std::iter::FusedIterator;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{Error, Result};

/// Format of the dates accepted as range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar dates.
///
/// The hourly timestamps of a range start at midnight UTC of the first date
/// and end at midnight UTC of the last date, which is the last included
/// instant: the remaining hours of the last day are not part of the range.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvertedRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// Build a range from two dates formatted as `YYYY-MM-DD`.
    ///
    /// ```
    /// use timestamp_dimension::timestamps::DateRange;
    ///
    /// assert!(DateRange::parse("2022-01-01", "2026-12-31").is_ok());
    /// assert!(DateRange::parse("2022-01-01", "2021-12-31").is_err());
    /// assert!(DateRange::parse("2022-13-01", "2026-12-31").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant of the range.
    pub fn first_instant(&self) -> DateTime<Utc> {
        midnight_utc(self.start)
    }

    /// Last instant of the range.
    pub fn last_instant(&self) -> DateTime<Utc> {
        midnight_utc(self.end)
    }

    /// Check if an instant is between the first and the last instants of this range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        (self.first_instant()..=self.last_instant()).contains(&instant)
    }

    /// Number of hourly timestamps in the range.
    ///
    /// ```
    /// use timestamp_dimension::timestamps::DateRange;
    ///
    /// let range = DateRange::parse("2024-02-28", "2024-03-01").unwrap();
    /// assert_eq!(range.hour_count(), 2 * 24 + 1);
    /// ```
    pub fn hour_count(&self) -> usize {
        let hours = (self.last_instant() - self.first_instant()).num_hours();
        usize::try_from(hours).expect("range bounds are ordered") + 1
    }

    /// Iterate over hourly timestamps of the range.
    pub fn hours(&self) -> HourlyTimestamps {
        HourlyTimestamps {
            next: self.first_instant(),
            last: self.last_instant(),
            remaining: self.hour_count(),
        }
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl IntoIterator for DateRange {
    type Item = DateTime<Utc>;
    type IntoIter = HourlyTimestamps;

    fn into_iter(self) -> Self::IntoIter {
        self.hours()
    }
}

/// Lazy sequence of UTC instants, one per hour.
///
/// Cloning the iterator restarts the sequence from where the clone was made.
#[derive(Clone, Debug)]
pub struct HourlyTimestamps {
    next: DateTime<Utc>,
    last: DateTime<Utc>,
    remaining: usize,
}

impl Iterator for HourlyTimestamps {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let res = self.next;
        self.remaining -= 1;

        if res < self.last {
            self.next = res + Duration::hours(1);
        }

        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for HourlyTimestamps {}
impl FusedIterator for HourlyTimestamps {}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|source| Error::InvalidDate { value: value.to_string(), source })
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight should always exist")
        .and_utc()
}
