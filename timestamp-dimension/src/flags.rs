//! Locale-derived boolean flags of a dimension row.
//!
//! Each flag is computed by a standalone function of an UTC instant and a
//! timezone. All of them convert the instant through [`localize`], so that
//! they agree on the civil time at DST transitions.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::country::Country;
use crate::error::{Error, Result};
use crate::holidays::HolidayProvider;
use crate::localize::{dst_offset, localize};
use crate::table::TimestampRow;

// --
// -- Flags
// --

/// One of the boolean columns of a dimension table.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Flag {
    Holiday,
    DaylightSavings,
    WorkingHours,
    Weekend,
}

impl Flag {
    /// All flags, in the order of their columns.
    pub const ALL: [Self; 4] = [
        Self::Holiday,
        Self::DaylightSavings,
        Self::WorkingHours,
        Self::Weekend,
    ];

    /// Name of the column holding this flag.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Holiday => "holiday",
            Self::DaylightSavings => "daylight_savings",
            Self::WorkingHours => "working_hours",
            Self::Weekend => "weekend",
        }
    }

    /// Read the value of this flag in a row.
    pub fn of(self, row: &TimestampRow) -> bool {
        match self {
            Self::Holiday => row.holiday,
            Self::DaylightSavings => row.daylight_savings,
            Self::WorkingHours => row.working_hours,
            Self::Weekend => row.weekend,
        }
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

// --
// -- Working Hours
// --

/// Window of local hours considered as working hours, from `start` included to `end` excluded.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct WorkingHours {
    start: u32,
    end: u32,
}

impl WorkingHours {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start >= end || end > 24 {
            return Err(Error::InvalidWorkingHours { start, end });
        }

        Ok(Self { start, end })
    }

    pub fn start(self) -> u32 {
        self.start
    }

    pub fn end(self) -> u32 {
        self.end
    }

    /// Check if an hour of the day is part of this window.
    pub fn contains(self, hour: u32) -> bool {
        (self.start..self.end).contains(&hour)
    }
}

impl Default for WorkingHours {
    /// From 9:00 to 18:00.
    fn default() -> Self {
        Self { start: 9, end: 18 }
    }
}

// --
// -- Derivation
// --

/// Check if the local time of an instant falls within working hours.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timestamp_dimension::flags::{is_working_hours, WorkingHours};
///
/// let tz = chrono_tz::Europe::Berlin;
/// let hours = WorkingHours::default();
/// assert!(is_working_hours(Utc.with_ymd_and_hms(2023, 1, 10, 8, 0, 0).unwrap(), tz, hours));
/// assert!(!is_working_hours(Utc.with_ymd_and_hms(2023, 1, 10, 17, 0, 0).unwrap(), tz, hours));
/// ```
pub fn is_working_hours(instant: DateTime<Utc>, tz: Tz, hours: WorkingHours) -> bool {
    hours.contains(localize(instant, tz).hour())
}

/// Check if the local time of an instant falls on a Saturday or a Sunday.
pub fn is_weekend(instant: DateTime<Utc>, tz: Tz) -> bool {
    matches!(
        localize(instant, tz).weekday(),
        Weekday::Sat | Weekday::Sun
    )
}

/// Check if the local date of an instant is a public holiday of a country.
///
/// The holiday calendar is resolved for the year of the local date, which may
/// differ from the year of the UTC instant around new year.
pub fn is_holiday(
    instant: DateTime<Utc>,
    tz: Tz,
    country: Country,
    provider: &impl HolidayProvider,
) -> Result<bool> {
    let date = localize(instant, tz).date_naive();
    let calendar = provider.holidays_for(country, date.year())?;
    Ok(calendar.contains(date))
}

/// Check if daylight saving time is in effect in a timezone at given instant.
pub fn is_daylight_saving(instant: DateTime<Utc>, tz: Tz) -> bool {
    dst_offset(instant, tz) != Duration::zero()
}
