use std::sync::Arc;

use chrono::Timelike;
use chrono_tz::Europe;
use compact_calendar::CompactCalendar;

use crate::country::Country;
use crate::error::Error;
use crate::flags::{
    is_daylight_saving, is_holiday, is_weekend, is_working_hours, Flag, WorkingHours,
};
use crate::holidays::{BuiltinHolidays, HolidayProvider};
use crate::localize::{dst_offset, localize};
use crate::{date, utc};

/// Only knows about Bastille day, in 2023.
struct BastilleDay;

impl HolidayProvider for BastilleDay {
    fn holidays_for(&self, country: Country, year: i32) -> Result<Arc<CompactCalendar>, Error> {
        if year != 2023 {
            return Err(Error::HolidayLookup { country, year });
        }

        let mut calendar = CompactCalendar::default();
        calendar.insert(date!("2023-07-14"));
        Ok(Arc::new(calendar))
    }
}

#[test]
fn flag_columns() {
    let columns: Vec<_> = Flag::ALL.iter().map(|flag| flag.column()).collect();
    assert_eq!(columns, ["holiday", "daylight_savings", "working_hours", "weekend"]);
    assert_eq!(Flag::DaylightSavings.to_string(), "daylight_savings");
}

#[test]
fn working_hours_window() -> Result<(), Error> {
    let hours = WorkingHours::default();
    assert_eq!((hours.start(), hours.end()), (9, 18));
    assert!(!hours.contains(8));
    assert!(hours.contains(9));
    assert!(hours.contains(17));
    assert!(!hours.contains(18));

    let night_shift = WorkingHours::new(20, 24)?;
    assert!(night_shift.contains(23));
    assert!(!night_shift.contains(0));

    assert!(matches!(
        WorkingHours::new(18, 9),
        Err(Error::InvalidWorkingHours { start: 18, end: 9 })
    ));

    assert!(WorkingHours::new(9, 9).is_err());
    assert!(WorkingHours::new(9, 25).is_err());
    Ok(())
}

#[test]
fn working_hours_boundaries() {
    let hours = WorkingHours::default();

    // Paris is at UTC+1 in winter
    assert!(!is_working_hours(utc!("2023-01-10 07:00"), Europe::Paris, hours));
    assert!(is_working_hours(utc!("2023-01-10 08:00"), Europe::Paris, hours));
    assert!(is_working_hours(utc!("2023-01-10 16:00"), Europe::Paris, hours));
    assert!(!is_working_hours(utc!("2023-01-10 17:00"), Europe::Paris, hours));

    // Lisbon is at UTC+0 in winter
    assert!(!is_working_hours(utc!("2023-01-10 08:00"), Europe::Lisbon, hours));
    assert!(is_working_hours(utc!("2023-01-10 09:00"), Europe::Lisbon, hours));
    assert!(!is_working_hours(utc!("2023-01-10 18:00"), Europe::Lisbon, hours));

    // Working hours don't depend on the day of the week
    assert!(is_working_hours(utc!("2023-01-01 10:00"), Europe::Lisbon, hours));
}

#[test]
fn working_hours_in_summer() {
    let hours = WorkingHours::default();

    // 8:00 UTC is 10:00 in Paris and 9:00 in Lisbon
    assert!(is_working_hours(utc!("2023-07-04 08:00"), Europe::Paris, hours));
    assert!(is_working_hours(utc!("2023-07-04 08:00"), Europe::Lisbon, hours));
    assert!(!is_working_hours(utc!("2023-07-04 07:00"), Europe::Lisbon, hours));
    assert!(is_working_hours(utc!("2023-07-04 15:00"), Europe::Berlin, hours));
    assert!(!is_working_hours(utc!("2023-07-04 16:00"), Europe::Berlin, hours));
}

#[test]
fn weekend_uses_local_date() {
    // Friday 23:00 in Lisbon is already Saturday in Paris
    assert!(is_weekend(utc!("2023-06-16 22:00"), Europe::Paris));
    assert!(!is_weekend(utc!("2023-06-16 22:00"), Europe::Lisbon));

    // Sunday 23:00 in Lisbon is already Monday in Paris
    assert!(!is_weekend(utc!("2023-06-18 22:00"), Europe::Paris));
    assert!(is_weekend(utc!("2023-06-18 22:00"), Europe::Lisbon));

    assert!(is_weekend(utc!("2023-06-17 12:00"), Europe::Rome));
    assert!(!is_weekend(utc!("2023-06-14 12:00"), Europe::Rome));
}

#[test]
fn holiday_uses_local_date() -> Result<(), Error> {
    let provider = BuiltinHolidays::new();

    // New year is already there in Paris, but not in Lisbon
    let instant = utc!("2022-12-31 23:00");
    assert!(is_holiday(instant, Europe::Paris, Country::FR, &provider)?);
    assert!(!is_holiday(instant, Europe::Lisbon, Country::PT, &provider)?);

    let instant = utc!("2023-01-01 23:00");
    assert!(!is_holiday(instant, Europe::Paris, Country::FR, &provider)?);
    assert!(is_holiday(instant, Europe::Lisbon, Country::PT, &provider)?);
    Ok(())
}

#[test]
fn holiday_is_resolved_by_country() -> Result<(), Error> {
    let provider = BuiltinHolidays::new();
    let instant = utc!("2023-10-03 12:00");

    // German Unity Day, observed in Berlin but not in France
    assert!(is_holiday(instant, Europe::Berlin, Country::DE, &provider)?);
    assert!(!is_holiday(instant, Europe::Berlin, Country::FR, &provider)?);
    Ok(())
}

#[test]
fn holiday_with_custom_provider() -> Result<(), Error> {
    let instant = utc!("2023-07-14 10:00");
    assert!(is_holiday(instant, Europe::Madrid, Country::ES, &BastilleDay)?);
    assert!(!is_holiday(utc!("2023-01-01 10:00"), Europe::Madrid, Country::ES, &BastilleDay)?);
    Ok(())
}

#[test]
fn holiday_lookup_failure() {
    let provider = BuiltinHolidays::new();

    assert!(matches!(
        is_holiday(utc!("1000-06-01 12:00"), Europe::Paris, Country::FR, &provider),
        Err(Error::HolidayLookup { country: Country::FR, year: 1000 })
    ));

    // Still 2023 in UTC, but already 2024 in Paris
    assert!(is_holiday(utc!("2023-12-31 22:00"), Europe::Paris, Country::FR, &BastilleDay).is_ok());

    assert!(matches!(
        is_holiday(utc!("2023-12-31 23:00"), Europe::Paris, Country::FR, &BastilleDay),
        Err(Error::HolidayLookup { year: 2024, .. })
    ));
}

#[test]
fn daylight_saving_seasons() {
    for tz in [Europe::Lisbon, Europe::Paris, Europe::Amsterdam, Europe::Rome] {
        assert!(is_daylight_saving(utc!("2023-07-01 12:00"), tz));
        assert!(!is_daylight_saving(utc!("2023-01-15 12:00"), tz));
    }

    assert_eq!(
        dst_offset(utc!("2023-07-01 12:00"), Europe::Madrid),
        chrono::Duration::hours(1)
    );
}

#[test]
fn daylight_saving_start() {
    // Clocks go from 2:00 to 3:00 in Paris, local time 2:00 is never produced
    let before = utc!("2024-03-31 00:00");
    let after = utc!("2024-03-31 01:00");

    assert_eq!(localize(before, Europe::Paris).hour(), 1);
    assert_eq!(localize(after, Europe::Paris).hour(), 3);
    assert!(!is_daylight_saving(before, Europe::Paris));
    assert!(is_daylight_saving(after, Europe::Paris));
}

#[test]
fn daylight_saving_end() {
    // Clocks go from 3:00 back to 2:00 in Paris, local time 2:00 is reached twice
    let first = utc!("2024-10-27 00:00");
    let second = utc!("2024-10-27 01:00");

    assert_eq!(localize(first, Europe::Paris).hour(), 2);
    assert_eq!(localize(second, Europe::Paris).hour(), 2);
    assert!(is_daylight_saving(first, Europe::Paris));
    assert!(!is_daylight_saving(second, Europe::Paris));
    assert_eq!(localize(first, Europe::Paris).date_naive(), date!("2024-10-27"));
}
