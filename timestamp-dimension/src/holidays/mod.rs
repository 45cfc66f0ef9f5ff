//! Public holiday calendars, as embedded in the holiday database of `opening-hours`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use compact_calendar::CompactCalendar;

use crate::country::Country;
use crate::error::{Error, Result};

/// List the public holidays of a country for a given year, sorted by date.
///
/// ```
/// use chrono::NaiveDate;
/// use timestamp_dimension::country::Country;
/// use timestamp_dimension::holidays::holidays;
///
/// let holidays_fr = holidays(Country::FR, 2024).unwrap();
/// assert_eq!(holidays_fr[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert!(holidays_fr.contains(&NaiveDate::from_ymd_opt(2024, 7, 14).unwrap()));
/// ```
pub fn holidays(country: Country, year: i32) -> Result<Vec<NaiveDate>> {
    let calendar = BuiltinHolidays::new().holidays_for(country, year)?;

    Ok(calendar
        .iter()
        .skip_while(|date| date.year() < year)
        .take_while(|date| date.year() == year)
        .collect())
}

/// Resolves the set of public holidays of a country for a given year.
///
/// The returned calendar may hold more years than requested, but it must cover `year`.
pub trait HolidayProvider {
    fn holidays_for(&self, country: Country, year: i32) -> Result<Arc<CompactCalendar>>;
}

impl<P: HolidayProvider + ?Sized> HolidayProvider for &P {
    fn holidays_for(&self, country: Country, year: i32) -> Result<Arc<CompactCalendar>> {
        (**self).holidays_for(country, year)
    }
}

/// Public holidays loaded from the database embedded in `opening-hours`, each country being loaded
/// once.
///
/// Years that the database does not cover fail with [`Error::HolidayLookup`].
#[derive(Debug, Default)]
pub struct BuiltinHolidays {
    cache: RefCell<HashMap<Country, Arc<CompactCalendar>>>,
}

impl BuiltinHolidays {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&self, country: Country) -> Result<Arc<CompactCalendar>> {
        if let Some(calendar) = self.cache.borrow().get(&country) {
            return Ok(calendar.clone());
        }

        let calendar = Arc::new(country.region()?.holidays().get_public().clone());

        #[cfg(feature = "log")]
        log::debug!("Loaded {} public holidays for {country}", calendar.count());

        self.cache.borrow_mut().insert(country, calendar.clone());
        Ok(calendar)
    }
}

impl HolidayProvider for BuiltinHolidays {
    /// ```
    /// use chrono::NaiveDate;
    /// use timestamp_dimension::country::Country;
    /// use timestamp_dimension::holidays::{BuiltinHolidays, HolidayProvider};
    ///
    /// let provider = BuiltinHolidays::new();
    /// let holidays_de = provider.holidays_for(Country::DE, 2023).unwrap();
    /// let date = NaiveDate::from_ymd_opt(2023, 10, 3).unwrap(); // german unity day
    /// assert!(holidays_de.contains(date));
    /// ```
    fn holidays_for(&self, country: Country, year: i32) -> Result<Arc<CompactCalendar>> {
        let calendar = self.load(country)?;

        let covered = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|first_day| calendar.year_for(first_day))
            .is_some();

        if !covered {
            return Err(Error::HolidayLookup { country, year });
        }

        Ok(calendar)
    }
}
