use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::country::{Country, CountryProfile};
use crate::error::Result;
use crate::flags::{
    is_daylight_saving, is_holiday, is_weekend, is_working_hours, Flag, WorkingHours,
};
use crate::holidays::HolidayProvider;

// --
// -- Rows
// --

/// A row of the dimension table: an hour of a country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimestampRow {
    /// Hour-aligned instant, in UTC.
    pub timestamp: DateTime<Utc>,
    pub country: Country,
    pub timezone: Tz,
    pub holiday: bool,
    pub daylight_savings: bool,
    pub working_hours: bool,
    pub weekend: bool,
}

impl TimestampRow {
    /// Compute all the flags of a country at given instant.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use timestamp_dimension::country::{Country, CountryProfile};
    /// use timestamp_dimension::flags::WorkingHours;
    /// use timestamp_dimension::holidays::BuiltinHolidays;
    /// use timestamp_dimension::TimestampRow;
    ///
    /// let profile = CountryProfile::new(Country::FR, "France", chrono_tz::Europe::Paris);
    /// let instant = Utc.with_ymd_and_hms(2023, 7, 14, 10, 0, 0).unwrap();
    ///
    /// let row = TimestampRow::derive(
    ///     instant,
    ///     &profile,
    ///     WorkingHours::default(),
    ///     &BuiltinHolidays::new(),
    /// )
    /// .unwrap();
    ///
    /// assert!(row.holiday && row.daylight_savings && row.working_hours && !row.weekend);
    /// ```
    pub fn derive(
        timestamp: DateTime<Utc>,
        profile: &CountryProfile,
        working_hours: WorkingHours,
        provider: &impl HolidayProvider,
    ) -> Result<Self> {
        let tz = profile.timezone();

        Ok(Self {
            timestamp,
            country: profile.country(),
            timezone: tz,
            holiday: is_holiday(timestamp, tz, profile.country(), provider)?,
            daylight_savings: is_daylight_saving(timestamp, tz),
            working_hours: is_working_hours(timestamp, tz, working_hours),
            weekend: is_weekend(timestamp, tz),
        })
    }

    /// Rows of a table are sorted by timestamp, then by country code.
    fn sort_key(&self) -> (DateTime<Utc>, Country) {
        (self.timestamp, self.country)
    }
}

/// Lazily derive the rows for each hour of the configured range and each configured country.
///
/// Rows are yielded hour by hour, following the configuration order of
/// countries within an hour.
pub fn rows<'a>(
    config: &'a Config,
    provider: &'a impl HolidayProvider,
) -> impl Iterator<Item = Result<TimestampRow>> + 'a {
    let countries = config.countries();
    let working_hours = config.working_hours();

    config.range().hours().flat_map(move |timestamp| {
        countries
            .iter()
            .map(move |profile| TimestampRow::derive(timestamp, profile, working_hours, provider))
    })
}

// --
// -- Table
// --

/// A complete dimension table, sorted by timestamp and then by country code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DimensionTable {
    rows: Vec<TimestampRow>,
}

impl DimensionTable {
    /// Derive all rows described by a configuration, failing on the first row that can't be
    /// computed.
    pub fn build(config: &Config, provider: &impl HolidayProvider) -> Result<Self> {
        let total = config.expected_rows();

        #[cfg(feature = "log")]
        log::info!(
            "Generating timestamp dimension table from {} ({total} rows)",
            config.range(),
        );

        let mut res = Vec::with_capacity(total);

        for row in rows(config, provider) {
            res.push(row?);

            #[cfg(feature = "log")]
            {
                let every = config.progress_every();

                if every != 0 && res.len() % every == 0 {
                    log::info!(
                        "Processed {} / {total} combinations ({:.1}%)",
                        res.len(),
                        percent(res.len(), total),
                    );
                }
            }
        }

        let table = Self::from_rows(res);

        #[cfg(feature = "log")]
        log::info!("Generated {} rows", table.len());

        Ok(table)
    }

    /// Build a table from rows in any order.
    pub fn from_rows(mut rows: Vec<TimestampRow>) -> Self {
        rows.sort_by(|x, y| x.sort_key().cmp(&y.sort_key()));
        Self { rows }
    }

    pub fn rows(&self) -> &[TimestampRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        TableStats::from_rows(&self.rows)
    }

    /// Serialize this table as CSV into a writer.
    pub fn write_csv(&self, writer: impl io::Write) -> Result<()> {
        crate::record::write_rows(&self.rows, writer)
    }

    /// Serialize this table as CSV into a new file, replacing any existing one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::record::save_rows(&self.rows, path.as_ref())
    }
}

impl<'a> IntoIterator for &'a DimensionTable {
    type Item = &'a TimestampRow;
    type IntoIter = std::slice::Iter<'a, TimestampRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// --
// -- Stats
// --

/// Summary of a dimension table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    pub rows: usize,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub countries: BTreeSet<Country>,
    /// Number of rows where each flag is set.
    pub flags: BTreeMap<Flag, usize>,
}

impl TableStats {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a TimestampRow>) -> Self {
        let mut stats = Self {
            flags: Flag::ALL.into_iter().map(|flag| (flag, 0)).collect(),
            ..Default::default()
        };

        for row in rows {
            stats.rows += 1;
            stats.countries.insert(row.country);

            stats.first_timestamp =
                Some(stats.first_timestamp.map_or(row.timestamp, |t| t.min(row.timestamp)));

            stats.last_timestamp =
                Some(stats.last_timestamp.map_or(row.timestamp, |t| t.max(row.timestamp)));

            for flag in Flag::ALL {
                if flag.of(row) {
                    *stats.flags.entry(flag).or_default() += 1;
                }
            }
        }

        stats
    }
}

impl Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total rows: {}", self.rows)?;

        if let (Some(first), Some(last)) = (self.first_timestamp, self.last_timestamp) {
            writeln!(
                f,
                "Date range: {} to {}",
                first.format(crate::record::TIMESTAMP_FORMAT),
                last.format(crate::record::TIMESTAMP_FORMAT),
            )?;
        }

        let countries: Vec<_> = self.countries.iter().map(|c| c.code()).collect();
        writeln!(f, "Countries: {}", countries.join(", "))?;

        for (flag, count) in &self.flags {
            writeln!(
                f,
                "{flag}: {count} records ({:.1}%)",
                percent(*count, self.rows),
            )?;
        }

        Ok(())
    }
}

/// Share of `count` in `total`, as a percentage. An empty total gives 0.
pub(crate) fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    count as f64 / total as f64 * 100.0
}
