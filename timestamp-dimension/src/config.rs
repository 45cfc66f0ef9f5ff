use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::country::CountrySet;
use crate::flags::WorkingHours;
use crate::timestamps::DateRange;

/// Path of the generated table when none is specified.
pub const DEFAULT_OUTPUT: &str = "timestamp_dimension.csv";

/// Number of rows between two progress messages when none is specified.
pub const DEFAULT_PROGRESS_EVERY: usize = 10_000;

/// Everything a generation run, and the verification of its output, depends on.
///
/// ```
/// use timestamp_dimension::Config;
///
/// let config = Config::default();
/// assert_eq!(config.range().to_string(), "2022-01-01 to 2026-12-31");
/// assert_eq!(config.countries().len(), 6);
/// assert_eq!(config.expected_rows(), 262_806);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    range: DateRange,
    countries: CountrySet,
    working_hours: WorkingHours,
    progress_every: usize,
    output: PathBuf,
}

impl Config {
    pub fn new(range: DateRange, countries: CountrySet) -> Self {
        Self {
            range,
            countries,
            working_hours: WorkingHours::default(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            output: DEFAULT_OUTPUT.into(),
        }
    }

    // --
    // -- Builder Methods
    // --

    pub fn with_range(self, range: DateRange) -> Self {
        Self { range, ..self }
    }

    pub fn with_countries(self, countries: CountrySet) -> Self {
        Self { countries, ..self }
    }

    pub fn with_working_hours(self, working_hours: WorkingHours) -> Self {
        Self { working_hours, ..self }
    }

    /// Log progress every `progress_every` rows, a value of 0 disables progress messages.
    pub fn with_progress_every(self, progress_every: usize) -> Self {
        Self { progress_every, ..self }
    }

    pub fn with_output(self, output: impl Into<PathBuf>) -> Self {
        Self { output: output.into(), ..self }
    }

    // --
    // -- Getters
    // --

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn countries(&self) -> &CountrySet {
        &self.countries
    }

    pub fn working_hours(&self) -> WorkingHours {
        self.working_hours
    }

    pub fn progress_every(&self) -> usize {
        self.progress_every
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Number of rows of a complete table for this configuration.
    pub fn expected_rows(&self) -> usize {
        self.range.hour_count() * self.countries.len()
    }
}

impl Default for Config {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).expect("invalid default start date");
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).expect("invalid default end date");
        let range = DateRange::new(start, end).expect("invalid default range");
        Self::new(range, CountrySet::default())
    }
}
