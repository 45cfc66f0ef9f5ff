use std::fmt::Display;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::country::Country;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnknownCountryCode(pub String);

impl Display for UnknownCountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown ISO code `{}`", self.0)
    }
}

impl std::error::Error for UnknownCountryCode {}

/// Any failure that aborts generation or verification of a dimension table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --
    // -- Configuration
    // --
    #[error("invalid date `{value}`, expected YYYY-MM-DD: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("end date {end} is before start date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    UnknownCountry(#[from] UnknownCountryCode),

    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),

    #[error("country {0} is configured more than once")]
    DuplicateCountry(Country),

    #[error("no country configured")]
    NoCountries,

    #[error("invalid country profile at line {line}: {reason}")]
    InvalidProfile { line: usize, reason: String },

    #[error("invalid working hours [{start}, {end}), expected start < end <= 24")]
    InvalidWorkingHours { start: u32, end: u32 },

    // --
    // -- Lookup
    // --
    #[error("no holiday calendar available for {country} in {year}")]
    HolidayLookup { country: Country, year: i32 },

    // --
    // -- I/O
    // --
    #[error("could not access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}: invalid value `{value}` in column `{column}`")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },
}
