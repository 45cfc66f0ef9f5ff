#![doc = include_str!("../../README.md")]

pub mod config;
pub mod country;
pub mod error;
pub mod flags;
pub mod holidays;
pub mod localize;
pub mod record;
pub mod table;
pub mod timestamps;
pub mod verify;

#[cfg(test)]
mod tests;

// Public re-exports
pub use crate::config::Config;
pub use crate::country::{Country, CountryProfile, CountrySet};
pub use crate::error::{Error, Result};
pub use crate::holidays::{BuiltinHolidays, HolidayProvider};
pub use crate::table::{DimensionTable, TableStats, TimestampRow};
pub use crate::timestamps::DateRange;
pub use crate::verify::{verify, Report};
