//! CSV representation of a dimension table.
//!
//! The file has a header row followed by one line per row. Flags are written
//! as `0` or `1` and timestamps as `YYYY-MM-DD HH:MM:SS`, which are UTC by
//! convention and carry no offset suffix.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::country::Country;
use crate::error::{Error, Result};
use crate::flags::Flag;
use crate::table::{DimensionTable, TimestampRow};

/// Format of the timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_COUNTRY: &str = "country_code";
pub const COL_TIMEZONE: &str = "timezone";

/// Header of the CSV file, in column order.
pub const COLUMNS: [&str; 7] = [
    COL_TIMESTAMP,
    COL_COUNTRY,
    COL_TIMEZONE,
    Flag::Holiday.column(),
    Flag::DaylightSavings.column(),
    Flag::WorkingHours.column(),
    Flag::Weekend.column(),
];

// --
// -- Write
// --

fn bit(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub(crate) fn write_rows(rows: &[TimestampRow], writer: impl io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(COLUMNS)?;

    for row in rows {
        let timestamp = row.timestamp.format(TIMESTAMP_FORMAT).to_string();

        writer.write_record([
            timestamp.as_str(),
            row.country.code(),
            row.timezone.name(),
            bit(row.holiday),
            bit(row.daylight_savings),
            bit(row.working_hours),
            bit(row.weekend),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(crate) fn save_rows(rows: &[TimestampRow], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io { path: path.into(), source })?;
    write_rows(rows, BufWriter::new(file))?;

    #[cfg(feature = "log")]
    log::info!("Saved {} rows to {}", rows.len(), path.display());

    Ok(())
}

// --
// -- Read
// --

/// A row read back from a CSV file, where any cell may be missing.
///
/// Flags are kept as raw text so that unexpected values can be reported
/// instead of failing the read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Line of the row in its file, starting at 1 for the header.
    pub line: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    /// Values of flags, in the order of [`Flag::ALL`].
    pub flags: [Option<String>; 4],
}

impl RawRow {
    /// Raw value of a flag column.
    pub fn flag(&self, flag: Flag) -> Option<&str> {
        self.flags[flag as usize].as_deref()
    }

    /// Which cells of this row are missing, in the order of [`COLUMNS`].
    pub fn missing(&self) -> [bool; 7] {
        [
            self.timestamp.is_none(),
            self.country_code.is_none(),
            self.timezone.is_none(),
            self.flags[0].is_none(),
            self.flags[1].is_none(),
            self.flags[2].is_none(),
            self.flags[3].is_none(),
        ]
    }

    fn parse_error(&self, column: &'static str, value: Option<&str>) -> Error {
        Error::Parse {
            line: self.line,
            column,
            value: value.unwrap_or_default().to_string(),
        }
    }
}

impl TryFrom<RawRow> for TimestampRow {
    type Error = Error;

    fn try_from(raw: RawRow) -> Result<Self> {
        let timestamp = raw
            .timestamp
            .ok_or_else(|| raw.parse_error(COL_TIMESTAMP, None))?;

        let country = raw
            .country_code
            .as_deref()
            .and_then(|code| code.parse::<Country>().ok())
            .ok_or_else(|| raw.parse_error(COL_COUNTRY, raw.country_code.as_deref()))?;

        let timezone = raw
            .timezone
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
            .ok_or_else(|| raw.parse_error(COL_TIMEZONE, raw.timezone.as_deref()))?;

        let flag = |flag: Flag| match raw.flag(flag) {
            Some("1") => Ok(true),
            Some("0") => Ok(false),
            other => Err(raw.parse_error(flag.column(), other)),
        };

        Ok(Self {
            timestamp,
            country,
            timezone,
            holiday: flag(Flag::Holiday)?,
            daylight_savings: flag(Flag::DaylightSavings)?,
            working_hours: flag(Flag::WorkingHours)?,
            weekend: flag(Flag::Weekend)?,
        })
    }
}

/// Parse a timestamp formatted as in the table, interpreted as UTC.
///
/// ```
/// use timestamp_dimension::record::parse_timestamp;
///
/// let instant = parse_timestamp("2023-06-14 10:00:00").unwrap();
/// assert_eq!(instant.to_rfc3339(), "2023-06-14T10:00:00+00:00");
/// assert!(parse_timestamp("2023-06-14T10:00:00Z").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Read all rows of a CSV file. Columns are found from the header, so a missing column results
/// in missing cells rather than in an error.
pub fn read_records(reader: impl io::Read) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|header| header.trim() == name);
    let col_timestamp = position(COL_TIMESTAMP);
    let col_country = position(COL_COUNTRY);
    let col_timezone = position(COL_TIMEZONE);
    let col_flags = Flag::ALL.map(|flag| position(flag.column()));
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;

        let cell = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let timestamp = cell(col_timestamp)
            .map(|value| {
                parse_timestamp(value).ok_or_else(|| Error::Parse {
                    line,
                    column: COL_TIMESTAMP,
                    value: value.to_string(),
                })
            })
            .transpose()?;

        rows.push(RawRow {
            line,
            timestamp,
            country_code: cell(col_country).map(str::to_string),
            timezone: cell(col_timezone).map(str::to_string),
            flags: col_flags.map(|col| cell(col).map(str::to_string)),
        });
    }

    Ok(rows)
}

/// Read all rows of a CSV file from disk, see [`read_records`].
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io { path: path.into(), source })?;
    let rows = read_records(BufReader::new(file))?;

    #[cfg(feature = "log")]
    log::info!("Loaded {} rows from {}", rows.len(), path.display());

    Ok(rows)
}

impl DimensionTable {
    /// Read back a table written by [`DimensionTable::write_csv`], failing on any missing or
    /// invalid value.
    pub fn read_csv(reader: impl io::Read) -> Result<Self> {
        let rows = read_records(reader)?
            .into_iter()
            .map(TimestampRow::try_from)
            .collect::<Result<_>>()?;

        Ok(Self::from_rows(rows))
    }

    /// Read back a table saved by [`DimensionTable::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let rows = load_records(path)?
            .into_iter()
            .map(TimestampRow::try_from)
            .collect::<Result<_>>()?;

        Ok(Self::from_rows(rows))
    }
}
