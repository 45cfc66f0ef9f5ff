//! Read-only checks of a generated dimension table.
//!
//! All checks run on rows read back from a file, whatever the outcome of the
//! other checks, and their failures are collected as a list of issues in a
//! [`Report`] rather than as errors.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Display;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::config::Config;
use crate::country::Country;
use crate::error::{Error, Result};
use crate::flags::Flag;
use crate::record::{load_records, RawRow, COLUMNS, TIMESTAMP_FORMAT};
use crate::table::percent;

/// Above this share of rows flagged as working hours at midnight UTC, the table is reported as
/// inconsistent.
pub const MAX_MIDNIGHT_WORKING_SHARE: f64 = 5.0;

/// Outcome of a check on a sample of rows.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Passed,
    Failed,
    /// The sample is out of the configured range.
    Skipped,
}

/// A check on specific rows of the table, compared against known ground truth.
#[derive(Clone, Debug, PartialEq)]
pub struct SpotCheck {
    pub label: &'static str,
    /// Human readable summary of what was observed.
    pub observed: String,
    pub outcome: Outcome,
}

/// What is known about a country from the rows of a table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountrySummary {
    pub unique_timestamps: usize,
    pub timezones: BTreeSet<String>,
}

/// Distribution of the values of a flag column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSummary {
    /// Number of rows where the flag is set.
    pub set: usize,
    /// All distinct values found in the column.
    pub values: BTreeSet<String>,
}

/// Statistics and outcome of all checks performed on a table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub rows: usize,
    pub expected_rows: usize,
    /// Size in bytes of the verified file, when read from disk.
    pub file_size: Option<u64>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub countries: BTreeMap<String, CountrySummary>,
    /// Number of missing values, by column.
    pub missing: BTreeMap<&'static str, usize>,
    pub flags: BTreeMap<Flag, FlagSummary>,
    pub duplicates: usize,
    pub misaligned: usize,
    pub unsorted: usize,
    /// Share of rows in summer 2023 flagged as daylight saving time.
    pub summer_dst_share: Option<f64>,
    /// Share of rows at 8:00 UTC in summer 2023 flagged as working hours.
    pub summer_8am_working_share: Option<f64>,
    /// Share of rows at midnight UTC flagged as working hours.
    pub midnight_working_share: Option<f64>,
    pub spot_checks: Vec<SpotCheck>,
    pub issues: Vec<String>,
}

impl Report {
    /// Check if no issue was found.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Verify rows of a table against the configuration it was generated with.
pub fn verify(rows: &[RawRow], config: &Config) -> Report {
    let mut report = Report {
        rows: rows.len(),
        expected_rows: config.expected_rows(),
        ..Default::default()
    };

    check_row_count(&mut report);
    check_completeness(rows, &mut report);
    check_duplicates(rows, &mut report);
    check_alignment_and_order(rows, &mut report);
    check_flag_domains(rows, &mut report);
    check_countries(rows, config, &mut report);
    check_samples(rows, config, &mut report);
    collect_timezone_insights(rows, &mut report);
    report
}

/// Load a table from disk and verify it, see [`verify`].
pub fn verify_file(path: impl AsRef<Path>, config: &Config) -> Result<Report> {
    let path = path.as_ref();
    let rows = load_records(path)?;

    let metadata =
        std::fs::metadata(path).map_err(|source| Error::Io { path: path.into(), source })?;

    let mut report = verify(&rows, config);
    report.file_size = Some(metadata.len());

    #[cfg(feature = "log")]
    {
        if report.passed() {
            log::info!("Verification passed for {} rows", report.rows);
        } else {
            log::warn!("Verification found {} issues", report.issues.len());
        }
    }

    Ok(report)
}

// --
// -- Checks
// --

fn check_row_count(report: &mut Report) {
    if report.rows != report.expected_rows {
        report.issues.push(format!(
            "Found {} rows, expected {}",
            report.rows, report.expected_rows
        ));
    }
}

fn check_completeness(rows: &[RawRow], report: &mut Report) {
    report.missing = COLUMNS.into_iter().map(|col| (col, 0)).collect();

    for row in rows {
        for (col, missing) in COLUMNS.into_iter().zip(row.missing()) {
            if missing {
                *report.missing.entry(col).or_default() += 1;
            }
        }

        if let Some(timestamp) = row.timestamp {
            report.first_timestamp =
                Some(report.first_timestamp.map_or(timestamp, |t| t.min(timestamp)));

            report.last_timestamp =
                Some(report.last_timestamp.map_or(timestamp, |t| t.max(timestamp)));
        }
    }

    let total_missing: usize = report.missing.values().sum();

    if total_missing > 0 {
        report
            .issues
            .push(format!("Found {total_missing} missing values"));
    }
}

fn check_duplicates(rows: &[RawRow], report: &mut Report) {
    let mut seen = HashSet::new();

    for row in rows {
        let (Some(timestamp), Some(country)) = (row.timestamp, row.country_code.as_deref()) else {
            continue;
        };

        if !seen.insert((timestamp, country)) {
            report.duplicates += 1;
        }
    }

    if report.duplicates > 0 {
        report
            .issues
            .push(format!("Found {} duplicate records", report.duplicates));
    }
}

fn check_alignment_and_order(rows: &[RawRow], report: &mut Report) {
    let keys: Vec<_> = rows
        .iter()
        .filter_map(|row| Some((row.timestamp?, row.country_code.as_deref()?)))
        .collect();

    report.misaligned = keys
        .iter()
        .filter(|(timestamp, _)| {
            timestamp.minute() != 0 || timestamp.second() != 0 || timestamp.nanosecond() != 0
        })
        .count();

    report.unsorted = keys.windows(2).filter(|pair| pair[0] > pair[1]).count();

    if report.misaligned > 0 {
        report.issues.push(format!(
            "Found {} timestamps that are not aligned on an hour",
            report.misaligned
        ));
    }

    if report.unsorted > 0 {
        report.issues.push(format!(
            "Found {} rows out of (timestamp, country_code) order",
            report.unsorted
        ));
    }
}

fn check_flag_domains(rows: &[RawRow], report: &mut Report) {
    for flag in Flag::ALL {
        let mut summary = FlagSummary::default();

        for value in rows.iter().filter_map(|row| row.flag(flag)) {
            if value == "1" {
                summary.set += 1;
            }

            summary.values.insert(value.to_string());
        }

        let unexpected: Vec<_> = summary
            .values
            .iter()
            .filter(|value| !matches!(value.as_str(), "0" | "1"))
            .map(String::as_str)
            .collect();

        if !unexpected.is_empty() {
            report.issues.push(format!(
                "Column {flag} contains values other than 0 and 1: {}",
                unexpected.join(", ")
            ));
        }

        report.flags.insert(flag, summary);
    }
}

fn check_countries(rows: &[RawRow], config: &Config, report: &mut Report) {
    let mut timestamps: HashMap<&str, HashSet<DateTime<Utc>>> = HashMap::new();

    for row in rows {
        let Some(country) = row.country_code.as_deref() else {
            continue;
        };

        let summary = report.countries.entry(country.to_string()).or_default();

        if let Some(timezone) = &row.timezone {
            summary.timezones.insert(timezone.clone());
        }

        if let Some(timestamp) = row.timestamp {
            timestamps.entry(country).or_default().insert(timestamp);
        }
    }

    for (country, summary) in &mut report.countries {
        summary.unique_timestamps = timestamps.get(country.as_str()).map_or(0, HashSet::len);

        if summary.timezones.len() > 1 {
            report.issues.push(format!(
                "Country {country} has {} timezones",
                summary.timezones.len()
            ));
        }

        let expected_tz = country
            .parse::<Country>()
            .ok()
            .and_then(|country| config.countries().get(country))
            .map(|profile| profile.timezone().name());

        match expected_tz {
            None => report
                .issues
                .push(format!("Country {country} is not configured")),
            Some(expected) if summary.timezones.iter().any(|tz| tz != expected) => {
                report.issues.push(format!(
                    "Country {country} is expected to use timezone {expected}"
                ))
            }
            Some(_) => {}
        }
    }

    for profile in config.countries() {
        if !report.countries.contains_key(profile.country().code()) {
            report
                .issues
                .push(format!("Country {} has no rows", profile.country()));
        }
    }
}

/// Rows of the table at given instant.
fn rows_at(rows: &[RawRow], instant: DateTime<Utc>) -> impl Iterator<Item = &RawRow> {
    rows.iter().filter(move |row| row.timestamp == Some(instant))
}

/// Rows of the table from `start` included to `end` excluded.
fn rows_between(
    rows: &[RawRow],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> impl Iterator<Item = &RawRow> {
    rows.iter()
        .filter(move |row| row.timestamp.is_some_and(|ts| (start..end).contains(&ts)))
}

/// Share of given rows where a flag is set, if there is any row.
fn flag_share<'a>(rows: impl IntoIterator<Item = &'a RawRow>, flag: Flag) -> Option<f64> {
    let (total, set) = rows.into_iter().fold((0, 0), |(total, set), row| {
        (total + 1, set + usize::from(row.flag(flag) == Some("1")))
    });

    (total > 0).then(|| percent(set, total))
}

fn check_samples(rows: &[RawRow], config: &Config, report: &mut Report) {
    // Flag expected to be set for every country at a given instant.
    let samples = [
        ("New Year 2023 holidays", utc(2023, 1, 1, 0), Flag::Holiday),
        ("Working hours on Wed 10 AM UTC", utc(2023, 6, 14, 10), Flag::WorkingHours),
        ("Weekend detection on Saturday", utc(2023, 6, 17, 12), Flag::Weekend),
    ];

    let expected = config.countries().len();

    for (label, instant, flag) in samples {
        let check = if config.range().contains(instant) {
            let set = rows_at(rows, instant)
                .filter(|row| row.flag(flag) == Some("1"))
                .count();

            SpotCheck {
                label,
                observed: format!("{set}/{expected} countries"),
                outcome: if set == expected { Outcome::Passed } else { Outcome::Failed },
            }
        } else {
            SpotCheck { label, observed: String::new(), outcome: Outcome::Skipped }
        };

        report.spot_checks.push(check);
    }

    let at_midnight = rows
        .iter()
        .filter(|row| row.timestamp.is_some_and(|ts| ts.hour() == 0));

    report.midnight_working_share = flag_share(at_midnight, Flag::WorkingHours);

    let check = match report.midnight_working_share {
        Some(share) => SpotCheck {
            label: "Midnight UTC working hours",
            observed: format!("{share:.1}%"),
            outcome: if share <= MAX_MIDNIGHT_WORKING_SHARE {
                Outcome::Passed
            } else {
                Outcome::Failed
            },
        },
        None => SpotCheck {
            label: "Midnight UTC working hours",
            observed: String::new(),
            outcome: Outcome::Skipped,
        },
    };

    report.spot_checks.push(check);

    for check in &report.spot_checks {
        if check.outcome == Outcome::Failed {
            report
                .issues
                .push(format!("Spot check failed: {} ({})", check.label, check.observed));
        }
    }
}

fn collect_timezone_insights(rows: &[RawRow], report: &mut Report) {
    let (summer_start, summer_end) = (utc(2023, 6, 1, 0), utc(2023, 9, 1, 0));

    report.summer_dst_share = flag_share(
        rows_between(rows, summer_start, summer_end),
        Flag::DaylightSavings,
    );

    report.summer_8am_working_share = flag_share(
        rows_between(rows, summer_start, summer_end)
            .filter(|row| row.timestamp.is_some_and(|ts| ts.hour() == 8)),
        Flag::WorkingHours,
    );
}

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("invalid sample instant")
        .and_utc()
}

// --
// -- Display
// --

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_share = |share: Option<f64>| match share {
            Some(share) => format!("{share:.1}%"),
            None => "n/a".to_string(),
        };

        writeln!(f, "=== TIMESTAMP DIMENSION TABLE VERIFICATION ===")?;
        writeln!(f)?;

        writeln!(f, "1. BASIC STATISTICS:")?;
        writeln!(f, "   Total rows: {}", self.rows)?;
        writeln!(f, "   Expected rows: {}", self.expected_rows)?;

        if let Some(size) = self.file_size {
            writeln!(f, "   File size: {:.1} MB", size as f64 / 1024.0 / 1024.0)?;
        }

        if let (Some(first), Some(last)) = (self.first_timestamp, self.last_timestamp) {
            writeln!(
                f,
                "   Date range: {} to {}",
                first.format(TIMESTAMP_FORMAT),
                last.format(TIMESTAMP_FORMAT),
            )?;
        }

        let countries: Vec<_> = self.countries.keys().map(String::as_str).collect();
        writeln!(f, "   Countries: {}", countries.join(", "))?;
        writeln!(f)?;

        writeln!(f, "2. DATA COMPLETENESS:")?;
        writeln!(f, "   Missing values: {} total", self.missing.values().sum::<usize>())?;

        for (col, count) in self.missing.iter().filter(|(_, count)| **count > 0) {
            writeln!(f, "     - {col}: {count}")?;
        }

        writeln!(f, "   Unique timestamps per country:")?;

        for (country, summary) in &self.countries {
            writeln!(f, "     - {country}: {}", summary.unique_timestamps)?;
        }

        writeln!(f)?;

        writeln!(f, "3. COLUMN DISTRIBUTIONS:")?;

        for (flag, summary) in &self.flags {
            writeln!(
                f,
                "   {flag}: {} records ({:.1}%)",
                summary.set,
                percent(summary.set, self.rows),
            )?;
        }

        writeln!(f)?;

        writeln!(f, "4. SAMPLE VALIDATIONS:")?;

        for check in &self.spot_checks {
            let status = match check.outcome {
                Outcome::Passed => "PASS",
                Outcome::Failed => "FAIL",
                Outcome::Skipped => "SKIP",
            };

            writeln!(f, "   [{status}] {}: {}", check.label, check.observed)?;
        }

        writeln!(f)?;

        writeln!(f, "5. TIMEZONE VERIFICATION:")?;
        writeln!(f, "   Summer 2023 daylight savings: {}", fmt_share(self.summer_dst_share))?;

        writeln!(
            f,
            "   8 AM UTC in summer working hours: {}",
            fmt_share(self.summer_8am_working_share)
        )?;

        writeln!(
            f,
            "   Midnight UTC working hours: {}",
            fmt_share(self.midnight_working_share)
        )?;

        writeln!(f)?;

        writeln!(f, "6. DATA QUALITY CHECKS:")?;
        writeln!(f, "   Duplicate timestamp-country combinations: {}", self.duplicates)?;
        writeln!(f, "   Timestamps not aligned on an hour: {}", self.misaligned)?;
        writeln!(f, "   Rows out of order: {}", self.unsorted)?;

        for (flag, summary) in &self.flags {
            let values: Vec<_> = summary.values.iter().map(String::as_str).collect();
            writeln!(f, "   {flag} unique values: [{}]", values.join(", "))?;
        }

        writeln!(f, "   Timezones by country:")?;

        for (country, summary) in &self.countries {
            let timezones: Vec<_> = summary.timezones.iter().map(String::as_str).collect();
            writeln!(f, "     - {country}: {}", timezones.join(", "))?;
        }

        writeln!(f)?;
        writeln!(f, "=== VERIFICATION COMPLETE ===")?;

        if self.issues.is_empty() {
            writeln!(f, "All checks passed!")?;
        } else {
            writeln!(f, "ISSUES FOUND:")?;

            for issue in &self.issues {
                writeln!(f, "   - {issue}")?;
            }
        }

        Ok(())
    }
}
