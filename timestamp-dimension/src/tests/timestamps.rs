use chrono::Duration;

use crate::error::Error;
use crate::timestamps::DateRange;
use crate::{date, utc, Config};

#[test]
fn default_range_hour_count() {
    let range = Config::default().range();
    assert_eq!(range.hour_count(), 43_801);
    assert_eq!(range.hours().len(), 43_801);
    assert_eq!(range.hours().count(), 43_801);
}

#[test]
fn bounds() -> Result<(), Error> {
    let range = DateRange::parse("2022-01-01", "2026-12-31")?;
    assert_eq!(range.first_instant(), utc!("2022-01-01 00:00"));
    assert_eq!(range.last_instant(), utc!("2026-12-31 00:00"));
    assert_eq!(range.hours().next(), Some(utc!("2022-01-01 00:00")));
    assert_eq!(range.hours().last(), Some(utc!("2026-12-31 00:00")));
    assert!(range.contains(utc!("2026-12-31 00:00")));
    assert!(!range.contains(utc!("2026-12-31 01:00")));
    assert!(!range.contains(utc!("2021-12-31 23:00")));
    Ok(())
}

#[test]
fn single_day() -> Result<(), Error> {
    let range = DateRange::parse("2023-05-05", "2023-05-05")?;
    let hours: Vec<_> = range.hours().collect();
    assert_eq!(hours, [utc!("2023-05-05 00:00")]);
    assert_eq!(range.hour_count(), 1);
    Ok(())
}

#[test]
fn hourly_steps() -> Result<(), Error> {
    let range = DateRange::parse("2024-02-28", "2024-03-01")?;
    let hours: Vec<_> = range.into_iter().collect();

    assert_eq!(hours.len(), 49);
    assert!(hours.contains(&utc!("2024-02-29 12:00")));

    for pair in hours.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::hours(1));
    }

    Ok(())
}

#[test]
fn restartable() -> Result<(), Error> {
    let mut hours = DateRange::parse("2023-01-01", "2023-01-02")?.hours();
    hours.next();
    let restarted = hours.clone();

    assert_eq!(hours.len(), 24);
    assert_eq!(hours.collect::<Vec<_>>(), restarted.collect::<Vec<_>>());
    Ok(())
}

#[test]
fn fused() -> Result<(), Error> {
    let mut hours = DateRange::parse("2023-01-01", "2023-01-01")?.hours();
    assert!(hours.next().is_some());
    assert_eq!(hours.next(), None);
    assert_eq!(hours.next(), None);
    assert_eq!(hours.size_hint(), (0, Some(0)));
    Ok(())
}

#[test]
fn invalid_ranges() {
    assert!(matches!(
        DateRange::parse("2023-01-02", "2023-01-01"),
        Err(Error::InvertedRange { .. })
    ));

    assert!(matches!(
        DateRange::parse("2023-02-30", "2023-03-01"),
        Err(Error::InvalidDate { .. })
    ));

    assert!(matches!(
        DateRange::parse("2023-01-01", "01/03/2023"),
        Err(Error::InvalidDate { .. })
    ));

    assert_eq!(
        DateRange::new(date!("2023-01-02"), date!("2023-01-01"))
            .unwrap_err()
            .to_string(),
        "end date 2023-01-01 is before start date 2023-01-02",
    );
}

#[test]
fn display() -> Result<(), Error> {
    let range = DateRange::parse(" 2022-01-01", "2026-12-31 ")?;
    assert_eq!(range.to_string(), "2022-01-01 to 2026-12-31");
    assert_eq!(range.start(), date!("2022-01-01"));
    assert_eq!(range.end(), date!("2026-12-31"));
    Ok(())
}
