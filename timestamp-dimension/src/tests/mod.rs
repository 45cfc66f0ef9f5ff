mod flags;
mod timestamps;

use crate::{Config, DateRange};

/// Default countries over a short range, which keeps generated tables small.
fn config(start: &str, end: &str) -> Config {
    let range = DateRange::parse(start, end).expect("invalid test range");
    Config::default().with_range(range).with_progress_every(0)
}

#[macro_export]
macro_rules! date {
    ( $date: expr ) => {{
        use chrono::NaiveDate;
        NaiveDate::parse_from_str($date, "%Y-%m-%d").expect("invalid date literal")
    }};
}

#[macro_export]
macro_rules! utc {
    ( $datetime: expr ) => {{
        use chrono::NaiveDateTime;

        NaiveDateTime::parse_from_str($datetime, "%Y-%m-%d %H:%M")
            .expect("invalid datetime literal")
            .and_utc()
    }};
}
