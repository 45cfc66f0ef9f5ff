use chrono::{DateTime, Duration, Utc};
use chrono_tz::{OffsetComponents, Tz};

/// Convert an instant to the civil time of a timezone.
///
/// Converting from UTC is never ambiguous: when clocks are set back, the repeated local hour is
/// reached by two distinct instants, each carrying its own offset, and a local hour skipped when
/// clocks are set forward is simply never produced.
///
/// ```
/// use chrono::{Timelike, TimeZone, Utc};
/// use timestamp_dimension::localize::localize;
///
/// let instant = Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap();
/// let local = localize(instant, chrono_tz::Europe::Paris);
/// assert_eq!(local.hour(), 12);
/// ```
pub fn localize(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Daylight saving adjustment applied to the civil time of a timezone at a given instant.
pub fn dst_offset(instant: DateTime<Utc>, tz: Tz) -> Duration {
    localize(instant, tz).offset().dst_offset()
}
