#![forbid(unsafe_code)]

//! Day arithmetic: calendar dates to epoch-millisecond day starts.
//!
//! The timeline shows one calendar day. Periods store absolute timestamps,
//! while the drag engine works in milliseconds since the start of the shown
//! day; [`DayWindow`] converts between the two.

use chrono::{Local, NaiveDate, TimeZone, Utc};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;
/// Default rounding granularity: 15 minutes.
pub const QUARTER_HOUR_MS: i64 = 15 * MINUTE_MS;

/// Epoch milliseconds of local midnight on `date`.
///
/// Returns `None` when midnight does not exist in the local zone (a DST gap
/// at midnight); callers fall back to [`utc_day_start`].
#[must_use]
pub fn local_day_start(date: NaiveDate) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Epoch milliseconds of UTC midnight on `date`.
#[must_use]
pub fn utc_day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight).timestamp_millis())
        .unwrap_or_default()
}

/// Local day start, falling back to UTC.
#[must_use]
pub fn day_start(date: NaiveDate) -> i64 {
    local_day_start(date).unwrap_or_else(|| utc_day_start(date))
}

/// Today's local date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a millisecond-of-day offset as `H:MM` (hours not padded).
#[must_use]
pub fn format_clock(offset_ms: f64) -> String {
    let offset = if offset_ms.is_finite() {
        offset_ms.max(0.0) as i64
    } else {
        0
    };
    let hours = offset / HOUR_MS;
    let minutes = (offset - hours * HOUR_MS) / MINUTE_MS;
    format!("{hours}:{minutes:02}")
}

/// One displayed day: start timestamp and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: i64,
    length: i64,
}

impl DayWindow {
    /// Window starting at `start` (epoch ms) lasting `length` ms.
    #[must_use]
    pub const fn new(start: i64, length: i64) -> Self {
        Self { start, length }
    }

    /// Standard 24h window for `date`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(day_start(date), DAY_MS)
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn length(&self) -> i64 {
        self.length
    }

    /// Absolute timestamp to offset within the day.
    #[inline]
    #[must_use]
    pub fn to_offset(&self, timestamp: i64) -> f64 {
        (timestamp - self.start) as f64
    }

    /// Offset within the day to absolute timestamp (rounded to whole ms).
    #[inline]
    #[must_use]
    pub fn to_timestamp(&self, offset: f64) -> i64 {
        self.start + offset.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock((10 * HOUR_MS + 5 * MINUTE_MS) as f64), "10:05");
        assert_eq!(format_clock(DAY_MS as f64), "24:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(-5.0), "0:00");
    }

    #[test]
    fn utc_start_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(utc_day_start(date), 1_709_251_200_000);
    }

    #[test]
    fn window_round_trip() {
        let window = DayWindow::new(1_000_000, DAY_MS);
        assert_eq!(window.to_offset(1_000_000 + HOUR_MS), HOUR_MS as f64);
        assert_eq!(window.to_timestamp(HOUR_MS as f64), 1_000_000 + HOUR_MS);
    }
}
