//! Wall-clock helpers.
//!
//! The engine works with [`NaiveDateTime`] samples taken once per loop
//! iteration. Naive timestamps are interpreted as UTC whenever an epoch
//! conversion is needed, so round-trips are deterministic regardless of the
//! host timezone.

use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::error::TerraError;

/// Minutes since midnight (0..=1439) of the given instant.
#[must_use]
pub fn minute_of_day(t: NaiveDateTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Epoch seconds of the given instant.
#[must_use]
pub fn epoch_seconds(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp()
}

/// The instant corresponding to the given epoch seconds, if representable.
#[must_use]
pub fn from_epoch_seconds(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|d| d.naive_utc())
}

/// Render epoch seconds as a `HH:MM:SS` clock string.
#[must_use]
pub fn clock_label(secs: i64) -> String {
    from_epoch_seconds(secs).map_or_else(String::new, |t| t.format("%H:%M:%S").to_string())
}

/// Parse a `HH:MM` string into minutes since midnight.
///
/// # Errors
///
/// Returns [`TerraError::InvalidTimeOfDay`] when the string is not a valid
/// 24-hour `HH:MM` time.
pub fn parse_hhmm(s: &str) -> Result<u32, TerraError> {
    let invalid = || TerraError::InvalidTimeOfDay(s.to_string());
    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    let h: u32 = h.parse().map_err(|_| invalid())?;
    let m: u32 = m.parse().map_err(|_| invalid())?;
    if h > 23 || m > 59 {
        return Err(invalid());
    }
    Ok(h * 60 + m)
}
