//! Timer — clock-driven switching of one device.
//!
//! Wire format (one entry of the `timers` array in the settings file):
//! `{"device":"light1","index":1,"hour_on":9,"minute_on":0,"hour_off":21,"minute_off":0,"repeat":1,"period":0}`

use serde::{Deserialize, Serialize};

/// A scheduled switch for one device.
///
/// With `period == 0` this is an on/off-window timer; with `period > 0` the
/// device switches on at the start time and off `period` seconds later via
/// the normal expiry check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub device: String,
    /// 1-based position among the timers of the same device.
    pub index: u8,
    pub hour_on: u8,
    pub minute_on: u8,
    pub hour_off: u8,
    pub minute_off: u8,
    /// Non-zero when the timer is armed.
    pub repeat: u8,
    /// On-duration in seconds; `0` marks a window timer.
    pub period: u32,
}

impl Timer {
    /// A disarmed all-zero timer, the initial value for a fresh settings file.
    #[must_use]
    pub fn zeroed(device: impl Into<String>, index: u8) -> Self {
        Self {
            device: device.into(),
            index,
            hour_on: 0,
            minute_on: 0,
            hour_off: 0,
            minute_off: 0,
            repeat: 0,
            period: 0,
        }
    }

    /// Switch-on time as minutes since midnight.
    #[must_use]
    pub fn on_minutes(&self) -> u32 {
        u32::from(self.hour_on) * 60 + u32::from(self.minute_on)
    }

    /// Switch-off time as minutes since midnight. `0` (midnight) doubles as
    /// the "no off time" sentinel for window timers.
    #[must_use]
    pub fn off_minutes(&self) -> u32 {
        u32::from(self.hour_off) * 60 + u32::from(self.minute_off)
    }

    /// Whether the timer is armed at all.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.repeat != 0
    }

    /// Whether this is an on/off-window timer (as opposed to on/duration).
    #[must_use]
    pub fn is_window(&self) -> bool {
        self.period == 0
    }
}
