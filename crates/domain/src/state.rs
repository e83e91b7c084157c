//! Runtime actuation state of a device.
//!
//! The original firmware encoded all of this in one signed integer
//! (0 / -1 / -2 / epoch end time). The tagged [`OnPeriod`] keeps the wire
//! encoding available through [`OnPeriod::as_raw`] but removes the
//! magic-number ambiguity from the state machine itself.

use serde::{Deserialize, Serialize};

use crate::time;

/// Raw sentinel for "on indefinitely".
pub const RAW_INDEFINITE: i64 = -1;
/// Raw sentinel for "on until the ideal temperature is reached".
pub const RAW_UNTIL_IDEAL: i64 = -2;

/// Encoded actuation state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnPeriod {
    /// Device is off.
    #[default]
    Off,
    /// On with no end time (switched by a timer window or manually).
    Indefinite,
    /// On until the ideal temperature is reached (switched by a rule).
    UntilIdeal,
    /// On until the given epoch second.
    Until(i64),
}

impl OnPeriod {
    /// Whether the device is actuated at all.
    #[must_use]
    pub fn is_on(self) -> bool {
        self != Self::Off
    }

    /// Decode the legacy integer encoding (`0` / `-1` / `-2` / end time).
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::Off,
            RAW_INDEFINITE => Self::Indefinite,
            RAW_UNTIL_IDEAL => Self::UntilIdeal,
            end => Self::Until(end),
        }
    }

    /// Encode back into the legacy integer form.
    #[must_use]
    pub fn as_raw(self) -> i64 {
        match self {
            Self::Off => 0,
            Self::Indefinite => RAW_INDEFINITE,
            Self::UntilIdeal => RAW_UNTIL_IDEAL,
            Self::Until(end) => end,
        }
    }

    /// Human-readable end-time label used in the state snapshot.
    #[must_use]
    pub fn end_time_label(self) -> Option<String> {
        match self {
            Self::Off => None,
            Self::Indefinite => Some("no endtime".to_string()),
            Self::UntilIdeal => Some("until ideal temperature is reached".to_string()),
            Self::Until(end) => Some(time::clock_label(end)),
        }
    }
}

/// Whether the rule engine may currently actuate a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleActivation {
    /// No ruleset or sprayer rule ever names this device.
    NotApplicable,
    /// A timer currently owns the device; the rule engine must not touch it.
    Suspended,
    /// The rule engine may act on the device.
    Active,
}

/// Mutable runtime state of one device.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceState {
    /// Current actuation.
    pub on: OnPeriod,
    /// Remaining operating hours; only meaningful for lifetime-tracked devices.
    pub lifetime_hours: i32,
    /// A human override is in force. Informational only.
    pub manual: bool,
}
