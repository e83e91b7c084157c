//! Temperature-threshold rules.
//!
//! A [`Ruleset`] is active inside a time-of-day window and drives its
//! [`Rule`]s against the enclosure temperature. Negative thresholds mean
//! "too cold" (trigger below `-value`), positive mean "too hot" (trigger
//! above `value`); in both cases the ruleset's ideal temperature is the
//! hysteresis release point.

use serde::{Deserialize, Serialize};

use crate::time;

/// Sentinel device name for an unused action slot.
pub const NO_DEVICE: &str = "no device";

/// One actuation performed when a rule fires.
///
/// A positive `on_period` is a duration in seconds, converted to an absolute
/// end time when the action executes; `0`/`-1`/`-2` carry the same meaning as
/// in the device state encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub device: String,
    pub on_period: i64,
}

impl Action {
    #[must_use]
    pub fn new(device: impl Into<String>, on_period: i64) -> Self {
        Self {
            device: device.into(),
            on_period,
        }
    }

    /// An unused slot (`"no device"`).
    #[must_use]
    pub fn none() -> Self {
        Self::new(NO_DEVICE, 0)
    }

    /// Whether this slot names a real device.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.device.eq_ignore_ascii_case(NO_DEVICE)
    }
}

/// A signed temperature threshold with its actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Negative: trigger when temperature < `-value`; positive: trigger when
    /// temperature > `value`; `0` disables the rule.
    pub value: i32,
    pub actions: Vec<Action>,
}

impl Rule {
    /// Whether the current temperature trips this rule.
    #[must_use]
    pub fn triggers(&self, temperature: i32) -> bool {
        (self.value < 0 && temperature < -self.value)
            || (self.value > 0 && temperature > self.value)
    }

    /// Whether the temperature has crossed back past the ideal point and the
    /// rule's actions should be reversed.
    #[must_use]
    pub fn releases(&self, temperature: i32, ideal: i32) -> bool {
        (self.value < 0 && temperature >= ideal) || (self.value > 0 && temperature <= ideal)
    }
}

/// An ordered list of rules with an activation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// 1-based terrarium number, kept for wire compatibility.
    pub terrarium: u8,
    #[serde(with = "yes_no")]
    pub active: bool,
    /// Window start, `HH:MM`.
    pub from: String,
    /// Window end, `HH:MM`.
    pub to: String,
    /// Hysteresis release temperature.
    #[serde(rename = "temp_ideal")]
    pub ideal_temp: i32,
    pub rules: Vec<Rule>,
}

impl Ruleset {
    /// An inactive placeholder ruleset with `rules` × `actions` empty slots.
    #[must_use]
    pub fn disabled(terrarium: u8, rules: usize, actions_per_rule: usize) -> Self {
        Self {
            terrarium,
            active: false,
            from: String::new(),
            to: String::new(),
            ideal_temp: 0,
            rules: (0..rules)
                .map(|_| Rule {
                    value: 0,
                    actions: (0..actions_per_rule).map(|_| Action::none()).collect(),
                })
                .collect(),
        }
    }

    /// Whether the ruleset is active and the given minute-of-day falls inside
    /// its `[from, to]` window. Unparsable window bounds never match.
    #[must_use]
    pub fn in_window(&self, minute_of_day: u32) -> bool {
        if !self.active {
            return false;
        }
        match (time::parse_hhmm(&self.from), time::parse_hhmm(&self.to)) {
            (Ok(from), Ok(to)) => minute_of_day >= from && minute_of_day <= to,
            _ => false,
        }
    }
}

/// Serialize a bool as the legacy `"yes"` / `"no"` strings.
pub mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Never fails.
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "yes" } else { "no" })
    }

    /// # Errors
    ///
    /// Fails when the value is neither `"yes"` nor `"no"` (case-insensitive).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(true),
            "no" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"yes\" or \"no\", got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_trigger_too_cold_rule_below_threshold() {
        let rule = Rule {
            value: -23,
            actions: vec![],
        };
        assert!(rule.triggers(21));
        assert!(!rule.triggers(23));
        assert!(!rule.triggers(26));
    }

    #[test]
    fn should_trigger_too_hot_rule_above_threshold() {
        let rule = Rule {
            value: 28,
            actions: vec![],
        };
        assert!(rule.triggers(30));
        assert!(!rule.triggers(28));
        assert!(!rule.triggers(26));
    }

    #[test]
    fn should_release_at_ideal_temperature() {
        let cold = Rule {
            value: -23,
            actions: vec![],
        };
        assert!(cold.releases(26, 26));
        assert!(!cold.releases(25, 26));

        let hot = Rule {
            value: 28,
            actions: vec![],
        };
        assert!(hot.releases(26, 26));
        assert!(!hot.releases(27, 26));
    }

    #[test]
    fn should_never_trigger_disabled_rule() {
        let rule = Rule {
            value: 0,
            actions: vec![],
        };
        assert!(!rule.triggers(-40));
        assert!(!rule.triggers(40));
    }

    #[test]
    fn should_detect_noop_actions() {
        assert!(Action::none().is_noop());
        assert!(Action::new("No Device", 0).is_noop());
        assert!(!Action::new("fan_in", -2).is_noop());
    }

    #[test]
    fn should_match_window_only_when_active() {
        let mut rs = Ruleset::disabled(1, 2, 2);
        rs.from = "10:00".to_string();
        rs.to = "20:00".to_string();
        assert!(!rs.in_window(630));
        rs.active = true;
        assert!(rs.in_window(600));
        assert!(rs.in_window(1200));
        assert!(!rs.in_window(599));
        assert!(!rs.in_window(1201));
    }

    #[test]
    fn should_not_match_window_with_empty_bounds() {
        let mut rs = Ruleset::disabled(1, 2, 2);
        rs.active = true;
        assert!(!rs.in_window(0));
    }

    #[test]
    fn should_serialize_active_flag_as_yes_no() {
        let mut rs = Ruleset::disabled(1, 1, 1);
        rs.active = true;
        let json = serde_json::to_value(&rs).unwrap();
        assert_eq!(json["active"], "yes");
        assert_eq!(json["temp_ideal"], 0);

        let parsed: Ruleset = serde_json::from_value(json).unwrap();
        assert!(parsed.active);
    }

    #[test]
    fn should_reject_unknown_active_flag() {
        let result: Result<Ruleset, _> = serde_json::from_str(
            r#"{"terrarium":1,"active":"maybe","from":"","to":"","temp_ideal":0,"rules":[]}"#,
        );
        assert!(result.is_err());
    }
}
