//! Controller settings and their persistence.
//!
//! `settings.json` holds the device catalog, all timers, both rulesets and
//! the sprayer rule. The external key names (`deviceList`, `timersPerDevice`,
//! `sprayerRule`) are part of the wire format and must not change.
//!
//! A missing file yields the default settings, persisted immediately. A file
//! that exists but cannot be parsed is a fatal error: the device count and
//! every index in the engine are derived from it.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use terra_domain::device::{Device, DeviceRegistry};
use terra_domain::error::TerraError;
use terra_domain::rule::Ruleset;
use terra_domain::sprayer::SprayerRule;
use terra_domain::timer::Timer;

/// Default catalog: device name and its number of timer slots.
pub const DEFAULT_CATALOG: [(&str, u8); 11] = [
    ("light1", 1),
    ("light2", 1),
    ("light3", 1),
    ("light4", 1),
    ("uvlight", 1),
    ("light6", 1),
    ("pump", 3),
    ("sprayer", 5),
    ("mist", 3),
    ("fan_in", 3),
    ("fan_out", 3),
];

/// The only device whose operating hours are counted.
pub const LIFETIME_TRACKED_DEVICE: &str = "uvlight";

pub const RULESET_COUNT: usize = 2;
pub const RULES_PER_RULESET: usize = 2;
pub const ACTIONS_PER_RULE: usize = 2;
pub const ACTIONS_PER_SPRAYER_RULE: usize = 4;

/// Persisted controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "deviceList")]
    pub device_list: Vec<String>,
    #[serde(rename = "timersPerDevice")]
    pub timers_per_device: Vec<u8>,
    pub timers: Vec<Timer>,
    pub rulesets: Vec<Ruleset>,
    #[serde(rename = "sprayerRule")]
    pub sprayer_rule: SprayerRule,
}

impl Default for Settings {
    fn default() -> Self {
        let device_list: Vec<String> = DEFAULT_CATALOG
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect();
        let timers_per_device: Vec<u8> = DEFAULT_CATALOG.iter().map(|(_, n)| *n).collect();
        let timers = DEFAULT_CATALOG
            .iter()
            .flat_map(|(name, n)| (1..=*n).map(|ix| Timer::zeroed(*name, ix)))
            .collect();
        let rulesets = (1..=RULESET_COUNT)
            .map(|_| Ruleset::disabled(1, RULES_PER_RULESET, ACTIONS_PER_RULE))
            .collect();
        Self {
            device_list,
            timers_per_device,
            timers,
            rulesets,
            sprayer_rule: SprayerRule::disabled(ACTIONS_PER_SPRAYER_RULE),
        }
    }
}

impl Settings {
    /// Structural checks on a loaded settings file.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Settings`] when the catalog is empty or the
    /// timer-slot table does not match it.
    pub fn validate(&self) -> Result<(), TerraError> {
        if self.device_list.is_empty() {
            return Err(TerraError::Settings("empty device list".to_string()));
        }
        if self.device_list.len() != self.timers_per_device.len() {
            return Err(TerraError::Settings(format!(
                "timersPerDevice has {} entries for {} devices",
                self.timers_per_device.len(),
                self.device_list.len()
            )));
        }
        Ok(())
    }

    /// Build the device registry from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Settings`] on duplicate device names.
    pub fn registry(&self) -> Result<DeviceRegistry, TerraError> {
        DeviceRegistry::new(
            self.device_list
                .iter()
                .map(|name| {
                    Device::new(
                        name.clone(),
                        name.eq_ignore_ascii_case(LIFETIME_TRACKED_DEVICE),
                    )
                })
                .collect(),
        )
    }

    /// Number of timer slots configured for the device at `index`.
    #[must_use]
    pub fn timer_slots(&self, index: usize) -> u8 {
        self.timers_per_device.get(index).copied().unwrap_or(0)
    }
}

/// Load the settings file, writing defaults when it does not exist.
///
/// # Errors
///
/// Returns [`TerraError::Settings`] when the file exists but cannot be
/// parsed or fails validation, [`TerraError::Storage`] on IO failure.
pub fn load_or_init(path: &Path) -> Result<Settings, TerraError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            let settings: Settings = serde_json::from_str(&raw)
                .map_err(|err| TerraError::Settings(err.to_string()))?;
            settings.validate()?;
            Ok(settings)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            let settings = Settings::default();
            save(path, &settings)?;
            tracing::info!(path = %path.display(), "no settings file, wrote defaults");
            Ok(settings)
        }
        Err(err) => Err(err.into()),
    }
}

/// Rewrite the settings file in full.
///
/// # Errors
///
/// Returns [`TerraError::Storage`] on IO failure.
pub fn save(path: &Path, settings: &Settings) -> Result<(), TerraError> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|err| TerraError::Settings(err.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}
