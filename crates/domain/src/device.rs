//! Device — a named actuator and the registry that indexes the catalog.
//!
//! The catalog is fixed at startup. All runtime state lives in per-device
//! slots indexed through the registry, so device lookup happens in one place
//! instead of being scattered as repeated name searches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TerraError;

/// A configured actuator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique name, e.g. `uvlight` or `fan_in`.
    pub name: String,
    /// Whether the device participates in lifetime tracking.
    pub lifetime_tracked: bool,
}

impl Device {
    #[must_use]
    pub fn new(name: impl Into<String>, lifetime_tracked: bool) -> Self {
        Self {
            name: name.into(),
            lifetime_tracked,
        }
    }
}

/// Immutable catalog of devices with case-insensitive name lookup.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    index: HashMap<String, usize>,
}

impl DeviceRegistry {
    /// Build a registry from the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Settings`] when two devices share a name; the
    /// indices derived from the catalog would be ambiguous.
    pub fn new(devices: Vec<Device>) -> Result<Self, TerraError> {
        let mut index = HashMap::with_capacity(devices.len());
        for (i, device) in devices.iter().enumerate() {
            if index.insert(device.name.to_ascii_lowercase(), i).is_some() {
                return Err(TerraError::Settings(format!(
                    "duplicate device name: {}",
                    device.name
                )));
            }
        }
        Ok(Self { devices, index })
    }

    /// Number of configured devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Index of the named device.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] when the name is not in the
    /// catalog; callers must surface this instead of silently skipping.
    pub fn index_of(&self, name: &str) -> Result<usize, TerraError> {
        self.index
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| TerraError::UnknownDevice(name.to_string()))
    }

    /// The device at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> &Device {
        &self.devices[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Device names in catalog order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.name.clone()).collect()
    }
}
