//! # terra-adapter-virtual
//!
//! Virtual hardware adapter for running the controller without a terrarium
//! attached. Provides a simulated relay board and a simulated sensor board.
//!
//! ## Provided hardware
//!
//! | Board | Port | Behaviour |
//! |-------|------|-----------|
//! | [`VirtualRelayBoard`] | `ActuatorDriver` | Remembers pin levels, logs every switch |
//! | [`VirtualSensorBoard`] | `SensorReader` | Returns fixed, configurable readings |
//!
//! ## Dependency rule
//!
//! Depends on `terra-app` (port traits) only.

use std::collections::HashMap;

use terra_app::ports::{ActuatorDriver, SensorReader, SensorSample};

/// A simulated relay board.
///
/// Keeps the last level written to each named pin so a demo run can be
/// inspected, and logs every switch at the `INFO` level.
#[derive(Debug, Default)]
pub struct VirtualRelayBoard {
    pins: HashMap<String, bool>,
}

impl VirtualRelayBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last level written to a pin, `false` if it was never driven.
    #[must_use]
    pub fn is_high(&self, device: &str) -> bool {
        self.pins.get(device).copied().unwrap_or(false)
    }
}

impl ActuatorDriver for VirtualRelayBoard {
    fn switch_on(&mut self, device: &str) {
        tracing::info!(device, "relay on");
        self.pins.insert(device.to_owned(), true);
    }

    fn switch_off(&mut self, device: &str) {
        tracing::info!(device, "relay off");
        self.pins.insert(device.to_owned(), false);
    }
}

/// A simulated sensor board with fixed readings.
///
/// Defaults to a 20 °C room at 55% humidity and a 25 °C terrarium.
#[derive(Debug, Clone, Copy)]
pub struct VirtualSensorBoard {
    room_temperature: i32,
    room_humidity: i32,
    terrarium_temperature: i32,
}

impl Default for VirtualSensorBoard {
    fn default() -> Self {
        Self {
            room_temperature: 20,
            room_humidity: 55,
            terrarium_temperature: 25,
        }
    }
}

impl VirtualSensorBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the simulated temperatures, for demo scripts that want to drive
    /// the rules.
    pub fn set_temperatures(&mut self, room: i32, terrarium: i32) {
        self.room_temperature = room;
        self.terrarium_temperature = terrarium;
    }
}

impl SensorReader for VirtualSensorBoard {
    fn sample(&mut self) -> SensorSample {
        SensorSample {
            room_temperature: self.room_temperature,
            room_humidity: self.room_humidity,
            terrarium_temperature: self.terrarium_temperature,
        }
    }
}
