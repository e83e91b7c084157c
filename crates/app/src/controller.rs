//! The terrarium orchestrator.
//!
//! One owned aggregate holds the device registry, per-device runtime state,
//! the rule-activation gates, the loaded settings, the sensor cache and the
//! trace recorder, and drives the actuator/sensor ports. The daemon wraps it
//! in `Arc<tokio::sync::Mutex<_>>`; the tick loop and the HTTP handlers are
//! the only callers and always take the lock first.
//!
//! The evaluation cadence lives in [`crate::tick`]; the per-cadence checks
//! (`check_devices`, `check_timers`, `check_sprayer_rule`, `check_rules`)
//! are defined here and in the submodules.

mod rules;
mod sprayer;
mod timers;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde_json::json;

use terra_domain::device::DeviceRegistry;
use terra_domain::error::TerraError;
use terra_domain::rule::Ruleset;
use terra_domain::sprayer::SprayerRule;
use terra_domain::state::{DeviceState, OnPeriod, RuleActivation};
use terra_domain::time;
use terra_domain::timer::Timer;

use crate::ports::{ActuatorDriver, SensorReader};
use crate::sensors::{SensorBoard, SensorSnapshot};
use crate::settings::{self, Settings};
use crate::trace::{TraceKind, TraceRecorder};

/// Name reported in the properties document.
pub const TCU_NAME: &str = "TERRARIUM";

const SPRAYER: &str = "sprayer";
const MIST: &str = "mist";
const FAN_IN: &str = "fan_in";
const FAN_OUT: &str = "fan_out";

const MINUTES_PER_DAY: u32 = 1440;

/// Locations of the persisted controller state.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub settings: PathBuf,
    pub lifecycle: PathBuf,
    pub trace_dir: PathBuf,
}

impl StoragePaths {
    /// The conventional file names under one data directory, with trace
    /// files in a `tracefiles` subfolder.
    #[must_use]
    pub fn under(data_dir: &std::path::Path) -> Self {
        Self {
            settings: data_dir.join("settings.json"),
            lifecycle: data_dir.join("lifecycle.txt"),
            trace_dir: data_dir.join("tracefiles"),
        }
    }
}

/// The controller aggregate.
pub struct Terrarium<A, S> {
    registry: DeviceRegistry,
    states: Vec<DeviceState>,
    gates: Vec<RuleActivation>,
    settings: Settings,
    settings_path: PathBuf,
    lifecycle_path: PathBuf,
    sensors: SensorBoard,
    trace: TraceRecorder,
    actuators: A,
    reader: S,
    sprayer_pending: bool,
    sprayer_fire_minute: u32,
    fan_in_was_on: bool,
    fan_out_was_on: bool,
    now: NaiveDateTime,
}

impl<A: ActuatorDriver, S: SensorReader> Terrarium<A, S> {
    /// Build the aggregate from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Settings`] when the settings fail validation.
    pub fn new(
        settings: Settings,
        paths: StoragePaths,
        max_trace_days: usize,
        actuators: A,
        reader: S,
        now: NaiveDateTime,
    ) -> Result<Self, TerraError> {
        settings.validate()?;
        let registry = settings.registry()?;
        let count = registry.len();
        Ok(Self {
            registry,
            states: vec![DeviceState::default(); count],
            gates: vec![RuleActivation::NotApplicable; count],
            settings,
            settings_path: paths.settings,
            lifecycle_path: paths.lifecycle,
            sensors: SensorBoard::new(now),
            trace: TraceRecorder::new(paths.trace_dir, max_trace_days),
            actuators,
            reader,
            sprayer_pending: false,
            sprayer_fire_minute: 0,
            fan_in_was_on: false,
            fan_out_was_on: false,
            now,
        })
    }

    /// Startup sequence: restore counters, take a first sensor reading,
    /// pre-activate window timers and register rule-controlled devices.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] when the lifecycle file is unreadable.
    pub fn bootstrap(&mut self) -> Result<(), TerraError> {
        self.restore_lifecycle()?;
        self.refresh_sensors();
        self.init_timers();
        self.init_rules();
        Ok(())
    }

    /// Advance the engine clock. Every check evaluates against this instant.
    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn epoch_now(&self) -> i64 {
        time::epoch_seconds(self.now)
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Index lookup that logs and skips unknown names.
    ///
    /// Stored settings may name devices that are no longer in the catalog;
    /// the engine must keep running past them.
    fn try_index(&self, device: &str) -> Option<usize> {
        match self.registry.index_of(device) {
            Ok(index) => Some(index),
            Err(err) => {
                tracing::warn!(%err, "skipping unknown device in stored settings");
                None
            }
        }
    }

    /***** Devices *****/

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn is_device_on(&self, device: &str) -> Result<bool, TerraError> {
        Ok(self.states[self.registry.index_of(device)?].on.is_on())
    }

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn device_state(&self, device: &str) -> Result<DeviceState, TerraError> {
        Ok(self.states[self.registry.index_of(device)?])
    }

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn gate_for(&self, device: &str) -> Result<RuleActivation, TerraError> {
        Ok(self.gates[self.registry.index_of(device)?])
    }

    /// Switch a device on with the given period.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn set_device_on(&mut self, device: &str, period: OnPeriod) -> Result<(), TerraError> {
        let index = self.registry.index_of(device)?;
        self.switch_on_index(index, period);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn set_device_off(&mut self, device: &str) -> Result<(), TerraError> {
        let index = self.registry.index_of(device)?;
        self.switch_off_index(index);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn set_device_manual(&mut self, device: &str, manual: bool) -> Result<(), TerraError> {
        let index = self.registry.index_of(device)?;
        self.states[index].manual = manual;
        Ok(())
    }

    fn switch_on_index(&mut self, index: usize, period: OnPeriod) {
        let device = self.registry.get(index).name.clone();
        self.actuators.switch_on(&device);
        self.states[index].on = period;
        let payload = match period {
            OnPeriod::Until(end) => format!("{device} 1 {}", time::clock_label(end)),
            other => format!("{device} 1 {}", other.as_raw()),
        };
        self.trace.state(self.now, &payload);
    }

    fn switch_off_index(&mut self, index: usize) {
        let device = self.registry.get(index).name.clone();
        self.actuators.switch_off(&device);
        self.states[index].on = OnPeriod::Off;
        self.trace.state(self.now, &format!("{device} 0"));
    }

    /// Switch off every device whose end time has passed.
    ///
    /// Runs every second; end times are epoch seconds. When an expiry is not
    /// part of a sprayer sequence, every gate a timer suspended is released.
    pub fn check_devices(&mut self) {
        let now = self.epoch_now();
        for index in 0..self.states.len() {
            if let OnPeriod::Until(end) = self.states[index].on {
                if now >= end {
                    self.switch_off_index(index);
                    if !self.sprayer_pending {
                        self.release_suspended_gates();
                    }
                }
            }
        }
    }

    fn set_gate(&mut self, device: &str, gate: RuleActivation) {
        if let Some(index) = self.try_index(device) {
            self.gates[index] = gate;
        }
    }

    fn release_suspended_gates(&mut self) {
        for gate in &mut self.gates {
            if *gate == RuleActivation::Suspended {
                *gate = RuleActivation::Active;
            }
        }
    }

    /***** Lifecycle counters *****/

    /// Set a counter and persist the counter file.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] or [`TerraError::Storage`].
    pub fn set_lifecycle_counter(&mut self, device: &str, hours: i32) -> Result<(), TerraError> {
        let index = self.registry.index_of(device)?;
        self.states[index].lifetime_hours = hours;
        self.save_lifecycle()
    }

    /// Subtract operating hours from every lifetime-tracked device, then
    /// persist.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] when the counter file cannot be
    /// written.
    pub fn decrease_lifetime(&mut self, hours: i32) -> Result<(), TerraError> {
        for index in 0..self.states.len() {
            if self.registry.get(index).lifetime_tracked {
                self.states[index].lifetime_hours -= hours;
            }
        }
        self.save_lifecycle()
    }

    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] on write failure.
    pub fn save_lifecycle(&self) -> Result<(), TerraError> {
        let counters: Vec<(String, i32)> = (0..self.states.len())
            .filter(|&i| self.registry.get(i).lifetime_tracked)
            .map(|i| (self.registry.get(i).name.clone(), self.states[i].lifetime_hours))
            .collect();
        crate::lifecycle::save(&self.lifecycle_path, &counters)
    }

    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] when the counter file is unreadable.
    pub fn restore_lifecycle(&mut self) -> Result<(), TerraError> {
        for (device, hours) in crate::lifecycle::load(&self.lifecycle_path)? {
            if let Some(index) = self.try_index(&device) {
                self.states[index].lifetime_hours = hours;
            }
        }
        Ok(())
    }

    /***** Settings *****/

    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] or [`TerraError::Settings`].
    pub fn save_settings(&self) -> Result<(), TerraError> {
        settings::save(&self.settings_path, &self.settings)
    }

    #[must_use]
    pub fn timers(&self) -> &[Timer] {
        &self.settings.timers
    }

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownDevice`] for names not in the catalog.
    pub fn timers_for_device(&self, device: &str) -> Result<Vec<Timer>, TerraError> {
        self.registry.index_of(device)?;
        Ok(self
            .settings
            .timers
            .iter()
            .filter(|t| t.device.eq_ignore_ascii_case(device))
            .cloned()
            .collect())
    }

    /// Merge-replace timers matching on `(device, index)` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] or [`TerraError::Settings`].
    pub fn replace_timers(&mut self, replacements: &[Timer]) -> Result<(), TerraError> {
        for new in replacements {
            for slot in &mut self.settings.timers {
                if slot.device.eq_ignore_ascii_case(&new.device) && slot.index == new.index {
                    *slot = new.clone();
                }
            }
        }
        self.save_settings()
    }

    /// # Errors
    ///
    /// Returns [`TerraError::UnknownRuleset`] for a number out of range
    /// (rulesets are addressed 1-based).
    pub fn ruleset(&self, nr: usize) -> Result<&Ruleset, TerraError> {
        nr.checked_sub(1)
            .and_then(|i| self.settings.rulesets.get(i))
            .ok_or(TerraError::UnknownRuleset(nr))
    }

    /// Replace a numbered ruleset and persist.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::UnknownRuleset`], [`TerraError::Storage`] or
    /// [`TerraError::Settings`].
    pub fn replace_ruleset(&mut self, nr: usize, ruleset: Ruleset) -> Result<(), TerraError> {
        let slot = nr
            .checked_sub(1)
            .and_then(|i| self.settings.rulesets.get_mut(i))
            .ok_or(TerraError::UnknownRuleset(nr))?;
        *slot = ruleset;
        self.save_settings()
    }

    #[must_use]
    pub fn sprayer_rule(&self) -> &SprayerRule {
        &self.settings.sprayer_rule
    }

    /// Replace the sprayer rule and persist.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] or [`TerraError::Settings`].
    pub fn replace_sprayer_rule(&mut self, rule: SprayerRule) -> Result<(), TerraError> {
        self.settings.sprayer_rule = rule;
        self.save_settings()
    }

    /***** Sensors *****/

    /// Take a hardware sample unless an override is in force.
    pub fn refresh_sensors(&mut self) {
        if !self.sensors.is_overridden() {
            let sample = self.reader.sample();
            self.sensors.refresh(sample, self.now);
        }
    }

    /// Fresh readings in wire form.
    pub fn sensor_snapshot(&mut self) -> SensorSnapshot {
        self.refresh_sensors();
        self.sensors.snapshot()
    }

    pub fn override_sensors(&mut self, room: i32, terrarium: i32) {
        self.sensors.override_temperatures(room, terrarium);
    }

    pub fn clear_sensor_override(&mut self) {
        self.sensors.clear_override();
    }

    #[must_use]
    pub fn room_temperature(&self) -> i32 {
        self.sensors.room_temperature()
    }

    #[must_use]
    pub fn terrarium_temperature(&self) -> i32 {
        self.sensors.terrarium_temperature()
    }

    /***** Tracing *****/

    #[must_use]
    pub fn is_trace_on(&self) -> bool {
        self.trace.is_enabled()
    }

    pub fn set_trace(&mut self, on: bool) {
        if on {
            let bits: Vec<(String, bool)> = (0..self.states.len())
                .map(|i| (self.registry.get(i).name.clone(), self.states[i].on.is_on()))
                .collect();
            self.trace.start(self.now, &bits);
        } else {
            self.trace.stop(self.now);
        }
    }

    /// Rotate the trace files once a session has covered a full day.
    pub fn check_trace(&mut self) {
        if self.trace.rotation_due(self.now) {
            self.set_trace(false);
            self.set_trace(true);
        }
    }

    /// Record the per-minute temperature line.
    pub fn trace_temperatures(&self) {
        let payload = format!(
            "r={} t={}",
            self.sensors.room_temperature(),
            self.sensors.terrarium_temperature()
        );
        self.trace.temperature(self.now, &payload);
    }

    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] when the trace folder is unreadable.
    pub fn trace_files(&self, kind: TraceKind) -> Result<Vec<String>, TerraError> {
        self.trace.list(kind)
    }

    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] for unknown names.
    pub fn trace_file(&self, kind: TraceKind, name: &str) -> Result<String, TerraError> {
        self.trace.read_file(kind, name)
    }

    /***** Views *****/

    /// The state snapshot served by `GET /state`.
    #[must_use]
    pub fn state_snapshot(&self) -> serde_json::Value {
        let state: Vec<serde_json::Value> = (0..self.states.len())
            .map(|i| {
                let device = self.registry.get(i);
                let s = self.states[i];
                let mut entry = json!({
                    "device": device.name,
                    "state": if s.on.is_on() { "on" } else { "off" },
                    "hours_on": s.lifetime_hours,
                    "manual": if s.manual { "yes" } else { "no" },
                });
                if let Some(label) = s.on.end_time_label() {
                    entry["end_time"] = json!(label);
                }
                entry
            })
            .collect();
        json!({
            "trace": if self.trace.is_enabled() { "on" } else { "off" },
            "state": state,
        })
    }

    /// The static properties document.
    #[must_use]
    pub fn properties(&self) -> serde_json::Value {
        let devices: Vec<serde_json::Value> = (0..self.registry.len())
            .map(|i| {
                let device = self.registry.get(i);
                json!({
                    "device": device.name,
                    "nr_of_timers": self.settings.timer_slots(i),
                    "lc_counted": device.lifetime_tracked,
                })
            })
            .collect();
        json!({
            "tcu": TCU_NAME,
            "nr_of_timers": self.settings.timers.len(),
            "nr_of_programs": self.settings.rulesets.len(),
            "devices": devices,
        })
    }
}
