//! Shared scenario-test fixtures.

use chrono::{NaiveDate, NaiveDateTime};

use terra_app::controller::{StoragePaths, Terrarium};
use terra_app::ports::{ActuatorDriver, SensorReader, SensorSample};
use terra_app::settings::Settings;
use terra_domain::state::RuleActivation;

pub struct RecordingActuator {
    pub log: Vec<String>,
}

impl ActuatorDriver for RecordingActuator {
    fn switch_on(&mut self, device: &str) {
        self.log.push(format!("on:{device}"));
    }

    fn switch_off(&mut self, device: &str) {
        self.log.push(format!("off:{device}"));
    }
}

pub struct StubSensor;

impl SensorReader for StubSensor {
    fn sample(&mut self) -> SensorSample {
        SensorSample::default()
    }
}

pub type TestTerrarium = Terrarium<RecordingActuator, StubSensor>;

/// A clock instant on 2021-01-08 plus `day` days.
pub fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 1, 8)
        .unwrap()
        .checked_add_days(chrono::Days::new(u64::from(day)))
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

pub fn build(dir: &std::path::Path, settings: Settings, now: NaiveDateTime) -> TestTerrarium {
    let mut terrarium = Terrarium::new(
        settings,
        StoragePaths::under(dir),
        5,
        RecordingActuator { log: Vec::new() },
        StubSensor,
        now,
    )
    .unwrap();
    terrarium.init_rules();
    terrarium
}

/// One evaluation pass in the order the minute tick uses.
pub fn pass(terrarium: &mut TestTerrarium, now: NaiveDateTime) {
    terrarium.set_now(now);
    terrarium.check_devices();
    terrarium.check_timers();
    terrarium.check_sprayer_rule();
    terrarium.check_rules();
}

/// A second tick between minute boundaries: only the expiry check and the
/// sprayer sequencer run.
pub fn second_pass(terrarium: &mut TestTerrarium, now: NaiveDateTime) {
    terrarium.set_now(now);
    terrarium.check_devices();
    terrarium.check_sprayer_rule();
    terrarium.check_rules();
}

const DEVICES: [&str; 11] = [
    "light1", "light2", "light3", "light4", "uvlight", "light6", "pump", "sprayer", "mist",
    "fan_in", "fan_out",
];

/// Assert the raw on-period of all 11 devices in catalog order.
pub fn assert_on_periods(terrarium: &TestTerrarium, expected: [i64; 11]) {
    for (device, want) in DEVICES.iter().zip(expected) {
        let got = terrarium.device_state(device).unwrap().on.as_raw();
        assert_eq!(got, want, "on period of {device}");
    }
}

/// Assert the rule gate of all 11 devices, encoded -1/0/1.
pub fn assert_gates(terrarium: &TestTerrarium, expected: [i8; 11]) {
    for (device, want) in DEVICES.iter().zip(expected) {
        let got = match terrarium.gate_for(device).unwrap() {
            RuleActivation::NotApplicable => -1,
            RuleActivation::Suspended => 0,
            RuleActivation::Active => 1,
        };
        assert_eq!(got, want, "gate of {device}");
    }
}
