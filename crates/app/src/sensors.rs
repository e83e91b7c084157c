//! Cached sensor readings with a manual override.
//!
//! The board holds the last sample taken from the [`SensorReader`] port. An
//! override pins both temperatures until cleared; while it is in force the
//! minute refresh does not consult the hardware at all.
//!
//! [`SensorReader`]: crate::ports::SensorReader

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ports::SensorSample;

const CLOCK_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Last known sensor values.
#[derive(Debug, Clone)]
pub struct SensorBoard {
    room_temperature: i32,
    room_humidity: i32,
    terrarium_temperature: i32,
    refreshed_at: NaiveDateTime,
    overridden: bool,
}

impl SensorBoard {
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            room_temperature: 0,
            room_humidity: 0,
            terrarium_temperature: 0,
            refreshed_at: now,
            overridden: false,
        }
    }

    /// Store a fresh hardware sample. Ignored while an override is in force.
    pub fn refresh(&mut self, sample: SensorSample, now: NaiveDateTime) {
        if self.overridden {
            return;
        }
        self.room_temperature = sample.room_temperature;
        self.room_humidity = sample.room_humidity;
        self.terrarium_temperature = sample.terrarium_temperature;
        self.refreshed_at = now;
    }

    /// Pin both temperatures until [`clear_override`](Self::clear_override).
    pub fn override_temperatures(&mut self, room: i32, terrarium: i32) {
        self.overridden = true;
        self.room_temperature = room;
        self.terrarium_temperature = terrarium;
    }

    pub fn clear_override(&mut self) {
        self.overridden = false;
    }

    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    #[must_use]
    pub fn room_temperature(&self) -> i32 {
        self.room_temperature
    }

    #[must_use]
    pub fn terrarium_temperature(&self) -> i32 {
        self.terrarium_temperature
    }

    /// The wire view served by `GET /sensors`.
    #[must_use]
    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            clock: self.refreshed_at.format(CLOCK_FORMAT).to_string(),
            sensors: vec![
                SensorReading {
                    location: "room".to_string(),
                    temperature: self.room_temperature,
                    humidity: self.room_humidity,
                },
                SensorReading {
                    location: "terrarium".to_string(),
                    temperature: self.terrarium_temperature,
                    humidity: 0,
                },
            ],
        }
    }
}

/// Sensor readings as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub clock: String,
    pub sensors: Vec<SensorReading>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub location: String,
    pub temperature: i32,
    pub humidity: i32,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample() -> SensorSample {
        SensorSample {
            room_temperature: 21,
            room_humidity: 55,
            terrarium_temperature: 26,
        }
    }

    #[test]
    fn should_store_sample_on_refresh() {
        let mut board = SensorBoard::new(noon());
        board.refresh(sample(), noon());
        assert_eq!(board.room_temperature(), 21);
        assert_eq!(board.terrarium_temperature(), 26);
    }

    #[test]
    fn should_ignore_refresh_while_overridden() {
        let mut board = SensorBoard::new(noon());
        board.override_temperatures(30, 35);
        board.refresh(sample(), noon());
        assert_eq!(board.room_temperature(), 30);
        assert_eq!(board.terrarium_temperature(), 35);
        assert!(board.is_overridden());
    }

    #[test]
    fn should_resume_refresh_after_override_cleared() {
        let mut board = SensorBoard::new(noon());
        board.override_temperatures(30, 35);
        board.clear_override();
        board.refresh(sample(), noon());
        assert_eq!(board.terrarium_temperature(), 26);
    }

    #[test]
    fn should_render_snapshot_with_clock_and_both_locations() {
        let mut board = SensorBoard::new(noon());
        board.refresh(sample(), noon());
        let snap = board.snapshot();
        assert_eq!(snap.clock, "08-01-2021 12:00");
        assert_eq!(snap.sensors[0].location, "room");
        assert_eq!(snap.sensors[0].humidity, 55);
        assert_eq!(snap.sensors[1].location, "terrarium");
        assert_eq!(snap.sensors[1].temperature, 26);
    }
}
