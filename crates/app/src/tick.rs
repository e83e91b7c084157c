//! Tick cadence over the aggregate.
//!
//! The loop polls a few times per second so no second boundary is missed.
//! Edges are detected by comparing clock fields, giving exactly one
//! evaluation per second, minute and hour:
//!
//! - every second: expiry check
//! - every minute: sensor refresh, temperature trace, timers, sprayer
//!   sequencer, rules, trace rotation
//! - every hour: trace auto-start and lifecycle decrement

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use tokio::sync::Mutex;

use crate::controller::Terrarium;
use crate::ports::{ActuatorDriver, SensorReader};

/// Second/minute/hour edge detector.
pub struct TickScheduler {
    second: u32,
    minute: u32,
    hour: u32,
}

impl TickScheduler {
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            second: now.second(),
            minute: now.minute(),
            hour: now.hour(),
        }
    }

    /// Run every check whose edge has been crossed since the last tick.
    pub fn tick<A: ActuatorDriver, S: SensorReader>(
        &mut self,
        terrarium: &mut Terrarium<A, S>,
        now: NaiveDateTime,
    ) {
        terrarium.set_now(now);
        if now.second() == self.second {
            return;
        }
        self.second = now.second();
        terrarium.check_devices();

        if now.minute() != self.minute {
            self.minute = now.minute();
            terrarium.refresh_sensors();
            terrarium.trace_temperatures();
            terrarium.check_timers();
            terrarium.check_sprayer_rule();
            terrarium.check_rules();
            terrarium.check_trace();
        }

        if now.hour() != self.hour {
            self.hour = now.hour();
            if !terrarium.is_trace_on() {
                terrarium.set_trace(true);
            }
            if let Err(err) = terrarium.decrease_lifetime(1) {
                tracing::error!(%err, "cannot persist lifecycle counters");
            }
        }
    }
}

/// Drive the shared aggregate off the wall clock until the task is aborted.
pub async fn run<A, S>(shared: Arc<Mutex<Terrarium<A, S>>>, poll_interval: Duration)
where
    A: ActuatorDriver + Send,
    S: SensorReader + Send,
{
    let mut scheduler = {
        let guard = shared.lock().await;
        TickScheduler::new(guard.now())
    };
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let now = Local::now().naive_local();
        let mut guard = shared.lock().await;
        scheduler.tick(&mut guard, now);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use terra_domain::state::OnPeriod;
    use terra_domain::timer::Timer;

    use crate::controller::StoragePaths;
    use crate::ports::SensorSample;
    use crate::settings::Settings;

    use super::*;

    struct NullActuator;

    impl ActuatorDriver for NullActuator {
        fn switch_on(&mut self, _device: &str) {}
        fn switch_off(&mut self, _device: &str) {}
    }

    struct FixedSensor(SensorSample);

    impl SensorReader for FixedSensor {
        fn sample(&mut self) -> SensorSample {
            self.0
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 8)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn build(
        dir: &std::path::Path,
        settings: Settings,
        now: NaiveDateTime,
    ) -> Terrarium<NullActuator, FixedSensor> {
        Terrarium::new(
            settings,
            StoragePaths::under(dir),
            5,
            NullActuator,
            FixedSensor(SensorSample::default()),
            now,
        )
        .unwrap()
    }

    #[test]
    fn should_evaluate_timers_on_minute_edge_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.timers[0] = Timer {
            device: "light1".to_string(),
            index: 1,
            hour_on: 9,
            minute_on: 1,
            hour_off: 21,
            minute_off: 0,
            repeat: 1,
            period: 0,
        };
        let mut t = build(dir.path(), settings, at(9, 0, 58));
        let mut scheduler = TickScheduler::new(at(9, 0, 58));

        scheduler.tick(&mut t, at(9, 0, 59));
        assert!(!t.is_device_on("light1").unwrap());
        scheduler.tick(&mut t, at(9, 1, 0));
        assert!(t.is_device_on("light1").unwrap());
    }

    #[test]
    fn should_skip_checks_within_the_same_second() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = build(dir.path(), Settings::default(), at(9, 0, 0));
        let end = terra_domain::time::epoch_seconds(at(9, 0, 0));
        t.set_device_on("pump", OnPeriod::Until(end)).unwrap();

        let mut scheduler = TickScheduler::new(at(9, 0, 0));
        scheduler.tick(&mut t, at(9, 0, 0));
        assert!(t.is_device_on("pump").unwrap());
        scheduler.tick(&mut t, at(9, 0, 1));
        assert!(!t.is_device_on("pump").unwrap());
    }

    #[test]
    fn should_decrement_lifecycle_and_start_trace_on_hour_edge() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = build(dir.path(), Settings::default(), at(9, 59, 59));
        t.set_lifecycle_counter("uvlight", 4400).unwrap();

        let mut scheduler = TickScheduler::new(at(9, 59, 59));
        scheduler.tick(&mut t, at(10, 0, 0));
        assert_eq!(t.device_state("uvlight").unwrap().lifetime_hours, 4399);
        assert!(t.is_trace_on());

        scheduler.tick(&mut t, at(10, 0, 1));
        assert_eq!(t.device_state("uvlight").unwrap().lifetime_hours, 4399);
    }
}
