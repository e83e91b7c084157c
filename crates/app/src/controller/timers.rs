//! Timer evaluation.
//!
//! Runs on minute boundaries. A window timer switches its device on at the
//! start minute and off at the end minute; an off time of `00:00` means the
//! timer has no off edge. A duration timer switches the device on at the
//! start minute with an absolute end time, and the per-second expiry check
//! switches it off.
//!
//! While a timer owns a device the rule engine must not fight it, so the on
//! edge suspends the relevant gates and the off edge (or the expiry check)
//! releases every suspended gate.

use terra_domain::state::{OnPeriod, RuleActivation};
use terra_domain::time;
use terra_domain::timer::Timer;

use crate::ports::{ActuatorDriver, SensorReader};

use super::{FAN_IN, FAN_OUT, MINUTES_PER_DAY, MIST, SPRAYER, Terrarium};

impl<A: ActuatorDriver, S: SensorReader> Terrarium<A, S> {
    /// Pre-activate window timers at startup: a device whose armed on/off
    /// window contains the current minute is switched on indefinitely.
    pub fn init_timers(&mut self) {
        let minute = time::minute_of_day(self.now);
        let timers = self.settings.timers.clone();
        for timer in &timers {
            if timer.is_armed()
                && timer.is_window()
                && minute >= timer.on_minutes()
                && minute <= timer.off_minutes()
            {
                if let Some(index) = self.try_index(&timer.device) {
                    self.switch_on_index(index, OnPeriod::Indefinite);
                }
            }
        }
    }

    /// Evaluate every armed timer against the current minute.
    pub fn check_timers(&mut self) {
        let minute = time::minute_of_day(self.now);
        let timers = self.settings.timers.clone();
        for timer in &timers {
            if !timer.is_armed() {
                continue;
            }
            if timer.is_window() {
                if minute == timer.on_minutes() {
                    self.window_on_edge(timer);
                } else if timer.off_minutes() != 0 && minute == timer.off_minutes() {
                    self.window_off_edge(timer);
                }
            } else if minute == timer.on_minutes() {
                self.duration_on_edge(timer);
            }
        }
    }

    fn window_on_edge(&mut self, timer: &Timer) {
        let Some(index) = self.try_index(&timer.device) else {
            return;
        };
        if self.states[index].on.is_on() {
            return;
        }
        self.switch_on_index(index, OnPeriod::Indefinite);
        if timer.device.eq_ignore_ascii_case(MIST) {
            // Mist and airflow exclude each other. Remember the fan states
            // so the off edge can restore them.
            self.fan_in_was_on = self.is_device_on(FAN_IN).unwrap_or(false);
            self.fan_out_was_on = self.is_device_on(FAN_OUT).unwrap_or(false);
            if let Some(fan) = self.try_index(FAN_IN) {
                self.switch_off_index(fan);
            }
            if let Some(fan) = self.try_index(FAN_OUT) {
                self.switch_off_index(fan);
            }
            self.set_gate(FAN_IN, RuleActivation::Suspended);
            self.set_gate(FAN_OUT, RuleActivation::Suspended);
        } else if timer.device.eq_ignore_ascii_case(FAN_IN)
            || timer.device.eq_ignore_ascii_case(FAN_OUT)
        {
            self.set_gate(FAN_IN, RuleActivation::Suspended);
            self.set_gate(FAN_OUT, RuleActivation::Suspended);
        }
    }

    fn window_off_edge(&mut self, timer: &Timer) {
        if timer.device.eq_ignore_ascii_case(MIST) {
            if let Some(index) = self.try_index(MIST) {
                self.switch_off_index(index);
            }
            if self.fan_in_was_on {
                if let Some(fan) = self.try_index(FAN_IN) {
                    self.switch_on_index(fan, OnPeriod::Indefinite);
                }
                self.fan_in_was_on = false;
            }
            if self.fan_out_was_on {
                if let Some(fan) = self.try_index(FAN_OUT) {
                    self.switch_on_index(fan, OnPeriod::Indefinite);
                }
                self.fan_out_was_on = false;
            }
        } else if let Some(index) = self.try_index(&timer.device) {
            self.switch_off_index(index);
        }
        self.release_suspended_gates();
    }

    fn duration_on_edge(&mut self, timer: &Timer) {
        if let Some(index) = self.try_index(&timer.device) {
            if !self.states[index].on.is_on() {
                let end = self.epoch_now() + i64::from(timer.period);
                self.switch_on_index(index, OnPeriod::Until(end));
            }
        }
        if timer.device.eq_ignore_ascii_case(SPRAYER) {
            // Arm the sprayer sequence: its follow-up actions fire `delay`
            // minutes after the timer's start minute, and the rule engine
            // stays suspended until then.
            self.sprayer_pending = true;
            self.sprayer_fire_minute =
                (timer.on_minutes() + self.settings.sprayer_rule.delay) % MINUTES_PER_DAY;
            self.set_gate(FAN_IN, RuleActivation::Suspended);
            if let Some(fan) = self.try_index(FAN_IN) {
                self.switch_off_index(fan);
            }
            self.set_gate(FAN_OUT, RuleActivation::Suspended);
            if let Some(fan) = self.try_index(FAN_OUT) {
                self.switch_off_index(fan);
            }
        }
    }
}
