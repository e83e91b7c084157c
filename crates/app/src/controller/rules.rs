//! Temperature rule evaluation.
//!
//! Runs on minute boundaries, after the timers. The whole engine is skipped
//! while a sprayer sequence is pending. Inside a ruleset's window a tripped
//! rule executes its actions; once the temperature crosses back past the
//! ideal point the actions are reversed. Outside the window an active
//! ruleset forces its devices off.
//!
//! A device is only ever actuated through its gate: `Active` lets the rule
//! engine act, `Suspended` means a timer owns the device right now.

use terra_domain::rule::{Action, Rule, Ruleset};
use terra_domain::state::{OnPeriod, RuleActivation};
use terra_domain::time;

use crate::ports::{ActuatorDriver, SensorReader};

use super::Terrarium;

impl<A: ActuatorDriver, S: SensorReader> Terrarium<A, S> {
    /// Register every device named by an active ruleset or the sprayer rule
    /// as rule-controlled. All other gates stay [`RuleActivation::NotApplicable`].
    pub fn init_rules(&mut self) {
        let mut controlled: Vec<String> = Vec::new();
        for ruleset in &self.settings.rulesets {
            if ruleset.active {
                for rule in &ruleset.rules {
                    for action in &rule.actions {
                        if !action.is_noop() {
                            controlled.push(action.device.clone());
                        }
                    }
                }
            }
        }
        for action in &self.settings.sprayer_rule.actions {
            if !action.is_noop() {
                controlled.push(action.device.clone());
            }
        }
        for device in controlled {
            self.set_gate(&device, RuleActivation::Active);
        }
    }

    /// Evaluate both rulesets against the terrarium temperature.
    pub fn check_rules(&mut self) {
        if self.sprayer_pending {
            return;
        }
        let minute = time::minute_of_day(self.now);
        let temperature = self.sensors.terrarium_temperature();
        let rulesets = self.settings.rulesets.clone();
        for ruleset in &rulesets {
            if ruleset.in_window(minute) {
                for rule in &ruleset.rules {
                    self.apply_rule(rule, temperature, ruleset.ideal_temp);
                }
            } else if ruleset.active {
                self.force_release(ruleset);
            }
        }
    }

    fn apply_rule(&mut self, rule: &Rule, temperature: i32, ideal: i32) {
        if rule.triggers(temperature) {
            for action in &rule.actions {
                self.execute_action(action);
            }
        } else if rule.releases(temperature, ideal) {
            for action in &rule.actions {
                self.release_action(action);
            }
        }
    }

    /// Run one action if its device's gate allows it (a pending sprayer
    /// sequence overrides the gate). A positive period becomes an absolute
    /// end time; an already-on device is left untouched.
    pub(super) fn execute_action(&mut self, action: &Action) {
        if action.is_noop() || action.on_period == 0 {
            return;
        }
        let Some(index) = self.try_index(&action.device) else {
            return;
        };
        if self.gates[index] != RuleActivation::Active && !self.sprayer_pending {
            return;
        }
        if self.states[index].on.is_on() {
            return;
        }
        let period = if action.on_period > 0 {
            OnPeriod::Until(self.epoch_now() + action.on_period)
        } else {
            OnPeriod::from_raw(action.on_period)
        };
        self.switch_on_index(index, period);
    }

    /// Reverse an action once the ideal temperature is reached. Devices a
    /// timer switched on indefinitely are not the rule engine's to turn off.
    fn release_action(&mut self, action: &Action) {
        if action.is_noop() {
            return;
        }
        let Some(index) = self.try_index(&action.device) else {
            return;
        };
        if self.states[index].on.is_on()
            && self.gates[index] == RuleActivation::Active
            && self.states[index].on != OnPeriod::Indefinite
        {
            self.switch_off_index(index);
        }
    }

    /// Outside its window an active ruleset leaves nothing switched on.
    fn force_release(&mut self, ruleset: &Ruleset) {
        for rule in &ruleset.rules {
            for action in &rule.actions {
                if action.is_noop() {
                    continue;
                }
                let Some(index) = self.try_index(&action.device) else {
                    continue;
                };
                if self.states[index].on.is_on() && self.gates[index] == RuleActivation::Active {
                    self.switch_off_index(index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::controller::StoragePaths;
    use crate::controller::tests::{FixedSensor, NullActuator};
    use crate::ports::SensorSample;
    use crate::settings::Settings;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 8)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn ruleset(from: &str, to: &str, ideal: i32, rules: Vec<Rule>) -> Ruleset {
        Ruleset {
            terrarium: 1,
            active: true,
            from: from.to_string(),
            to: to.to_string(),
            ideal_temp: ideal,
            rules,
        }
    }

    fn build(
        dir: &std::path::Path,
        settings: Settings,
        terrarium_temp: i32,
        now: NaiveDateTime,
    ) -> Terrarium<NullActuator, FixedSensor> {
        let mut t = Terrarium::new(
            settings,
            StoragePaths::under(dir),
            5,
            NullActuator,
            FixedSensor(SensorSample::default()),
            now,
        )
        .unwrap();
        t.override_sensors(21, terrarium_temp);
        t.init_rules();
        t
    }

    #[test]
    fn should_mark_rule_devices_and_leave_others_unregistered() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: -23,
                actions: vec![Action::new("fan_in", -2), Action::none()],
            }],
        );
        let t = build(dir.path(), settings, 26, at(10, 0, 0));
        assert_eq!(t.gate_for("fan_in").unwrap(), RuleActivation::Active);
        assert_eq!(t.gate_for("light1").unwrap(), RuleActivation::NotApplicable);
    }

    #[test]
    fn should_switch_on_until_ideal_when_too_cold() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: -23,
                actions: vec![Action::new("fan_in", -2), Action::none()],
            }],
        );
        let mut t = build(dir.path(), settings, 21, at(10, 0, 0));
        t.check_rules();
        assert_eq!(t.device_state("fan_in").unwrap().on, OnPeriod::UntilIdeal);
    }

    #[test]
    fn should_release_when_ideal_temperature_reached() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: -23,
                actions: vec![Action::new("fan_in", -2), Action::none()],
            }],
        );
        let mut t = build(dir.path(), settings, 21, at(10, 0, 0));
        t.check_rules();
        assert!(t.is_device_on("fan_in").unwrap());

        t.override_sensors(21, 26);
        t.check_rules();
        assert!(!t.is_device_on("fan_in").unwrap());
    }

    #[test]
    fn should_not_release_device_owned_by_timer() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: -23,
                actions: vec![Action::new("fan_in", -2), Action::none()],
            }],
        );
        let mut t = build(dir.path(), settings, 26, at(10, 0, 0));
        t.set_device_on("fan_in", OnPeriod::Indefinite).unwrap();
        t.check_rules();
        assert_eq!(t.device_state("fan_in").unwrap().on, OnPeriod::Indefinite);
    }

    #[test]
    fn should_force_off_outside_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: 28,
                actions: vec![Action::new("fan_out", -2), Action::none()],
            }],
        );
        let mut t = build(dir.path(), settings, 30, at(10, 0, 0));
        t.check_rules();
        assert!(t.is_device_on("fan_out").unwrap());

        t.set_now(at(22, 0, 0));
        t.check_rules();
        assert!(!t.is_device_on("fan_out").unwrap());
    }

    #[test]
    fn should_not_act_when_gate_suspended() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: -23,
                actions: vec![Action::new("fan_in", -2), Action::none()],
            }],
        );
        let mut t = build(dir.path(), settings, 21, at(10, 0, 0));
        t.set_gate("fan_in", RuleActivation::Suspended);
        t.check_rules();
        assert!(!t.is_device_on("fan_in").unwrap());
    }

    #[test]
    fn should_convert_positive_period_to_end_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.rulesets[0] = ruleset(
            "09:00",
            "21:00",
            26,
            vec![Rule {
                value: 28,
                actions: vec![Action::new("pump", 600), Action::none()],
            }],
        );
        let mut t = build(dir.path(), settings, 30, at(10, 0, 0));
        t.check_rules();
        let end = time::epoch_seconds(at(10, 10, 0));
        assert_eq!(t.device_state("pump").unwrap().on, OnPeriod::Until(end));
    }
}
