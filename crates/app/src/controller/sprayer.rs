//! The sprayer sequencer.
//!
//! A sprayer duration timer arms the sequence: the sprayer runs for its
//! period, the fans are parked, and the rule engine is suspended as a whole.
//! When the delay minute arrives the follow-up actions run (typically the
//! fans, to dry the enclosure) and normal rule evaluation resumes.

use terra_domain::time;

use crate::ports::{ActuatorDriver, SensorReader};

use super::Terrarium;

impl<A: ActuatorDriver, S: SensorReader> Terrarium<A, S> {
    /// Whether a sprayer sequence is armed and its follow-up actions have
    /// not run yet.
    #[must_use]
    pub fn is_sprayer_rule_active(&self) -> bool {
        self.sprayer_pending
    }

    /// Fire the follow-up actions when the delay minute arrives.
    pub fn check_sprayer_rule(&mut self) {
        if !self.sprayer_pending {
            return;
        }
        if time::minute_of_day(self.now) == self.sprayer_fire_minute {
            let actions = self.settings.sprayer_rule.actions.clone();
            for action in &actions {
                self.execute_action(action);
            }
            self.sprayer_pending = false;
        }
    }
}
