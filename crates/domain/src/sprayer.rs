//! The sprayer rule — a delayed one-shot action chain.
//!
//! Armed by the sprayer's duration timer; its actions run once, `delay`
//! minutes after the timer's start time. While armed or in flight the rule
//! engine is suspended for the whole controller.

use serde::{Deserialize, Serialize};

use crate::rule::Action;

/// Delayed follow-up actions for a sprayer burst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprayerRule {
    /// Minutes after the sprayer timer's start time.
    pub delay: u32,
    pub actions: Vec<Action>,
}

impl SprayerRule {
    /// A no-op sprayer rule with `slots` empty action slots.
    #[must_use]
    pub fn disabled(slots: usize) -> Self {
        Self {
            delay: 0,
            actions: (0..slots).map(|_| Action::none()).collect(),
        }
    }
}
