//! # terra-domain
//!
//! Pure domain model for the terrarium control unit.
//!
//! ## Responsibilities
//! - Foundational types: the device registry, typed errors, time-of-day helpers
//! - Define **Devices** (named actuators, optionally lifetime-tracked)
//! - Define **DeviceState** (the on/off state machine of one actuator)
//! - Define **Timers** (clock-driven on/off windows and on/duration triggers)
//! - Define **Rules** and **Rulesets** (temperature-threshold automation)
//! - Define the **SprayerRule** (the delayed one-shot action chain)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod device;
pub mod rule;
pub mod sprayer;
pub mod state;
pub mod timer;
