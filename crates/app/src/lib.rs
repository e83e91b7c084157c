//! # terra-app
//!
//! Application layer — the control engine and its **port definitions**.
//!
//! ## Responsibilities
//! - Define the port traits adapters must implement (driven/outbound ports):
//!   - `ActuatorDriver` — switch a named device on or off
//!   - `SensorReader` — sample the temperature/humidity sensors
//! - Run the control engine:
//!   - `Terrarium` — the orchestrator aggregate (timers, rules, sprayer
//!     sequencer, expiry check, rule-activation gates)
//!   - `TickScheduler` — second/minute/hour cadence over the aggregate
//! - Own persistence of controller state: settings, lifecycle counters and
//!   the daily trace files
//!
//! ## Dependency rule
//! Depends on `terra-domain` only (plus `tokio::sync`/`tokio::time` for the
//! shared aggregate and the tick loop). Never imports adapter crates;
//! adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod lifecycle;
pub mod ports;
pub mod sensors;
pub mod settings;
pub mod tick;
pub mod trace;
