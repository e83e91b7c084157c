//! # terra-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the controller's JSON API (`/api/state`, `/api/timers`,
//!   `/api/device/{device}/on`, …)
//! - Map HTTP requests into calls on the shared [`Terrarium`] aggregate
//!   (driving adapter), taking the mutex for the duration of each request
//! - Map domain errors into HTTP responses with JSON error bodies
//!
//! ## Dependency rule
//! Depends on `terra-app` (for the aggregate and ports) and `terra-domain`
//! (for the wire types). Never leaks axum types into the domain.
//!
//! [`Terrarium`]: terra_app::controller::Terrarium

pub mod api;
pub mod error;
pub mod router;
pub mod state;
