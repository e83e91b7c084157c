//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod history;
#[allow(clippy::missing_errors_doc)]
pub mod properties;
#[allow(clippy::missing_errors_doc)]
pub mod rulesets;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;
#[allow(clippy::missing_errors_doc)]
pub mod sprayer;
#[allow(clippy::missing_errors_doc)]
pub mod timers;
#[allow(clippy::missing_errors_doc)]
pub mod trace;

use axum::Router;
use axum::routing::{get, post, put};

use terra_app::ports::{ActuatorDriver, SensorReader};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<A, S>() -> Router<AppState<A, S>>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    Router::new()
        // Read-only unit description and live state
        .route("/properties", get(properties::properties::<A, S>))
        .route("/state", get(properties::state::<A, S>))
        // Timers
        .route(
            "/timers",
            get(timers::list::<A, S>).put(timers::replace::<A, S>),
        )
        .route("/timers/{device}", get(timers::for_device::<A, S>))
        // Rulesets and the sprayer rule
        .route(
            "/ruleset/{nr}",
            get(rulesets::get::<A, S>).put(rulesets::replace::<A, S>),
        )
        .route(
            "/sprayerrule",
            get(sprayer::get::<A, S>).put(sprayer::replace::<A, S>),
        )
        // Manual device control
        .route("/device/{device}/on", put(devices::switch_on::<A, S>))
        .route(
            "/device/{device}/on/{seconds}",
            put(devices::switch_on_for::<A, S>),
        )
        .route("/device/{device}/off", put(devices::switch_off::<A, S>))
        .route("/device/{device}/manual", put(devices::set_manual::<A, S>))
        .route("/device/{device}/auto", put(devices::set_auto::<A, S>))
        .route(
            "/counter/{device}/{value}",
            post(devices::set_counter::<A, S>),
        )
        // Sensors
        .route("/sensors", get(sensors::read::<A, S>))
        .route("/sensors/auto", post(sensors::clear_override::<A, S>))
        .route(
            "/sensors/{room}/{terrarium}",
            post(sensors::set_override::<A, S>),
        )
        // Tracing
        .route("/trace/on", post(trace::switch_on::<A, S>))
        .route("/trace/off", post(trace::switch_off::<A, S>))
        // Trace history
        .route("/history/{kind}", get(history::list::<A, S>))
        .route("/history/{kind}/{name}", get(history::file::<A, S>))
}
