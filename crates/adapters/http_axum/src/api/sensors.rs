//! JSON REST handlers for sensor readings and test overrides.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};
use terra_app::sensors::SensorSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the read endpoint.
pub enum ReadResponse {
    Ok(Json<SensorSnapshot>),
}

impl IntoResponse for ReadResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the override endpoints.
pub enum OverrideResponse {
    NoContent,
}

impl IntoResponse for OverrideResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/sensors`
pub async fn read<A, S>(State(state): State<AppState<A, S>>) -> Result<ReadResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    Ok(ReadResponse::Ok(Json(terrarium.sensor_snapshot())))
}

/// `POST /api/sensors/:room/:terrarium`
///
/// Pins both temperatures until `/api/sensors/auto` restores hardware
/// sampling. Meant for testing rules without heating the room.
pub async fn set_override<A, S>(
    State(state): State<AppState<A, S>>,
    Path((room, terrarium_temp)): Path<(i32, i32)>,
) -> Result<OverrideResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.override_sensors(room, terrarium_temp);
    Ok(OverrideResponse::NoContent)
}

/// `POST /api/sensors/auto`
pub async fn clear_override<A, S>(
    State(state): State<AppState<A, S>>,
) -> Result<OverrideResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.clear_sensor_override();
    Ok(OverrideResponse::NoContent)
}
