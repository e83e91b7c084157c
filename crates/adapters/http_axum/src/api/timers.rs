//! JSON REST handlers for timers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};
use terra_domain::timer::Timer;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<Timer>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the replace endpoint.
pub enum ReplaceResponse {
    NoContent,
}

impl IntoResponse for ReplaceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/timers`
pub async fn list<A, S>(State(state): State<AppState<A, S>>) -> Result<ListResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let terrarium = state.terrarium.lock().await;
    Ok(ListResponse::Ok(Json(terrarium.timers().to_vec())))
}

/// `GET /api/timers/:device`
pub async fn for_device<A, S>(
    State(state): State<AppState<A, S>>,
    Path(device): Path<String>,
) -> Result<ListResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let terrarium = state.terrarium.lock().await;
    let timers = terrarium.timers_for_device(&device)?;
    Ok(ListResponse::Ok(Json(timers)))
}

/// `PUT /api/timers`
///
/// Timers are matched on `(device, index)`. Slots not named in the body keep
/// their current programming.
pub async fn replace<A, S>(
    State(state): State<AppState<A, S>>,
    Json(timers): Json<Vec<Timer>>,
) -> Result<ReplaceResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.replace_timers(&timers)?;
    Ok(ReplaceResponse::NoContent)
}
