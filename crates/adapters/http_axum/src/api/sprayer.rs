//! JSON REST handlers for the sprayer rule.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};
use terra_domain::sprayer::SprayerRule;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<SprayerRule>),
}

impl IntoResponse for GetResponse {
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

/// `GET /api/sprayerrule`
pub async fn get<A, S>(State(state): State<AppState<A, S>>) -> Result<GetResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let terrarium = state.terrarium.lock().await;
    Ok(GetResponse::Ok(Json(terrarium.sprayer_rule().clone())))
}

/// `PUT /api/sprayerrule`
pub async fn replace<A, S>(
    State(state): State<AppState<A, S>>,
    Json(rule): Json<SprayerRule>,
) -> Result<ReplaceResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.replace_sprayer_rule(rule)?;
    Ok(ReplaceResponse::NoContent)
}
