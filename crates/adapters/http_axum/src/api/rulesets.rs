//! JSON REST handlers for temperature rulesets.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};
use terra_domain::rule::Ruleset;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Ruleset>),
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

/// `GET /api/ruleset/:nr` (1-based)
pub async fn get<A, S>(
    State(state): State<AppState<A, S>>,
    Path(nr): Path<usize>,
) -> Result<GetResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let terrarium = state.terrarium.lock().await;
    let ruleset = terrarium.ruleset(nr)?.clone();
    Ok(GetResponse::Ok(Json(ruleset)))
}

/// `PUT /api/ruleset/:nr` (1-based)
pub async fn replace<A, S>(
    State(state): State<AppState<A, S>>,
    Path(nr): Path<usize>,
    Json(ruleset): Json<Ruleset>,
) -> Result<ReplaceResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.replace_ruleset(nr, ruleset)?;
    Ok(ReplaceResponse::NoContent)
}
