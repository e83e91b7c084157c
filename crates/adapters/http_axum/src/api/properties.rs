//! JSON REST handlers for the unit description and the live device state.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the properties endpoint.
pub enum PropertiesResponse {
    Ok(Json<serde_json::Value>),
}

impl IntoResponse for PropertiesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the state endpoint.
pub enum StateResponse {
    Ok(Json<serde_json::Value>),
}

impl IntoResponse for StateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/properties`
pub async fn properties<A, S>(
    State(state): State<AppState<A, S>>,
) -> Result<PropertiesResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let terrarium = state.terrarium.lock().await;
    Ok(PropertiesResponse::Ok(Json(terrarium.properties())))
}

/// `GET /api/state`
pub async fn state<A, S>(State(state): State<AppState<A, S>>) -> Result<StateResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let terrarium = state.terrarium.lock().await;
    Ok(StateResponse::Ok(Json(terrarium.state_snapshot())))
}
