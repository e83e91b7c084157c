//! JSON REST handlers for switching trace recording.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the trace switch endpoints.
pub enum SwitchResponse {
    NoContent,
}

impl IntoResponse for SwitchResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/trace/on`
pub async fn switch_on<A, S>(
    State(state): State<AppState<A, S>>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_trace(true);
    Ok(SwitchResponse::NoContent)
}

/// `POST /api/trace/off`
pub async fn switch_off<A, S>(
    State(state): State<AppState<A, S>>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_trace(false);
    Ok(SwitchResponse::NoContent)
}
