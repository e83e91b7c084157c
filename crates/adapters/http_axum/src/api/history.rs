//! JSON REST handlers for recorded trace files.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};
use terra_app::trace::TraceKind;

use crate::error::ApiError;
use crate::state::AppState;

fn parse_kind(kind: &str) -> Result<TraceKind, ApiError> {
    match kind {
        "state" => Ok(TraceKind::State),
        "temperature" => Ok(TraceKind::Temperature),
        other => Err(ApiError::not_found(format!(
            "unknown history kind: {other}"
        ))),
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<String>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the file endpoint. Trace files are line-oriented
/// text, not JSON.
pub enum FileResponse {
    Ok(String),
}

impl IntoResponse for FileResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(content) => content.into_response(),
        }
    }
}

/// `GET /api/history/:kind`
pub async fn list<A, S>(
    State(state): State<AppState<A, S>>,
    Path(kind): Path<String>,
) -> Result<ListResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let kind = parse_kind(&kind)?;
    let terrarium = state.terrarium.lock().await;
    let files = terrarium.trace_files(kind)?;
    Ok(ListResponse::Ok(Json(files)))
}

/// `GET /api/history/:kind/:name`
pub async fn file<A, S>(
    State(state): State<AppState<A, S>>,
    Path((kind, name)): Path<(String, String)>,
) -> Result<FileResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let kind = parse_kind(&kind)?;
    let terrarium = state.terrarium.lock().await;
    let content = terrarium.trace_file(kind, &name)?;
    Ok(FileResponse::Ok(content))
}
