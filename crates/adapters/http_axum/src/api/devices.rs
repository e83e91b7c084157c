//! JSON REST handlers for manual device control.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use terra_app::ports::{ActuatorDriver, SensorReader};
use terra_domain::state::OnPeriod;
use terra_domain::time::epoch_seconds;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the switch endpoints.
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

/// `PUT /api/device/:device/on`
pub async fn switch_on<A, S>(
    State(state): State<AppState<A, S>>,
    Path(device): Path<String>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_device_on(&device, OnPeriod::Indefinite)?;
    Ok(SwitchResponse::NoContent)
}

/// `PUT /api/device/:device/on/:seconds`
///
/// The end time is computed against the controller clock, not the wall
/// clock, so a simulated run keeps consistent end times.
pub async fn switch_on_for<A, S>(
    State(state): State<AppState<A, S>>,
    Path((device, seconds)): Path<(String, i64)>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    let end = epoch_seconds(terrarium.now()) + seconds;
    terrarium.set_device_on(&device, OnPeriod::Until(end))?;
    Ok(SwitchResponse::NoContent)
}

/// `PUT /api/device/:device/off`
pub async fn switch_off<A, S>(
    State(state): State<AppState<A, S>>,
    Path(device): Path<String>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_device_off(&device)?;
    Ok(SwitchResponse::NoContent)
}

/// `PUT /api/device/:device/manual`
pub async fn set_manual<A, S>(
    State(state): State<AppState<A, S>>,
    Path(device): Path<String>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_device_manual(&device, true)?;
    Ok(SwitchResponse::NoContent)
}

/// `PUT /api/device/:device/auto`
pub async fn set_auto<A, S>(
    State(state): State<AppState<A, S>>,
    Path(device): Path<String>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_device_manual(&device, false)?;
    Ok(SwitchResponse::NoContent)
}

/// `POST /api/counter/:device/:value`
pub async fn set_counter<A, S>(
    State(state): State<AppState<A, S>>,
    Path((device, value)): Path<(String, i32)>,
) -> Result<SwitchResponse, ApiError>
where
    A: ActuatorDriver + Send + 'static,
    S: SensorReader + Send + 'static,
{
    let mut terrarium = state.terrarium.lock().await;
    terrarium.set_lifecycle_counter(&device, value)?;
    Ok(SwitchResponse::NoContent)
}
