//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use terra_domain::error::TerraError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps failures to an HTTP response with the appropriate status code.
pub enum ApiError {
    Domain(TerraError),
    NotFound(String),
}

impl ApiError {
    /// A plain 404 for resources without a domain error, such as an unknown
    /// trace-file kind.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<TerraError> for ApiError {
    fn from(err: TerraError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Domain(err) => match &err {
                TerraError::UnknownDevice(_) => (StatusCode::NOT_FOUND, err.to_string()),
                TerraError::UnknownRuleset(_) | TerraError::InvalidTimeOfDay(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                TerraError::Storage(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                TerraError::Storage(_) | TerraError::Settings(_) => {
                    tracing::error!(error = %err, "storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
