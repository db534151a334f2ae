use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Errors surfaced at the HTTP boundary. Everything inside the engine
/// itself is logged and swallowed instead (see `dispatcher`).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("no players provided")]
    InvalidArgument,

    #[error("matchmaking engine is shutting down")]
    Unavailable,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::InvalidArgument => StatusCode::BAD_REQUEST,
            ServiceError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
