use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failures of the itinerary core.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    /// A call against the schedule/flights tables reported an error.
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] sqlx::Error),

    /// A stored or submitted value did not have the expected shape (e.g. `HH:MM`).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The entry exists only as a projection of a flight record.
    #[error("entry {0} is derived from a flight and cannot be changed")]
    NotEditable(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("photo storage failure: {0}")]
    Storage(#[from] std::io::Error),
}

/// Error type returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Trip(#[from] TripError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("photo storage is not configured")]
    StorageUnavailable,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Trip(err) => match err {
                TripError::PersistenceFailure(e) => {
                    tracing::debug!(error = %e, "answering with a persistence failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "PERSISTENCE_FAILURE",
                        "could not save changes, try again".to_string(),
                    )
                }
                TripError::InvalidFormat(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_FORMAT", err.to_string())
                }
                TripError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                TripError::NotEditable(_) => {
                    (StatusCode::BAD_REQUEST, "NOT_EDITABLE", err.to_string())
                }
                TripError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                TripError::Storage(e) => {
                    tracing::error!(error = %e, "photo storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_FAILURE",
                        "upload failed".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::StorageUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_UNAVAILABLE",
                self.to_string(),
            ),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
