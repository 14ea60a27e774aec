use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Error type shared by the encoders, the JSON response and the built-in views.
#[derive(Debug, Error)]
pub enum JsonableError {
    /// The value reached the end of the encoder chain without a rule for it.
    #[error("Object of type {0} is not JSON serializable")]
    Unserializable(&'static str),

    /// `JsonResponse` in safe mode was given something other than an object.
    #[error("In order to allow non-object values to be serialized set the safe parameter to false")]
    NonObject,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl JsonableError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            JsonableError::BadRequest(_) => StatusCode::BAD_REQUEST,
            JsonableError::Unserializable(_)
            | JsonableError::NonObject
            | JsonableError::Json(_)
            | JsonableError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            JsonableError::Unserializable(_) => "UNSERIALIZABLE",
            JsonableError::NonObject => "NON_OBJECT",
            JsonableError::Json(_) => "JSON_ERROR",
            JsonableError::BadRequest(_) => "BAD_REQUEST",
            JsonableError::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Error detail for framework error bodies.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

impl axum::response::IntoResponse for JsonableError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };

        match serde_json::to_vec(&body) {
            Ok(bytes) => (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                bytes,
            )
                .into_response(),
            Err(_) => (status, "Internal Server Error").into_response(),
        }
    }
}
