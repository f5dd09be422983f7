use axum::{
    Json,
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// AppError
///
/// The single failure type that flows from the repository, through the services, up to the
/// handlers. Every variant carries a short, human-readable message; `IntoResponse` turns it
/// into the `{"message": ...}` body the clients expect.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, malformed, forged or expired bearer token.
    #[error("{0}")]
    Unauthenticated(String),

    /// The token verified, but its subject no longer exists.
    #[error("User not found")]
    UnknownIdentity,

    /// A required input field is missing or empty.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    NotFound(String),

    /// The resource exists but belongs to another identity.
    #[error("Invalid User ID")]
    Forbidden,

    /// Email or username already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UploadFailed(String),

    /// A stored foreign key points at a row that is gone.
    #[error("{0}")]
    DanglingReference(String),

    /// Configuration or signing-key failure. Not recoverable per request.
    #[error("{0}")]
    Fatal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// status_code
    ///
    /// The HTTP status each failure class translates to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) | AppError::UnknownIdentity => StatusCode::UNAUTHORIZED,
            AppError::ValidationFailed(_)
            | AppError::NotFound(_)
            | AppError::Forbidden
            | AppError::Conflict(_)
            | AppError::UploadFailed(_)
            | AppError::DanglingReference(_) => StatusCode::BAD_REQUEST,
            AppError::Fatal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Infrastructure causes are logged, never echoed.
            AppError::Fatal(msg) => {
                tracing::error!("fatal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationFailed(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::ValidationFailed("Parameter must be a valid ID".to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::ValidationFailed(err.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
