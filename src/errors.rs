use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the record operations. The breakdown engine itself never
/// fails.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("{0}")]
    Validation(String),

    #[error("counter '{0}' not found")]
    NotFound(String),

    #[error("invalid import: {0}")]
    InvalidImport(String),

    #[error("unparseable anchor instant '{0}'")]
    InvalidAnchor(String),

    #[error("invalid counter data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn confirmation_required() -> Self {
        Self {
            status: StatusCode::PRECONDITION_REQUIRED,
            message: "confirmation required: repeat the request with confirm=true".to_string(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<CounterError> for AppError {
    fn from(err: CounterError) -> Self {
        match err {
            CounterError::NotFound(_) => Self::not_found(err.to_string()),
            CounterError::Validation(_)
            | CounterError::InvalidImport(_)
            | CounterError::InvalidAnchor(_)
            | CounterError::Json(_) => Self::bad_request(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
