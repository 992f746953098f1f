//! JSON API handlers.

pub mod connections;
pub mod matches;
pub mod profile;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::DbLockError;
use crate::matching::{DataAccessError, MatchError};
use crate::validation::ValidationError;

pub use connections::*;
pub use matches::*;
pub use profile::*;
pub use users::*;

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors a handler can return
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Unauthorized => write!(f, "Not logged in"),
            ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", e))
    }
}

impl From<DbLockError> for ApiError {
    fn from(e: DbLockError) -> Self {
        DataAccessError::from(e).into()
    }
}

impl From<DataAccessError> for ApiError {
    fn from(e: DataAccessError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<MatchError> for ApiError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::UnknownUser(email) => ApiError::NotFound(format!("No user with email {}", email)),
            MatchError::DataAccess(e) => e.into(),
        }
    }
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}
