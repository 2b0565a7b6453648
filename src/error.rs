use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{Value, json};
use thiserror::Error;

/// Error half of every route's `Result`. Rendered as `{"success": false, "error": ...}`.
pub type ApiResult<T> = Result<Json<T>, (Status, Json<Value>)>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("You must be logged in to do this.")]
    Unauthenticated,
    #[error("User does not have the permissions required for this action [{0}]")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Rate limited: max {limit} requests per {window_secs}s")]
    RateLimited {
        limit: usize,
        window_secs: u64,
        retry_after_secs: u64,
    },
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::Unauthenticated => Status::Unauthorized,
            ApiError::Forbidden(_) => Status::Forbidden,
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::RateLimited { .. } => Status::TooManyRequests,
            ApiError::Database(_) => Status::InternalServerError,
        }
    }
}

impl From<ApiError> for (Status, Json<Value>) {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        match &err {
            ApiError::Database(e) => tracing::error!(error = %e, "storage failure"),
            other => tracing::debug!(status = status.code, error = %other, "request rejected"),
        }
        let body = match &err {
            ApiError::RateLimited {
                limit,
                retry_after_secs,
                ..
            } => json!({
                "success": false,
                "error": err.to_string(),
                "limit": limit,
                "remaining": 0,
                "retry_after_secs": retry_after_secs,
            }),
            _ => json!({"success": false, "error": err.to_string()}),
        };
        (status, Json(body))
    }
}

/// Startup failures, propagated out of [`crate::rocket_with_config`].
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to prepare database at {path}: {source}")]
    Database {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CORS configuration: {0}")]
    Cors(#[from] rocket_cors::Error),
}
