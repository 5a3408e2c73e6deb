// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::{ConflictKind, IdentityError, InsertUserError};
use crate::search::{IndexError, MapError, QueryError};

/// Everything a handler can fail with, mapped onto the wire statuses clients rely on.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(String),
    Conflict(ConflictKind),

    // 401 Unauthorized
    Unauthenticated(String),
    // Also 401: callers cannot tell "who are you" from "not allowed" on the wire.
    Forbidden,

    // 500 Internal Server Error, body carries the upstream text verbatim
    Upstream(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::Forbidden => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg) => msg,
            ApiError::Conflict(ConflictKind::DuplicateEmail) => "User already exists",
            ApiError::Conflict(ConflictKind::DuplicateIdentifier) => "user_name not unique",
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Forbidden => "Not Authorized",
            ApiError::Upstream(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "message": self.message() })
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        tracing::error!("identity store error: {}", err);
        ApiError::Upstream(err.to_string())
    }
}

impl From<InsertUserError> for ApiError {
    fn from(err: InsertUserError) -> Self {
        match err {
            InsertUserError::Conflict(kind) => ApiError::Conflict(kind),
            InsertUserError::Store(e) => e.into(),
        }
    }
}

impl From<IndexError> for ApiError {
    fn from(err: IndexError) -> Self {
        tracing::error!("search index error: {}", err);
        ApiError::Upstream(err.to_string())
    }
}

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        tracing::error!("{}", err);
        ApiError::Upstream(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
