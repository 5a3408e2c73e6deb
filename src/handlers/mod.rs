// Request handlers for the /v1 API plus the unauthenticated health probe.
//
// Every /v1 handler runs behind `basic_auth_middleware` and receives the
// caller as an `Extension<RequestIdentity>`.

pub mod health;
pub mod movies;
pub mod users;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub use health::get as health_get;
pub use movies::{add as movie_add, get as movie_get, remove as movie_remove, update as movie_update};
pub use users::{add as user_add, remove as user_remove};

/// Decode a JSON request body. Any failure, including an empty body, is the
/// same client error.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!("decoding err: {}", e);
        ApiError::validation("Unable to decode request body")
    })
}

/// Reply for a known path hit with the wrong HTTP method.
pub fn method_not_allowed(allowed: &str) -> ApiError {
    ApiError::validation(format!("Invalid HTTP method, allowed {}", allowed))
}
