use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// `{message, ...}` response body. The status travels as the HTTP status only.
#[derive(Debug)]
pub struct ApiMessage {
    pub status: StatusCode,
    pub message: String,
    pub extra: Map<String, Value>,
}

impl ApiMessage {
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// 200 OK
    pub fn ok(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message)
    }

    /// 201 Created
    pub fn created(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, message)
    }

    /// Attach an extra top-level field next to `message`.
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response field '{}': {}", key, e);
                Value::Null
            }
        };
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({ "message": self.message });
        if let Value::Object(map) = &mut body {
            map.extend(self.extra.clone());
        }
        body
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        (self.status, Json(self.to_json())).into_response()
    }
}

pub type ApiResult = Result<ApiMessage, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_sit_beside_message() {
        let msg = ApiMessage::ok("request successful").field("movies", vec!["a", "b"]);
        assert_eq!(
            msg.to_json(),
            json!({ "message": "request successful", "movies": ["a", "b"] })
        );
        assert_eq!(msg.status, StatusCode::OK);
    }

    #[test]
    fn test_status_not_in_body() {
        let body = ApiMessage::created("user created successfully").to_json();
        assert!(body.get("status").is_none());
    }
}
