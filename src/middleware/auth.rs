use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{resolve_email, BasicCredentials, RequestIdentity};
use crate::database::IdentityError;
use crate::error::ApiError;
use crate::state::AppState;

/// Basic authentication middleware that resolves credentials to an account
/// email and attaches a [`RequestIdentity`] for the handlers.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = BasicCredentials::from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthenticated("Not Logged In, No Token"))?;

    let email = match resolve_email(state.identity.as_ref(), &credentials).await {
        Ok(email) if !email.is_empty() => email,
        Ok(_) | Err(IdentityError::NotFound) => {
            tracing::warn!("Rejected credentials for user_name {}", credentials.user_id);
            return Err(ApiError::unauthenticated("Unauthorized"));
        }
        Err(e) => {
            tracing::error!("Credential lookup failed for {}: {}", credentials.user_id, e);
            return Err(ApiError::unauthenticated("Unauthorized"));
        }
    };

    tracing::debug!("Authenticated {} as {}", credentials.user_id, email);
    request
        .extensions_mut()
        .insert(RequestIdentity::users(email, credentials.user_id));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, MemoryIdentityStore, MemorySearchIndex};
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn whoami(Extension(identity): Extension<RequestIdentity>) -> String {
        format!("{}|{}", identity.email, identity.user_id)
    }

    fn router(identity: MemoryIdentityStore) -> Router {
        let state = test_state(Arc::new(identity), Arc::new(MemorySearchIndex::new()));
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(state.clone(), basic_auth_middleware))
            .with_state(state)
    }

    fn request(auth: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(raw) = auth {
            builder = builder.header(AUTHORIZATION, format!("Basic {}", STANDARD.encode(raw)));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_credentials_attach_identity() {
        let store = MemoryIdentityStore::new().with_user("a@example.com", "alice", "secret", "user");
        let response = router(store).oneshot(request(Some("alice:secret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "a@example.com|alice");
    }

    #[tokio::test]
    async fn test_missing_header_is_not_logged_in() {
        let response = router(MemoryIdentityStore::new()).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Not Logged In, No Token"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let store = MemoryIdentityStore::new().with_user("a@example.com", "alice", "secret", "user");
        let response = router(store).oneshot(request(Some("alice:nope"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, r#"{"message":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn test_empty_email_is_unauthorized() {
        let store = MemoryIdentityStore::new().with_user("", "usr", "usrpw", "user");
        let response = router(store).oneshot(request(Some("usr:usrpw"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // whoami would have answered "|usr"
        assert_eq!(body_text(response).await, r#"{"message":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn test_store_failure_is_unauthorized() {
        let store = MemoryIdentityStore::new()
            .with_user("a@example.com", "alice", "secret", "user")
            .failing();
        let response = router(store).oneshot(request(Some("alice:secret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Unauthorized"));
    }
}
