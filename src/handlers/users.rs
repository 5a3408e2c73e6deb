use axum::{body::Bytes, extract::State, Extension};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::auth::{authorize, Action, Category, Principal, RequestIdentity};
use crate::database::models::user::{User, MAX_CREDENTIAL_LEN, ROLE_ADMIN, ROLE_USER};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, ApiResult};
use crate::state::AppState;

use super::decode_body;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveUserBody {
    #[serde(default)]
    pub email: String,
}

/// POST /v1/add/user
///
/// Anyone authenticated may create a plain user; creating an admin needs an
/// admin or super-admin caller. The permission check runs before field
/// validation.
pub async fn add(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Bytes,
) -> ApiResult {
    let identity = identity.require(Category::Users)?;
    let mut user: User = decode_body(&body)?;

    // Only look the caller up when the answer can change the outcome.
    let principal = if user.is_admin_role() {
        state.roles().principal(&identity.email).await
    } else {
        Principal::unprivileged(&identity.email)
    };
    authorize(Some(&principal), &Action::CreateUser { role: user.role.clone() }).into_result()?;

    if user.role.is_empty() {
        user.role = ROLE_USER.to_string();
    }
    validate_new_user(&user)?;

    user.created_at = chrono::Utc::now().timestamp();
    state.identity.insert_user(&user).await?;

    tracing::info!("{} created user {} with role {}", identity.email, user.email, user.role);
    Ok(ApiMessage::created("user created successfully"))
}

fn validate_new_user(user: &User) -> Result<(), ApiError> {
    if user.email.is_empty() || user.user_name.is_empty() || user.user_password.is_empty() || user.name.is_empty() {
        return Err(ApiError::validation("one or more fields missing in request body"));
    }
    if !is_valid_email(&user.email) {
        return Err(ApiError::validation("invalid email present in the request body"));
    }
    if user.user_name.len() > MAX_CREDENTIAL_LEN || user.user_password.len() > MAX_CREDENTIAL_LEN {
        return Err(ApiError::validation(
            "user_name and password has a max limit of 32 characters",
        ));
    }
    if user.role != ROLE_ADMIN && user.role != ROLE_USER {
        return Err(ApiError::validation("invalid role provided, valid roles: admin, user"));
    }
    Ok(())
}

/// DELETE /v1/remove/user
///
/// Admins and super-admins may delete anyone. Everyone else may only delete
/// the account they authenticated as.
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Bytes,
) -> ApiResult {
    let identity = identity.require(Category::Users)?;
    let body: RemoveUserBody = decode_body(&body)?;

    if body.email.is_empty() {
        return Err(ApiError::validation("one or more fields missing in request body"));
    }
    if !is_valid_email(&body.email) {
        return Err(ApiError::validation("invalid email present in the request body"));
    }

    let principal = state.roles().principal(&identity.email).await;
    let identifier_matches = if principal.is_privileged() {
        false
    } else {
        match state.identity.count_matching(&body.email, &identity.user_id).await {
            Ok(count) => count > 0,
            Err(e) => {
                tracing::error!("Failed to match {} against {}: {}", identity.user_id, body.email, e);
                false
            }
        }
    };

    let action = Action::DeleteUser {
        target: body.email.clone(),
        identifier_matches,
    };
    authorize(Some(&principal), &action).into_result()?;

    state.identity.delete_user(&body.email).await?;

    tracing::info!("{} deleted user {}", identity.email, body.email);
    Ok(ApiMessage::ok("user deleted successfully"))
}
