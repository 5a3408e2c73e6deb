use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::database::{IdentityError, IdentityStore};

/// `(identifier, secret)` pair from an HTTP Basic Authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub user_id: String,
    pub password: String,
}

// Keep the secret out of logs.
impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicCredentials {
    /// `None` when the header is absent or is not well-formed Basic auth.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        Self::parse(value)
    }

    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user_id, password) = decoded.split_once(':')?;
        Some(Self {
            user_id: user_id.to_string(),
            password: password.to_string(),
        })
    }
}

/// Look up the email of the account these credentials belong to.
///
/// The stored secret is compared verbatim; no hashing happens at this layer.
pub async fn resolve_email(
    identity: &dyn IdentityStore,
    credentials: &BasicCredentials,
) -> Result<String, IdentityError> {
    identity
        .resolve_email(&credentials.user_id, &credentials.password)
        .await
}
