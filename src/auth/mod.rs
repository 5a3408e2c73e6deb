pub mod credentials;
pub mod policy;
pub mod roles;

pub use credentials::{resolve_email, BasicCredentials};
pub use policy::{authorize, Action, Decision};
pub use roles::RoleResolver;

use crate::error::ApiError;

/// Resolved identity and role set of the caller, rebuilt for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

impl Principal {
    /// A principal whose roles have not been looked up. Only suitable for
    /// actions every authenticated caller may perform.
    pub fn unprivileged(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_admin: false,
            is_super_admin: false,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.is_admin || self.is_super_admin
    }
}

/// Account category a request was authenticated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Users,
}

/// Attached to each request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub email: String,
    /// Identifier the caller authenticated with.
    pub user_id: String,
    pub category: Category,
}

impl RequestIdentity {
    pub fn users(email: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_id: user_id.into(),
            category: Category::Users,
        }
    }

    pub fn require(&self, category: Category) -> Result<&Self, ApiError> {
        if self.category == category {
            Ok(self)
        } else {
            Err(ApiError::unauthenticated("Unauthorized"))
        }
    }
}
