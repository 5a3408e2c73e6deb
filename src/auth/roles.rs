use crate::config::SuperAdmins;
use crate::database::models::user::ROLE_ADMIN;
use crate::database::IdentityStore;

use super::Principal;

pub struct RoleResolver<'a> {
    super_admins: &'a SuperAdmins,
    identity: &'a dyn IdentityStore,
}

impl<'a> RoleResolver<'a> {
    pub fn new(super_admins: &'a SuperAdmins, identity: &'a dyn IdentityStore) -> Self {
        Self {
            super_admins,
            identity,
        }
    }

    pub fn is_super_admin(&self, email: &str) -> bool {
        self.super_admins.contains(email)
    }

    /// Fails closed: any read error counts as "not an admin".
    pub async fn is_admin(&self, email: &str) -> bool {
        match self.identity.read_role(email).await {
            Ok(role) => role == ROLE_ADMIN,
            Err(e) => {
                tracing::error!("Failed to read role for {}: {}", email, e);
                false
            }
        }
    }

    pub async fn principal(&self, email: &str) -> Principal {
        Principal {
            email: email.to_string(),
            is_admin: self.is_admin(email).await,
            is_super_admin: self.is_super_admin(email),
        }
    }
}
