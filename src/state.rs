use std::sync::Arc;

use crate::auth::RoleResolver;
use crate::config::AppConfig;
use crate::database::IdentityStore;
use crate::search::SearchIndex;

/// Everything a request needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityStore>,
    pub index: Arc<dyn SearchIndex>,
}

impl AppState {
    pub fn new(config: AppConfig, identity: Arc<dyn IdentityStore>, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            config: Arc::new(config),
            identity,
            index,
        }
    }

    pub fn roles(&self) -> RoleResolver<'_> {
        RoleResolver::new(&self.config.security.super_admins, self.identity.as_ref())
    }
}
