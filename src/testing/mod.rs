use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::config::{
    ApiConfig, AppConfig, DatabaseConfig, Environment, LogLevel, SearchConfig, SecurityConfig, SuperAdmins,
};
use crate::database::{ConflictKind, IdentityError, IdentityStore, InsertUserError};
use crate::database::models::User;
use crate::search::{IndexError, Movie, SearchHit, SearchIndex, SearchRequest};
use crate::state::AppState;

/// Identity store held in memory, with the same uniqueness rules as `imdb.users`.
#[derive(Default)]
pub struct MemoryIdentityStore {
    users: Mutex<Vec<User>>,
    failing: bool,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, email: &str, user_id: &str, password: &str, role: &str) -> Self {
        self.users.get_mut().unwrap().push(User {
            email: email.to_string(),
            name: email.to_string(),
            role: role.to_string(),
            created_at: 0,
            user_name: user_id.to_string(),
            user_password: password.to_string(),
        });
        self
    }

    /// Make every call fail as if the database were unreachable.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), IdentityError> {
        if self.failing {
            Err(IdentityError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn resolve_email(&self, user_id: &str, password: &str) -> Result<String, IdentityError> {
        self.check()?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_name == user_id && u.user_password == password)
            .map(|u| u.email.clone())
            .ok_or(IdentityError::NotFound)
    }

    async fn read_role(&self, email: &str) -> Result<String, IdentityError> {
        self.check()?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.role.clone())
            .ok_or(IdentityError::NotFound)
    }

    async fn count_matching(&self, email: &str, user_id: &str) -> Result<i64, IdentityError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| u.email == email && u.user_name == user_id).count() as i64)
    }

    async fn insert_user(&self, user: &User) -> Result<(), InsertUserError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(InsertUserError::Conflict(ConflictKind::DuplicateEmail));
        }
        if users.iter().any(|u| u.user_name == user.user_name) {
            return Err(InsertUserError::Conflict(ConflictKind::DuplicateIdentifier));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn delete_user(&self, email: &str) -> Result<(), IdentityError> {
        self.check()?;
        self.users.lock().unwrap().retain(|u| u.email != email);
        Ok(())
    }

    async fn ping(&self) -> Result<(), IdentityError> {
        self.check()
    }
}

/// Search index held in memory. `search` ignores the query and pages over
/// stored documents in insertion order, remembering the last request.
#[derive(Default)]
pub struct MemorySearchIndex {
    docs: Mutex<Vec<(String, Value)>>,
    last_search: Mutex<Option<SearchRequest>>,
    next_id: Mutex<u64>,
    failing: bool,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, id: &str, source: Value) -> Self {
        self.docs.get_mut().unwrap().push((id.to_string(), source));
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn documents(&self) -> Vec<(String, Value)> {
        self.docs.lock().unwrap().clone()
    }

    pub fn last_search(&self) -> Option<SearchRequest> {
        self.last_search.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), IndexError> {
        if self.failing {
            Err(IndexError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "cluster unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn index(&self, movie: &Movie) -> Result<String, IndexError> {
        self.check()?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("doc-{}", next)
        };
        let source = serde_json::to_value(movie.document())?;
        self.docs.lock().unwrap().push((id.clone(), source));
        Ok(id)
    }

    async fn update(&self, id: &str, movie: &Movie) -> Result<(), IndexError> {
        self.check()?;
        let document = serde_json::to_value(movie.document())?;
        let mut docs = self.docs.lock().unwrap();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, source)) => {
                *source = document;
                Ok(())
            }
            None => Err(IndexError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                body: format!("document missing: {}", id),
            }),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), IndexError> {
        self.check()?;
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        if docs.len() == before {
            return Err(IndexError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                body: format!("document missing: {}", id),
            });
        }
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, IndexError> {
        self.check()?;
        *self.last_search.lock().unwrap() = Some(request.clone());
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .skip(request.pagination.from)
            .take(request.pagination.size)
            .map(|(id, source)| SearchHit {
                id: id.clone(),
                source: source.clone(),
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), IndexError> {
        self.check()
    }
}

pub fn test_config(super_admins: &str) -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        database: DatabaseConfig {
            url: "postgres://localhost/imdb".to_string(),
            max_connections: 1,
            max_lifetime_secs: 60,
        },
        search: SearchConfig {
            elastic_url: "http://localhost:9200".to_string(),
            movie_index: "movies".to_string(),
        },
        security: SecurityConfig {
            super_admins: SuperAdmins::parse(super_admins),
            bootstrap_admin: None,
        },
        api: ApiConfig {
            bind_addr: "127.0.0.1:0".to_string(),
        },
        log_level: LogLevel::Error,
    }
}

pub fn test_state(identity: Arc<MemoryIdentityStore>, index: Arc<MemorySearchIndex>) -> AppState {
    AppState::new(test_config("root@example.com"), identity, index)
}
