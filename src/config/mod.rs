use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} env var not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub security: SecurityConfig,
    pub api: ApiConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub max_lifetime_secs: u64,
}

// The DSN may embed a password.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("<redacted>"));
            }
            url.into()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub elastic_url: String,
    pub movie_index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub super_admins: SuperAdmins,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the account seeded at startup for the first super-admin.
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub user_id: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
}

/// Verbosity accepted by `LOG_LEVEL`. Anything unrecognised falls back to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Debug,
    Error,
}

impl LogLevel {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "INFO" => LogLevel::Info,
            "DEBUG" => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Error => "error",
        }
    }
}

/// Emails that always hold administrative rights, fixed for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperAdmins(HashSet<String>);

impl SuperAdmins {
    /// Parse a comma-separated allowlist, trimming entries and skipping empty ones.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.contains(email)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lexicographically smallest entry, used to pick the seeded account.
    pub fn first(&self) -> Option<&str> {
        self.0.iter().map(String::as_str).min()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let environment = match var("IMDB_ENV").as_deref() {
            Some("PRODUCTION") => Environment::Production,
            _ => Environment::Development,
        };

        let url = match var("DATABASE_URL") {
            Some(url) => url,
            None => build_database_url(
                &require("SQL_HOST")?,
                &require("SQL_USER")?,
                &require("SQL_PASSWORD")?,
                &require("SQL_DB")?,
            )?,
        };

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value: v,
            })?,
            None => 100,
        };

        let super_admins = SuperAdmins::parse(&require("SUPER_ADMINS")?);
        if super_admins.is_empty() {
            return Err(ConfigError::Missing("SUPER_ADMINS"));
        }

        let bootstrap_admin = match (var("BOOTSTRAP_ADMIN_USER_ID"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(user_id), Some(password)) => Some(BootstrapAdmin { user_id, password }),
            _ => None,
        };

        Ok(Self {
            environment,
            database: DatabaseConfig {
                url,
                max_connections,
                max_lifetime_secs: 10 * 60,
            },
            search: SearchConfig {
                elastic_url: require("ELASTIC_URL")?.trim_end_matches('/').to_string(),
                movie_index: var("MOVIE_INDEX").unwrap_or_else(|| "movies".to_string()),
            },
            security: SecurityConfig {
                super_admins,
                bootstrap_admin,
            },
            api: ApiConfig {
                bind_addr: var("IMDB_API_BIND").unwrap_or_else(|| "127.0.0.1:8000".to_string()),
            },
            log_level: var("LOG_LEVEL")
                .map(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Error),
        })
    }
}

fn build_database_url(host: &str, user: &str, password: &str, db: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse("postgres://localhost").map_err(|_| ConfigError::Invalid {
        name: "SQL_HOST",
        value: host.to_string(),
    })?;
    url.set_host(Some(host)).map_err(|_| ConfigError::Invalid {
        name: "SQL_HOST",
        value: host.to_string(),
    })?;
    url.set_username(user).map_err(|_| ConfigError::Invalid {
        name: "SQL_USER",
        value: user.to_string(),
    })?;
    url.set_password(Some(password)).map_err(|_| ConfigError::Invalid {
        name: "SQL_PASSWORD",
        value: "<redacted>".to_string(),
    })?;
    url.set_path(&format!("/{}", db));
    url.query_pairs_mut().append_pair("sslmode", "disable");
    Ok(url.into())
}
