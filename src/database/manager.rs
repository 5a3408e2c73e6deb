use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, SecurityConfig};

/// Errors raised while bringing the identity store up.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_SCHEMA: &str = "CREATE SCHEMA IF NOT EXISTS imdb";

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS imdb.users (
        email VARCHAR(500) NOT NULL,
        name TEXT NOT NULL,
        created_at BIGINT NOT NULL,
        user_password VARCHAR(32) NOT NULL,
        user_id VARCHAR(32) NOT NULL,
        role VARCHAR(6) NOT NULL,
        CONSTRAINT users_pkey PRIMARY KEY (email),
        CONSTRAINT users_user_id_key UNIQUE (user_id)
    )
"#;

const SEED_ADMIN: &str = r#"
    INSERT INTO imdb.users (email, name, created_at, user_password, user_id, role)
    VALUES ($1, 'auto created', $2, $3, $4, 'admin')
    ON CONFLICT DO NOTHING
"#;

/// Owns pool construction and the one-time schema bootstrap.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        url::Url::parse(&config.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.url)
            .await?;

        info!("Created identity store pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Create the `imdb` schema and users table, then seed the first
    /// super-admin when bootstrap credentials are configured.
    pub async fn bootstrap(pool: &PgPool, security: &SecurityConfig) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;
        sqlx::query(CREATE_SCHEMA).execute(&mut *tx).await?;
        sqlx::query(CREATE_USERS).execute(&mut *tx).await?;
        tx.commit().await?;

        if let (Some(seed), Some(email)) = (&security.bootstrap_admin, security.super_admins.first()) {
            let inserted = sqlx::query(SEED_ADMIN)
                .bind(email)
                .bind(chrono::Utc::now().timestamp())
                .bind(&seed.password)
                .bind(&seed.user_id)
                .execute(pool)
                .await?
                .rows_affected();
            if inserted > 0 {
                info!("Seeded super-admin account for {}", email);
            }
        }

        info!("Identity store schema ready");
        Ok(())
    }
}
