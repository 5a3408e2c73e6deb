use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::models::User;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no account matches the given credentials")]
    NotFound,

    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Which unique constraint a rejected insert ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    DuplicateEmail,
    DuplicateIdentifier,
}

impl ConflictKind {
    /// Map a Postgres constraint name from `imdb.users` to its conflict kind.
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_pkey" => Some(ConflictKind::DuplicateEmail),
            "users_user_id_key" => Some(ConflictKind::DuplicateIdentifier),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum InsertUserError {
    #[error("conflict: {0:?}")]
    Conflict(ConflictKind),

    #[error(transparent)]
    Store(#[from] IdentityError),
}

impl From<sqlx::Error> for InsertUserError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                if let Some(kind) = db.constraint().and_then(ConflictKind::from_constraint) {
                    return InsertUserError::Conflict(kind);
                }
            }
        }
        InsertUserError::Store(IdentityError::Sqlx(err))
    }
}

/// Relational store of accounts, roles and credentials.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Email of the account whose identifier and secret both match exactly.
    async fn resolve_email(&self, user_id: &str, password: &str) -> Result<String, IdentityError>;

    /// Role column of the account with this email.
    async fn read_role(&self, email: &str) -> Result<String, IdentityError>;

    /// Number of accounts with this email and identifier.
    async fn count_matching(&self, email: &str, user_id: &str) -> Result<i64, IdentityError>;

    async fn insert_user(&self, user: &User) -> Result<(), InsertUserError>;

    async fn delete_user(&self, email: &str) -> Result<(), IdentityError>;

    async fn ping(&self) -> Result<(), IdentityError>;
}

pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn resolve_email(&self, user_id: &str, password: &str) -> Result<String, IdentityError> {
        sqlx::query_scalar::<_, String>(
            "SELECT email FROM imdb.users WHERE user_id = $1 AND user_password = $2",
        )
        .bind(user_id)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(IdentityError::NotFound)
    }

    async fn read_role(&self, email: &str) -> Result<String, IdentityError> {
        let role = sqlx::query_scalar::<_, Option<String>>("SELECT role FROM imdb.users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(IdentityError::NotFound)?;
        Ok(role.unwrap_or_default())
    }

    async fn count_matching(&self, email: &str, user_id: &str) -> Result<i64, IdentityError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM imdb.users WHERE email = $1 AND user_id = $2",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn insert_user(&self, user: &User) -> Result<(), InsertUserError> {
        sqlx::query(
            r#"
            INSERT INTO imdb.users (email, name, created_at, user_id, user_password, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.created_at)
        .bind(&user.user_name)
        .bind(&user.user_password)
        .bind(&user.role)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_user(&self, email: &str) -> Result<(), IdentityError> {
        sqlx::query("DELETE FROM imdb.users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), IdentityError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
