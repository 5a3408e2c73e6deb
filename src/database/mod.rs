pub mod identity;
pub mod manager;
pub mod models;

pub use identity::{ConflictKind, IdentityError, IdentityStore, InsertUserError, PgIdentityStore};
pub use manager::{DatabaseError, DatabaseManager};
