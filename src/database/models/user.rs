use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Maximum length of `user_name` and `user_password`, fixed by the column widths.
pub const MAX_CREDENTIAL_LEN: usize = 32;

/// Body of `POST /v1/add/user`, and the row written to `imdb.users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_password: String,
}

impl User {
    pub fn is_admin_role(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
