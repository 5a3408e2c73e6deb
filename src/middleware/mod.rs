pub mod auth;
pub mod response;

pub use auth::basic_auth_middleware;
pub use response::{ApiMessage, ApiResult};
