use crate::database::models::user::ROLE_ADMIN;
use crate::error::ApiError;

use super::Principal;

/// What a caller is asking to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateUser {
        role: String,
    },
    DeleteUser {
        target: String,
        /// Whether the caller's own identifier is the one stored for `target`.
        identifier_matches: bool,
    },
    CreateMovie,
    DeleteMovie,
    UpdateMovie,
    ListMovies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthenticated,
    Forbidden,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Unauthenticated => Err(ApiError::unauthenticated("Not Logged In, No Token")),
            Decision::Forbidden => Err(ApiError::Forbidden),
        }
    }
}

/// Decide whether `principal` may perform `action`. Pure; all store lookups
/// happen before this is called.
pub fn authorize(principal: Option<&Principal>, action: &Action) -> Decision {
    let Some(principal) = principal else {
        return Decision::Unauthenticated;
    };

    let allowed = match action {
        Action::CreateUser { role } => role != ROLE_ADMIN || principal.is_privileged(),
        Action::DeleteUser {
            target,
            identifier_matches,
        } => principal.is_privileged() || (*target == principal.email && *identifier_matches),
        Action::CreateMovie | Action::DeleteMovie | Action::UpdateMovie => principal.is_privileged(),
        Action::ListMovies => true,
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}
