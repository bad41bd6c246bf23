pub mod jwt;
pub mod password;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub const ROLE_CANDIDATE: &str = "candidate";
pub const ROLE_EMPLOYER: &str = "employer";
pub const ROLE_ADMIN: &str = "admin";

/// Identity extracted from a Bearer token. `profile_id` is the key the rest
/// of the data model hangs off; `user_id` identifies the credentials row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_candidate(&self) -> bool {
        self.role == ROLE_CANDIDATE
    }

    pub fn is_employer(&self) -> bool {
        self.role == ROLE_EMPLOYER
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn require_candidate(&self) -> Result<(), AppError> {
        if self.is_candidate() {
            Ok(())
        } else {
            Err(AppError::forbidden("candidate role required"))
        }
    }

    pub fn require_employer(&self) -> Result<(), AppError> {
        if self.is_employer() {
            Ok(())
        } else {
            Err(AppError::forbidden("employer role required"))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("admin role required"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized())?;

        let claims = state
            .jwt
            .verify_token(bearer.token())
            .map_err(|_| AppError::unauthorized())?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            profile_id: claims.profile_id,
            role: claims.role,
        })
    }
}
