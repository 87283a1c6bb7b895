//! Axum extractors for the authenticated caller.
//!
//! All ownership and privilege decisions happen here and in the
//! handlers; the repositories never see the current caller.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use bookshelf_core::auth::decode_access_token;
use bookshelf_core::models::User;

use crate::{error::AppError, state::AppState};

/// The authenticated, active user making the request.
pub struct CurrentUser(pub User);

/// The authenticated user, additionally required to be a superuser.
pub struct Superuser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::InvalidCredentials)?;

        let claims = decode_access_token(token, state.auth.secret())
            .map_err(|_| AppError::InvalidCredentials)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)?;

        let user = state
            .users
            .get_user(user_id)
            .await?
            .ok_or(AppError::NotFound {
                entity_type: "User",
            })?;

        if !user.is_active {
            return Err(AppError::BadRequest("Inactive user".to_string()));
        }

        Ok(CurrentUser(user))
    }
}

impl FromRequestParts<AppState> for Superuser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            return Err(AppError::Forbidden);
        }
        Ok(Superuser(user))
    }
}
