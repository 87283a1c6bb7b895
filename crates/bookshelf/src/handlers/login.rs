use axum::{extract::State, Form, Json};
use serde::Deserialize;

use bookshelf_core::auth::{create_access_token, verify_password};

use crate::{
    error::AppError,
    extract::CurrentUser,
    models::{Token, UserPublic},
    state::AppState,
};

/// OAuth2-compatible password form: `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// OAuth2 compatible token login (POST /login/access-token).
pub async fn login_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Token>, AppError> {
    let user = state
        .users
        .get_user_by_email(&form.username)
        .await?
        .filter(|user| verify_password(&form.password, &user.hashed_password))
        .ok_or_else(|| AppError::BadRequest("Incorrect email or password".to_string()))?;

    if !user.is_active {
        return Err(AppError::BadRequest("Inactive user".to_string()));
    }

    let token = create_access_token(user.id, state.auth.secret(), state.auth.token_ttl())
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(user_id = %user.id, "issued access token");

    Ok(Json(Token::bearer(token)))
}

/// Test access token (POST /login/test-token).
pub async fn test_token(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(user.into())
}
