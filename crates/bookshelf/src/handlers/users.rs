use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use bookshelf_core::auth::{hash_password, verify_password};
use bookshelf_core::models::{validate_email, User};
use bookshelf_core::storage::{RepositoryError, UserPatch};

use crate::{
    error::AppError,
    extract::{CurrentUser, Superuser},
    models::{
        ListParams, Message, UpdatePassword, UserCreate, UserPublic, UserRegister, UserUpdate,
        UserUpdateMe, UsersPublic,
    },
    state::AppState,
};

fn check_email(email: &str) -> Result<(), AppError> {
    validate_email(email).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 40 {
        return Err(AppError::BadRequest(
            "Password must be between 8 and 40 characters".to_string(),
        ));
    }
    Ok(())
}

/// Fails with a conflict if the email is already registered.
///
/// The store does not enforce uniqueness on a non-key attribute, so this
/// index lookup before every insert and email change is the only guard.
async fn ensure_email_free(state: &AppState, email: &str) -> Result<(), AppError> {
    if state.users.get_user_by_email(email).await?.is_some() {
        return Err(RepositoryError::AlreadyExists {
            entity_type: "User",
            id: email.to_string(),
        }
        .into());
    }
    Ok(())
}

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| AppError::Internal(e.into()))
}

/// Retrieve users (GET /users, superuser only).
pub async fn list_users(
    State(state): State<AppState>,
    Superuser(_): Superuser,
    Query(params): Query<ListParams>,
) -> Result<Json<UsersPublic>, AppError> {
    let users = state.users.list_users(params.limit).await?;
    Ok(Json(UsersPublic::from_users(params.paginate(users))))
}

/// Create a user (POST /users, superuser only).
pub async fn create_user(
    State(state): State<AppState>,
    Superuser(_): Superuser,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    check_email(&payload.email)?;
    check_password(&payload.password)?;
    ensure_email_free(&state, &payload.email).await?;

    let hashed = hash(&payload.password)?;
    let mut user = User::new(payload.email, hashed);
    user.is_active = payload.is_active;
    user.is_superuser = payload.is_superuser;
    user.full_name = payload.full_name;

    state.users.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "created user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Register a user without being logged in (POST /users/signup).
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<UserRegister>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    check_email(&payload.email)?;
    check_password(&payload.password)?;
    ensure_email_free(&state, &payload.email).await?;

    let hashed = hash(&payload.password)?;
    let mut user = User::new(payload.email, hashed);
    user.full_name = payload.full_name;

    state.users.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "registered user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get the current user (GET /users/me).
pub async fn read_user_me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(user.into())
}

/// Update own profile (PATCH /users/me).
pub async fn update_user_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UserUpdateMe>,
) -> Result<Json<UserPublic>, AppError> {
    let mut patch = UserPatch::new();

    if let Some(email) = &payload.email {
        check_email(email)?;
        if *email != user.email {
            ensure_email_free(&state, email).await?;
        }
        patch.email = Some(email.clone());
    }
    if let Some(full_name) = payload.full_name {
        patch.full_name = Some(full_name);
    }

    if patch.is_empty() {
        return Ok(Json(user.into()));
    }

    let updated = state.users.update_user(user.id, &patch).await?;
    Ok(Json(updated.into()))
}

/// Update own password (PATCH /users/me/password).
pub async fn update_password_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdatePassword>,
) -> Result<Json<Message>, AppError> {
    if !verify_password(&payload.current_password, &user.hashed_password) {
        return Err(AppError::BadRequest("Incorrect password".to_string()));
    }
    if payload.current_password == payload.new_password {
        return Err(AppError::BadRequest(
            "New password cannot be the same as the current one".to_string(),
        ));
    }
    check_password(&payload.new_password)?;

    let patch = UserPatch::new().hashed_password(hash(&payload.new_password)?);
    state.users.update_user(user.id, &patch).await?;

    Ok(Json(Message::new("Password updated successfully")))
}

/// Delete own account (DELETE /users/me).
pub async fn delete_user_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Message>, AppError> {
    state.users.delete_user(user.id).await?;
    tracing::info!(user_id = %user.id, "user deleted own account");
    Ok(Json(Message::new("User deleted successfully")))
}

/// Get a user by ID (GET /users/{id}; self or superuser).
pub async fn read_user_by_id(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPublic>, AppError> {
    if !current.is_superuser && user_id != current.id {
        return Err(AppError::Forbidden);
    }

    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or(AppError::NotFound {
            entity_type: "User",
        })?;

    Ok(Json(user.into()))
}

/// Update any user (PATCH /users/{id}, superuser only).
pub async fn update_user(
    State(state): State<AppState>,
    Superuser(_): Superuser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserPublic>, AppError> {
    let target = state
        .users
        .get_user(user_id)
        .await?
        .ok_or(AppError::NotFound {
            entity_type: "User",
        })?;

    let mut patch = UserPatch::new();

    if let Some(email) = &payload.email {
        check_email(email)?;
        if *email != target.email {
            ensure_email_free(&state, email).await?;
        }
        patch.email = Some(email.clone());
    }
    if let Some(password) = &payload.password {
        check_password(password)?;
        patch.hashed_password = Some(hash(password)?);
    }
    patch.is_active = payload.is_active;
    patch.is_superuser = payload.is_superuser;
    patch.full_name = payload.full_name;

    if patch.is_empty() {
        return Ok(Json(target.into()));
    }

    let updated = state.users.update_user(user_id, &patch).await?;
    Ok(Json(updated.into()))
}

/// Delete a user (DELETE /users/{id}, superuser only).
///
/// Deleting an absent ID still reports success: the repository delete is
/// idempotent and this route does not add a read for a 404.
pub async fn delete_user(
    State(state): State<AppState>,
    Superuser(current): Superuser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    if current.id == user_id {
        return Err(AppError::BadRequest(
            "Users can't delete themselves. Use the /users/me endpoint instead.".to_string(),
        ));
    }

    state.users.delete_user(user_id).await?;
    tracing::info!(%user_id, "deleted user");
    Ok(Json(Message::new("User deleted successfully")))
}
