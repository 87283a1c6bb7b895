use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by user validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("email must not be empty")]
    EmptyEmail,

    #[error("email must be at most 255 characters")]
    EmailTooLong,

    #[error("email is not a valid address: {0}")]
    InvalidEmail(String),
}

/// A user account.
///
/// The `hashed_password` field always holds a PHC hash string, never a
/// plain-text password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub full_name: Option<String>,
}

impl User {
    /// Creates a new active, non-privileged user with a generated UUID.
    pub fn new(email: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            is_active: true,
            is_superuser: false,
            full_name: None,
        }
    }

    /// Sets the display name for this user.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Marks this user as a superuser.
    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Validates an email address before creation or update.
///
/// Uniqueness is not checked here; callers query the email index before
/// writing.
pub fn validate_email(email: &str) -> Result<(), UserError> {
    if email.trim().is_empty() {
        return Err(UserError::EmptyEmail);
    }
    if email.len() > 255 {
        return Err(UserError::EmailTooLong);
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(UserError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
