use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("could not validate credentials: {0}")]
    InvalidToken(String),

    #[error("failed to create access token: {0}")]
    TokenCreation(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
