//! Application state with repository-based storage.
//!
//! Handlers see storage only through the repository trait objects held
//! here; the concrete backend is chosen at startup (and in tests, where
//! the in-memory backend is injected).

use std::sync::Arc;

use bookshelf_core::storage::{BookRepository, UserRepository};

// Storage features: the binary needs exactly one backend.
#[cfg(all(feature = "dynamodb", feature = "inmemory"))]
compile_error!("Cannot enable both 'dynamodb' and 'inmemory' storage features");

#[cfg(not(any(feature = "dynamodb", feature = "inmemory")))]
compile_error!("Must enable exactly one storage feature: 'dynamodb' or 'inmemory'");

/// Token signing configuration shared by login and the auth extractor.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    token_ttl: chrono::Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<Vec<u8>>, token_ttl: chrono::Duration) -> Self {
        Self {
            secret: secret.into(),
            token_ttl,
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        self.token_ttl
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
    pub auth: AuthConfig,
}

impl AppState {
    /// Creates state over the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        auth: AuthConfig,
    ) -> Self {
        Self { users, books, auth }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::storage::inmemory::InMemoryRepository;

    /// State backed by a fresh in-memory repository, for handler tests.
    pub fn state() -> AppState {
        let repo = Arc::new(InMemoryRepository::new());
        AppState::new(
            repo.clone(),
            repo,
            AuthConfig::new(&b"test-secret"[..], chrono::Duration::minutes(30)),
        )
    }
}
