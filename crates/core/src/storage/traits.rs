use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Book, User};

use super::{BookPatch, Result, UserPatch};

/// Repository for user records.
///
/// Implementations are pure data access: they have no notion of the
/// current caller. Ownership and privilege checks live in the layer that
/// invokes them, which keeps authorization testable independent of
/// storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by email via the email index.
    ///
    /// Returns the first match if the index ever yields more than one
    /// item; that would indicate a uniqueness violation upstream.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists up to `limit` users (privileged scan).
    async fn list_users(&self, limit: i32) -> Result<Vec<User>>;

    /// Writes a full user item unconditionally (overwrite semantics).
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Applies a sparse update to a user.
    ///
    /// Fails with `NotFound` if the ID does not exist; never creates a
    /// record. An empty patch performs no write and returns the stored
    /// user unchanged.
    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<User>;

    /// Deletes a user. Idempotent: deleting an absent ID is not an error.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}

/// Repository for book records.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Gets a book by ID.
    async fn get_book(&self, id: Uuid) -> Result<Option<Book>>;

    /// Lists up to `limit` books regardless of owner (privileged scan).
    async fn list_books(&self, limit: i32) -> Result<Vec<Book>>;

    /// Lists up to `limit` books owned by `owner_id` via the owner index.
    async fn list_books_by_owner(&self, owner_id: Uuid, limit: i32) -> Result<Vec<Book>>;

    /// Writes a full book item unconditionally (overwrite semantics).
    async fn create_book(&self, book: &Book) -> Result<()>;

    /// Applies a sparse update to a book.
    ///
    /// Same contract as [`UserRepository::update_user`].
    async fn update_book(&self, id: Uuid, patch: &BookPatch) -> Result<Book>;

    /// Deletes a book. Idempotent: deleting an absent ID is not an error.
    async fn delete_book(&self, id: Uuid) -> Result<()>;
}
