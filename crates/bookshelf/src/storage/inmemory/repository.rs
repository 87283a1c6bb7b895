//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bookshelf_core::models::{Book, User};
use bookshelf_core::storage::{
    BookPatch, BookRepository, RepositoryError, Result, UserPatch, UserRepository,
};

/// In-memory storage backend for tests and store-less local runs.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
/// Matches the DynamoDB backend's contracts: unconditional create and
/// delete, `NotFound` on patching an absent ID.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    books: Arc<RwLock<HashMap<Uuid, Book>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            books: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, limit: i32) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().take(limit.max(0) as usize).cloned().collect())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(RepositoryError::NotFound {
            entity_type: "User",
            id: id.to_string(),
        })?;
        patch.apply_to(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let mut users = self.users.write().await;
        users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn get_book(&self, id: Uuid) -> Result<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.get(&id).cloned())
    }

    async fn list_books(&self, limit: i32) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books.values().take(limit.max(0) as usize).cloned().collect())
    }

    async fn list_books_by_owner(&self, owner_id: Uuid, limit: i32) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|b| b.owner_id == owner_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create_book(&self, book: &Book) -> Result<()> {
        let mut books = self.books.write().await;
        books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update_book(&self, id: Uuid, patch: &BookPatch) -> Result<Book> {
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or(RepositoryError::NotFound {
            entity_type: "Book",
            id: id.to_string(),
        })?;
        patch.apply_to(book);
        Ok(book.clone())
    }

    async fn delete_book(&self, id: Uuid) -> Result<()> {
        let mut books = self.books.write().await;
        books.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_round_trips_all_fields() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();
        let mut book = Book::new(owner, "Dune");
        book.price = Some(9.99);
        book.published_year = Some(1965);

        repo.create_book(&book).await.unwrap();
        let stored = repo.get_book(book.id).await.unwrap().unwrap();

        assert_eq!(stored, book);
    }

    #[tokio::test]
    async fn get_user_by_email_finds_exactly_the_created_user() {
        let repo = InMemoryRepository::new();
        let user = User::new("a@x.com", "h1");
        repo.create_user(&user).await.unwrap();

        let found = repo.get_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.get_user_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_lookup_follows_an_email_change() {
        let repo = InMemoryRepository::new();
        let user = User::new("old@x.com", "h");
        repo.create_user(&user).await.unwrap();

        repo.update_user(user.id, &UserPatch::new().email("new@x.com"))
            .await
            .unwrap();

        assert!(repo.get_user_by_email("old@x.com").await.unwrap().is_none());
        let found = repo.get_user_by_email("new@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() {
        let repo = InMemoryRepository::new();
        let book = Book::new(Uuid::new_v4(), "T").with_description("keep me");
        repo.create_book(&book).await.unwrap();

        let updated = repo
            .update_book(book.id, &BookPatch::new().price(9.99))
            .await
            .unwrap();

        assert_eq!(updated.price, Some(9.99));
        assert_eq!(updated.title, "T");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op() {
        let repo = InMemoryRepository::new();
        let user = User::new("a@x.com", "h").with_full_name("Alice");
        repo.create_user(&user).await.unwrap();

        let updated = repo.update_user(user.id, &UserPatch::new()).await.unwrap();
        assert_eq!(updated, user);
    }

    #[tokio::test]
    async fn update_on_missing_id_is_not_found_and_creates_nothing() {
        let repo = InMemoryRepository::new();
        let id = Uuid::new_v4();

        let err = repo
            .update_book(id, &BookPatch::new().title("ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound { .. }));
        assert!(repo.get_book(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryRepository::new();
        let book = Book::new(Uuid::new_v4(), "T");
        repo.create_book(&book).await.unwrap();

        repo.delete_book(book.id).await.unwrap();
        repo.delete_book(book.id).await.unwrap();
        repo.delete_book(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn list_by_owner_scopes_to_owner() {
        let repo = InMemoryRepository::new();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let book = Book::new(u1, "T");
        repo.create_book(&book).await.unwrap();

        let mine = repo.list_books_by_owner(u1, 100).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, book.id);

        assert!(repo.list_books_by_owner(u2, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_honors_limit() {
        let repo = InMemoryRepository::new();
        for i in 0..5 {
            repo.create_user(&User::new(format!("u{i}@x.com"), "h"))
                .await
                .unwrap();
        }
        assert_eq!(repo.list_users(3).await.unwrap().len(), 3);
    }
}
