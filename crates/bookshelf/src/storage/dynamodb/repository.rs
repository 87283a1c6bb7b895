//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `bookshelf_core::storage` over
//! two independent tables, borrowing the shared client handle from the
//! connection manager on every call so a failed startup connection heals
//! lazily.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use uuid::Uuid;

use bookshelf_core::models::{Book, User};
use bookshelf_core::storage::{
    BookPatch, BookRepository, RepositoryError, Result, UserPatch, UserRepository,
};

use super::connection::ConnectionManager;
use super::conversions::{
    book_patch_assignments, book_to_item, item_to_book, item_to_user, user_patch_assignments,
    user_to_item,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};
use super::expression::build_update_expression;
use super::provision::{EMAIL_INDEX, OWNER_INDEX};

/// DynamoDB-based repository for both entity types.
pub struct DynamoRepository {
    conn: Arc<ConnectionManager>,
    users_table: String,
    books_table: String,
}

impl DynamoRepository {
    /// Creates a repository over the given connection manager and tables.
    pub fn new(
        conn: Arc<ConnectionManager>,
        users_table: impl Into<String>,
        books_table: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            users_table: users_table.into(),
            books_table: books_table.into(),
        }
    }
}

#[async_trait]
impl UserRepository for DynamoRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let client = self.conn.acquire().await?;

        let result = client
            .get_item()
            .table_name(&self.users_table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, "User", id.to_string()))?;

        match result.item {
            Some(item) => Ok(Some(item_to_user(&item)?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.conn.acquire().await?;

        let result = client
            .query()
            .table_name(&self.users_table)
            .index_name(EMAIL_INDEX)
            .key_condition_expression("email = :email")
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(map_query_error)?;

        // More than one item here would mean the application-layer
        // uniqueness check was bypassed; the first match wins.
        let items = result.items.unwrap_or_default();
        match items.first() {
            Some(item) => Ok(Some(item_to_user(item)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self, limit: i32) -> Result<Vec<User>> {
        let client = self.conn.acquire().await?;

        let result = client
            .scan()
            .table_name(&self.users_table)
            .limit(limit)
            .send()
            .await
            .map_err(map_scan_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_user).collect()
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let client = self.conn.acquire().await?;

        client
            .put_item()
            .table_name(&self.users_table)
            .set_item(Some(user_to_item(user)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "User", user.id.to_string()))?;

        Ok(())
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<User> {
        let client = self.conn.acquire().await?;

        if let Some(expr) = build_update_expression(user_patch_assignments(patch)) {
            client
                .update_item()
                .table_name(&self.users_table)
                .key("id", AttributeValue::S(id.to_string()))
                .update_expression(expr.expression)
                .set_expression_attribute_names(Some(expr.names))
                .set_expression_attribute_values(Some(expr.values))
                .condition_expression("attribute_exists(id)")
                .send()
                .await
                .map_err(|e| map_update_item_error(e, "User", id.to_string()))?;
        }

        // Re-read instead of asking the update call for the new value;
        // one extra round trip, no second conversion path.
        self.get_user(id).await?.ok_or(RepositoryError::NotFound {
            entity_type: "User",
            id: id.to_string(),
        })
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let client = self.conn.acquire().await?;

        client
            .delete_item()
            .table_name(&self.users_table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}

#[async_trait]
impl BookRepository for DynamoRepository {
    async fn get_book(&self, id: Uuid) -> Result<Option<Book>> {
        let client = self.conn.acquire().await?;

        let result = client
            .get_item()
            .table_name(&self.books_table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, "Book", id.to_string()))?;

        match result.item {
            Some(item) => Ok(Some(item_to_book(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_books(&self, limit: i32) -> Result<Vec<Book>> {
        let client = self.conn.acquire().await?;

        let result = client
            .scan()
            .table_name(&self.books_table)
            .limit(limit)
            .send()
            .await
            .map_err(map_scan_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_book).collect()
    }

    async fn list_books_by_owner(&self, owner_id: Uuid, limit: i32) -> Result<Vec<Book>> {
        let client = self.conn.acquire().await?;

        let result = client
            .query()
            .table_name(&self.books_table)
            .index_name(OWNER_INDEX)
            .key_condition_expression("owner_id = :owner_id")
            .expression_attribute_values(":owner_id", AttributeValue::S(owner_id.to_string()))
            .limit(limit)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(item_to_book).collect()
    }

    async fn create_book(&self, book: &Book) -> Result<()> {
        let client = self.conn.acquire().await?;

        client
            .put_item()
            .table_name(&self.books_table)
            .set_item(Some(book_to_item(book)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Book", book.id.to_string()))?;

        Ok(())
    }

    async fn update_book(&self, id: Uuid, patch: &BookPatch) -> Result<Book> {
        let client = self.conn.acquire().await?;

        if let Some(expr) = build_update_expression(book_patch_assignments(patch)) {
            client
                .update_item()
                .table_name(&self.books_table)
                .key("id", AttributeValue::S(id.to_string()))
                .update_expression(expr.expression)
                .set_expression_attribute_names(Some(expr.names))
                .set_expression_attribute_values(Some(expr.values))
                .condition_expression("attribute_exists(id)")
                .send()
                .await
                .map_err(|e| map_update_item_error(e, "Book", id.to_string()))?;
        }

        self.get_book(id).await?.ok_or(RepositoryError::NotFound {
            entity_type: "Book",
            id: id.to_string(),
        })
    }

    async fn delete_book(&self, id: Uuid) -> Result<()> {
        let client = self.conn.acquire().await?;

        client
            .delete_item()
            .table_name(&self.books_table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}
