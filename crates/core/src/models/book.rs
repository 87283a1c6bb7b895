use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by book validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("title must be at most 255 characters")]
    TitleTooLong,
}

/// A book owned by a single user.
///
/// Ownership is fixed at creation time; there is no reassignment
/// operation anywhere in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
}

impl Book {
    /// Creates a new book with a generated UUID, owned by `owner_id`.
    pub fn new(owner_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            description: None,
            published_year: None,
            isbn: None,
            pages: None,
            price: None,
        }
    }

    /// Sets the description for this book.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a specific ID for this book (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Validates a book title before creation or update.
pub fn validate_title(title: &str) -> Result<(), BookError> {
    if title.is_empty() {
        return Err(BookError::EmptyTitle);
    }
    if title.len() > 255 {
        return Err(BookError::TitleTooLong);
    }
    Ok(())
}
