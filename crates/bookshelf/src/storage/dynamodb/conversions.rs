//! Attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps
//! and domain types, and for turning typed patches into assignment
//! lists for the update-statement builder. Testable in isolation
//! without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use uuid::Uuid;

use bookshelf_core::models::{Book, User};
use bookshelf_core::storage::{BookPatch, RepositoryError, UserPatch};

// ============================================================================
// User conversions
// ============================================================================

/// Convert a User to a DynamoDB item.
pub fn user_to_item(user: &User) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    item.insert("id".to_string(), AttributeValue::S(user.id.to_string()));
    item.insert("email".to_string(), AttributeValue::S(user.email.clone()));
    item.insert(
        "hashed_password".to_string(),
        AttributeValue::S(user.hashed_password.clone()),
    );
    item.insert("is_active".to_string(), AttributeValue::Bool(user.is_active));
    item.insert(
        "is_superuser".to_string(),
        AttributeValue::Bool(user.is_superuser),
    );
    if let Some(full_name) = &user.full_name {
        item.insert("full_name".to_string(), AttributeValue::S(full_name.clone()));
    }

    item
}

/// Convert a DynamoDB item to a User.
pub fn item_to_user(item: &HashMap<String, AttributeValue>) -> Result<User, RepositoryError> {
    Ok(User {
        id: get_uuid(item, "id")?,
        email: get_string(item, "email")?,
        hashed_password: get_string(item, "hashed_password")?,
        is_active: get_bool(item, "is_active")?,
        is_superuser: get_bool(item, "is_superuser")?,
        full_name: get_optional_string(item, "full_name"),
    })
}

/// Assignment list for a user patch, in declaration order.
///
/// Unset fields produce no assignment; that is the whole partial-update
/// contract.
pub fn user_patch_assignments(patch: &UserPatch) -> Vec<(&'static str, AttributeValue)> {
    let mut assignments = Vec::new();

    if let Some(email) = &patch.email {
        assignments.push(("email", AttributeValue::S(email.clone())));
    }
    if let Some(hashed_password) = &patch.hashed_password {
        assignments.push(("hashed_password", AttributeValue::S(hashed_password.clone())));
    }
    if let Some(is_active) = patch.is_active {
        assignments.push(("is_active", AttributeValue::Bool(is_active)));
    }
    if let Some(is_superuser) = patch.is_superuser {
        assignments.push(("is_superuser", AttributeValue::Bool(is_superuser)));
    }
    if let Some(full_name) = &patch.full_name {
        assignments.push(("full_name", AttributeValue::S(full_name.clone())));
    }

    assignments
}

// ============================================================================
// Book conversions
// ============================================================================

/// Convert a Book to a DynamoDB item.
pub fn book_to_item(book: &Book) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    item.insert("id".to_string(), AttributeValue::S(book.id.to_string()));
    item.insert(
        "owner_id".to_string(),
        AttributeValue::S(book.owner_id.to_string()),
    );
    item.insert("title".to_string(), AttributeValue::S(book.title.clone()));
    if let Some(description) = &book.description {
        item.insert(
            "description".to_string(),
            AttributeValue::S(description.clone()),
        );
    }
    if let Some(published_year) = book.published_year {
        item.insert(
            "published_year".to_string(),
            AttributeValue::N(published_year.to_string()),
        );
    }
    if let Some(isbn) = &book.isbn {
        item.insert("isbn".to_string(), AttributeValue::S(isbn.clone()));
    }
    if let Some(pages) = book.pages {
        item.insert("pages".to_string(), AttributeValue::N(pages.to_string()));
    }
    if let Some(price) = book.price {
        item.insert("price".to_string(), AttributeValue::N(price.to_string()));
    }

    item
}

/// Convert a DynamoDB item to a Book.
pub fn item_to_book(item: &HashMap<String, AttributeValue>) -> Result<Book, RepositoryError> {
    Ok(Book {
        id: get_uuid(item, "id")?,
        owner_id: get_uuid(item, "owner_id")?,
        title: get_string(item, "title")?,
        description: get_optional_string(item, "description"),
        published_year: get_optional_number(item, "published_year")?,
        isbn: get_optional_string(item, "isbn"),
        pages: get_optional_number(item, "pages")?,
        price: get_optional_number(item, "price")?,
    })
}

/// Assignment list for a book patch, in declaration order.
pub fn book_patch_assignments(patch: &BookPatch) -> Vec<(&'static str, AttributeValue)> {
    let mut assignments = Vec::new();

    if let Some(title) = &patch.title {
        assignments.push(("title", AttributeValue::S(title.clone())));
    }
    if let Some(description) = &patch.description {
        assignments.push(("description", AttributeValue::S(description.clone())));
    }
    if let Some(published_year) = patch.published_year {
        assignments.push(("published_year", AttributeValue::N(published_year.to_string())));
    }
    if let Some(isbn) = &patch.isbn {
        assignments.push(("isbn", AttributeValue::S(isbn.clone())));
    }
    if let Some(pages) = patch.pages {
        assignments.push(("pages", AttributeValue::N(pages.to_string())));
    }
    if let Some(price) = patch.price {
        assignments.push(("price", AttributeValue::N(price.to_string())));
    }

    assignments
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required boolean attribute.
fn get_bool(item: &HashMap<String, AttributeValue>, key: &str) -> Result<bool, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required UUID attribute.
fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

/// Get an optional numeric attribute, parsed from the store's string form.
fn get_optional_number<T: std::str::FromStr>(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Option<T>, RepositoryError>
where
    T::Err: std::fmt::Display,
{
    match item.get(key) {
        None => Ok(None),
        Some(value) => {
            let n = value.as_n().map_err(|_| {
                RepositoryError::InvalidData(format!("Missing or invalid field: {}", key))
            })?;
            n.parse::<T>()
                .map(Some)
                .map_err(|e| RepositoryError::InvalidData(format!("Invalid number {}: {}", key, e)))
        }
    }
}
