//! Typed field patches for partial updates.
//!
//! A patch carries only the fields a caller wants to change; `None` means
//! "leave this field untouched". Because an explicit JSON `null`
//! deserializes to `None` as well, clearing a field through a patch is
//! not possible. That limitation is deliberate and load-bearing: callers
//! of the public update endpoints rely on nulls being ignored.

use serde::{Deserialize, Serialize};

use crate::models::{Book, User};

/// Sparse update for a user record.
///
/// Passwords never travel through a patch in plain text; the boundary
/// hashes them into `hashed_password` first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.hashed_password.is_none()
            && self.is_active.is_none()
            && self.is_superuser.is_none()
            && self.full_name.is_none()
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn hashed_password(mut self, hashed_password: impl Into<String>) -> Self {
        self.hashed_password = Some(hashed_password.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn is_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = Some(is_superuser);
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Applies this patch to a user in place, touching only the set fields.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(hashed_password) = &self.hashed_password {
            user.hashed_password = hashed_password.clone();
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(is_superuser) = self.is_superuser {
            user.is_superuser = is_superuser;
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = Some(full_name.clone());
        }
    }
}

/// Sparse update for a book record.
///
/// There is no `owner_id` field here: ownership is immutable after
/// creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl BookPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.published_year.is_none()
            && self.isbn.is_none()
            && self.pages.is_none()
            && self.price.is_none()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn published_year(mut self, published_year: i32) -> Self {
        self.published_year = Some(published_year);
        self
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn pages(mut self, pages: i32) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Applies this patch to a book in place, touching only the set fields.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(description) = &self.description {
            book.description = Some(description.clone());
        }
        if let Some(published_year) = self.published_year {
            book.published_year = Some(published_year);
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = Some(isbn.clone());
        }
        if let Some(pages) = self.pages {
            book.pages = Some(pages);
        }
        if let Some(price) = self.price {
            book.price = Some(price);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patches_report_empty() {
        assert!(UserPatch::new().is_empty());
        assert!(BookPatch::new().is_empty());
    }

    #[test]
    fn setting_any_field_makes_patch_non_empty() {
        assert!(!UserPatch::new().email("a@example.com").is_empty());
        assert!(!UserPatch::new().is_active(false).is_empty());
        assert!(!BookPatch::new().price(9.99).is_empty());
    }

    #[test]
    fn json_null_deserializes_to_untouched_field() {
        let patch: BookPatch =
            serde_json::from_str(r#"{"title": "New Title", "description": null}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New Title"));
        assert!(patch.description.is_none());
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let patch: UserPatch = serde_json::from_str(r#"{"full_name": "Alice"}"#).unwrap();
        assert_eq!(patch.full_name.as_deref(), Some("Alice"));
        assert!(patch.email.is_none());
        assert!(patch.hashed_password.is_none());
    }

    #[test]
    fn apply_to_changes_exactly_the_patched_fields() {
        let mut book = Book::new(uuid::Uuid::new_v4(), "Original Title").with_description("desc");
        let before = book.clone();

        BookPatch::new().price(9.99).apply_to(&mut book);

        assert_eq!(book.price, Some(9.99));
        assert_eq!(book.title, before.title);
        assert_eq!(book.description, before.description);
        assert_eq!(book.published_year, before.published_year);
        assert_eq!(book.isbn, before.isbn);
        assert_eq!(book.pages, before.pages);
        assert_eq!(book.owner_id, before.owner_id);
        assert_eq!(book.id, before.id);
    }

    #[test]
    fn empty_patch_applied_is_a_no_op() {
        let mut user = User::new("alice@example.com", "hash").with_full_name("Alice");
        let before = user.clone();
        UserPatch::new().apply_to(&mut user);
        assert_eq!(user, before);
    }

    #[test]
    fn user_patch_swaps_email_and_password() {
        let mut user = User::new("old@example.com", "old-hash");
        UserPatch::new()
            .email("new@example.com")
            .hashed_password("new-hash")
            .apply_to(&mut user);
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.hashed_password, "new-hash");
        assert!(user.is_active);
    }
}
