use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_core::models::Book;

/// Request payload for creating a book. The owner is always the caller.
///
/// Updates do not get their own payload type: the typed
/// [`bookshelf_core::storage::BookPatch`] is the wire format, so an
/// omitted or `null` field is "leave untouched" straight from
/// deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct BookCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl BookCreate {
    /// Builds the stored entity, generating a fresh ID and fixing the owner.
    pub fn into_book(self, owner_id: Uuid) -> Book {
        let mut book = Book::new(owner_id, self.title);
        book.description = self.description;
        book.published_year = self.published_year;
        book.isbn = self.isbn;
        book.pages = self.pages;
        book.price = self.price;
        book
    }
}

/// Book fields returned via the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPublic {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
}

impl From<Book> for BookPublic {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            owner_id: book.owner_id,
            title: book.title,
            description: book.description,
            published_year: book.published_year,
            isbn: book.isbn,
            pages: book.pages,
            price: book.price,
        }
    }
}

/// A page of books with its count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksPublic {
    pub data: Vec<BookPublic>,
    pub count: usize,
}

impl BooksPublic {
    pub fn from_books(books: Vec<Book>) -> Self {
        let data: Vec<BookPublic> = books.into_iter().map(BookPublic::from).collect();
        let count = data.len();
        Self { data, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_book_fixes_owner_and_generates_id() {
        let owner = Uuid::new_v4();
        let payload: BookCreate = serde_json::from_str(
            r#"{"title": "Dune", "published_year": 1965, "price": 9.99}"#,
        )
        .unwrap();

        let book = payload.into_book(owner);

        assert_eq!(book.owner_id, owner);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.published_year, Some(1965));
        assert_eq!(book.price, Some(9.99));
        assert!(book.isbn.is_none());
        assert!(!book.id.is_nil());
    }
}
