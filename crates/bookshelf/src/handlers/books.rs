use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use bookshelf_core::models::{validate_title, Book};
use bookshelf_core::storage::BookPatch;

use crate::{
    error::AppError,
    extract::CurrentUser,
    models::{BookCreate, BookPublic, BooksPublic, ListParams, Message},
    state::AppState,
};

fn check_title(title: &str) -> Result<(), AppError> {
    validate_title(title).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Loads a book and enforces the ownership rule.
///
/// A missing book is 404 before any permission check, so a caller cannot
/// probe which IDs exist behind 403s.
async fn load_owned_book(
    state: &AppState,
    caller: &bookshelf_core::models::User,
    book_id: Uuid,
) -> Result<Book, AppError> {
    let book = state
        .books
        .get_book(book_id)
        .await?
        .ok_or(AppError::NotFound {
            entity_type: "Book",
        })?;

    if !caller.is_superuser && book.owner_id != caller.id {
        return Err(AppError::Forbidden);
    }

    Ok(book)
}

/// Retrieve books (GET /books).
///
/// Regular users see only their own books via the owner index;
/// superusers get a table scan.
pub async fn list_books(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<BooksPublic>, AppError> {
    let books = if user.is_superuser {
        state.books.list_books(params.limit).await?
    } else {
        state.books.list_books_by_owner(user.id, params.limit).await?
    };

    Ok(Json(BooksPublic::from_books(params.paginate(books))))
}

/// Get a book by ID (GET /books/{id}).
pub async fn read_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookPublic>, AppError> {
    let book = load_owned_book(&state, &user, book_id).await?;
    Ok(Json(book.into()))
}

/// Create a book owned by the caller (POST /books).
pub async fn create_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<BookCreate>,
) -> Result<(StatusCode, Json<BookPublic>), AppError> {
    check_title(&payload.title)?;

    let book = payload.into_book(user.id);
    state.books.create_book(&book).await?;
    tracing::info!(book_id = %book.id, owner_id = %book.owner_id, "created book");

    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Update a book (PUT /books/{id}).
///
/// The body is a sparse patch: omitted and `null` fields are left
/// untouched.
pub async fn update_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(book_id): Path<Uuid>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<BookPublic>, AppError> {
    load_owned_book(&state, &user, book_id).await?;

    if let Some(title) = &patch.title {
        check_title(title)?;
    }

    let updated = state.books.update_book(book_id, &patch).await?;
    Ok(Json(updated.into()))
}

/// Delete a book (DELETE /books/{id}).
pub async fn delete_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(book_id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    load_owned_book(&state, &user, book_id).await?;

    state.books.delete_book(book_id).await?;
    tracing::info!(%book_id, "deleted book");
    Ok(Json(Message::new("Book deleted successfully")))
}
