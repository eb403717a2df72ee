//! Book (catalog) endpoints
//!
//! Every route accepts anonymous callers; a presented token must be valid.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookListing, BookPayload, BookQuery},
    AppState,
};

use super::{MaybeAuthenticated, ValidatedJson};

/// List books, search by author, or paginate
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security((), ("bearer_auth" = [])),
    params(
        ("author" = Option<String>, Query, description = "Case-insensitive author substring"),
        ("page" = Option<usize>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<usize>, Query, description = "Books per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Books in creation order, or one page of them", body = BookListing),
        (status = 401, description = "Invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    MaybeAuthenticated(_claims): MaybeAuthenticated,
    Query(query): Query<BookQuery>,
) -> Json<BookListing> {
    Json(state.services.catalog.list_books(&query))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security((), ("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 401, description = "Invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    MaybeAuthenticated(_claims): MaybeAuthenticated,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&id)?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security((), ("bearer_auth" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    MaybeAuthenticated(claims): MaybeAuthenticated,
    ValidatedJson(payload): ValidatedJson<BookPayload>,
) -> (StatusCode, Json<Book>) {
    if let Some(claims) = claims {
        tracing::debug!(subject = %claims.sub, "Authenticated book creation");
    }

    let created = state.services.catalog.create_book(payload);
    (StatusCode::CREATED, Json(created))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security((), ("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    MaybeAuthenticated(_claims): MaybeAuthenticated,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<BookPayload>,
) -> AppResult<Json<Book>> {
    let updated = state.services.catalog.update_book(&id, payload)?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security((), ("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    MaybeAuthenticated(_claims): MaybeAuthenticated,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
