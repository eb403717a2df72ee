//! In-memory book store
//!
//! Books live in a single [`IndexMap`] keyed by id. The map's entry vector
//! is the insertion-order sequence and its hash index is the lookup table, so
//! both always hold exactly the same ids. The map sits behind one
//! [`parking_lot::RwLock`]: writers (create/update/delete) are exclusive with
//! everything else, readers share the lock and always observe a complete
//! snapshot.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, PaginatedBooks},
};

#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<IndexMap<String, Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new book under a freshly generated id
    pub fn create(&self, payload: BookPayload) -> Book {
        let mut books = self.books.write();

        // A v4 collision is not expected; regenerate rather than overwrite.
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !books.contains_key(&candidate) {
                break candidate;
            }
        };

        let book = Book {
            id: id.clone(),
            title: payload.title,
            author: payload.author,
            year: payload.year,
        };
        books.insert(id, book.clone());
        book
    }

    /// All books in insertion order
    pub fn get_all(&self) -> Vec<Book> {
        self.books.read().values().cloned().collect()
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.books
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Replace title, author and year. The id and list position are kept.
    pub fn update(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        let mut books = self.books.write();
        let book = books.get_mut(id).ok_or_else(|| not_found(id))?;

        book.title = payload.title;
        book.author = payload.author;
        book.year = payload.year;
        Ok(book.clone())
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        // shift_remove keeps the relative order of the remaining entries
        self.books
            .write()
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Case-insensitive substring match on the author, in insertion order
    pub fn search(&self, author: &str) -> Vec<Book> {
        let needle = author.to_lowercase();
        self.books
            .read()
            .values()
            .filter(|book| book.author.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Slice `[(page-1)*limit, (page-1)*limit + limit)` of the ordered books,
    /// clamped to what exists. `page` and `limit` must be at least 1.
    pub fn paginate(&self, page: usize, limit: usize) -> PaginatedBooks {
        let books = self.books.read();
        let total = books.len();

        let start = page.saturating_sub(1).saturating_mul(limit).min(total);
        let end = start.saturating_add(limit).min(total);

        let data = books
            .values()
            .skip(start)
            .take(end - start)
            .cloned()
            .collect();

        PaginatedBooks {
            data,
            page,
            limit,
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}
