//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookListing, BookPayload, BookQuery, PaginatedBooks},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books: author search first, then pagination, else everything
    pub fn list_books(&self, query: &BookQuery) -> BookListing {
        if let Some(author) = query.author_filter() {
            return BookListing::All(self.search_books(author));
        }
        if let Some((page, limit)) = query.pagination() {
            return BookListing::Page(self.paginate_books(page, limit));
        }
        BookListing::All(self.repository.books.get_all())
    }

    pub fn search_books(&self, author: &str) -> Vec<Book> {
        self.repository.books.search(author)
    }

    pub fn paginate_books(&self, page: usize, limit: usize) -> PaginatedBooks {
        self.repository.books.paginate(page, limit)
    }

    /// Get book by ID
    pub fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id)
    }

    pub fn create_book(&self, payload: BookPayload) -> Book {
        let book = self.repository.books.create(payload);
        tracing::info!(book_id = %book.id, total = self.repository.books.len(), "Book created");
        book
    }

    /// Replace an existing book's fields
    pub fn update_book(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        let book = self.repository.books.update(id, payload)?;
        tracing::info!(book_id = %book.id, "Book updated");
        Ok(book)
    }

    pub fn delete_book(&self, id: &str) -> AppResult<()> {
        self.repository.books.delete(id)?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}
