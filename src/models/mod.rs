//! Data models for Bookshelf

pub mod auth;
pub mod book;

// Re-export commonly used types
pub use auth::{TokenClaims, TokenRequest, TokenResponse};
pub use book::{Book, BookListing, BookPayload, BookQuery, PaginatedBooks};
