//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Page used when `page` is missing or invalid
pub const DEFAULT_PAGE: usize = 1;
/// Page size used when `limit` is missing or invalid
pub const DEFAULT_LIMIT: usize = 10;

/// A catalog entry. The id is assigned at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Opaque unique identifier (UUID v4)
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Request body for creating or replacing a book
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    /// Publication year, negative for BCE. There is no year 0.
    #[validate(custom(function = "validate_year"))]
    pub year: i32,
}

fn validate_year(year: i32) -> Result<(), ValidationError> {
    if year == 0 {
        let mut error = ValidationError::new("year");
        error.message = Some("year must not be 0".into());
        return Err(error);
    }
    Ok(())
}

/// One page of books with pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginatedBooks {
    /// Books on this page, empty past the end
    pub data: Vec<Book>,
    pub page: usize,
    pub limit: usize,
    /// Total number of books in the catalog
    pub total: usize,
}

/// Query string accepted by `GET /books`.
///
/// Values are kept as raw strings so that malformed numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub author: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl BookQuery {
    /// Author filter, if a non-empty one was given
    pub fn author_filter(&self) -> Option<&str> {
        self.author.as_deref().filter(|author| !author.is_empty())
    }

    /// Normalized `(page, limit)` when pagination was requested.
    ///
    /// Either parameter being present switches to paginated output; values
    /// below 1 or not parseable become the defaults.
    pub fn pagination(&self) -> Option<(usize, usize)> {
        if self.page.is_none() && self.limit.is_none() {
            return None;
        }
        Some((
            positive_or(self.page.as_deref(), DEFAULT_PAGE),
            positive_or(self.limit.as_deref(), DEFAULT_LIMIT),
        ))
    }
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(default)
}

/// Response of `GET /books`: a plain list or a page, depending on the query
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BookListing {
    All(Vec<Book>),
    Page(PaginatedBooks),
}
