//! Bookshelf book catalog server
//!
//! An in-memory book catalog exposing CRUD, author search and pagination
//! over a REST JSON API, guarded by optional JWT bearer authentication.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state with an empty catalog
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let repository = repository::Repository::new();
        let services = services::Services::new(repository, &config.auth)?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
