//! Business logic services

pub mod auth;
pub mod catalog;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: &AuthConfig) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(auth_config)?,
            catalog: catalog::CatalogService::new(repository),
        })
    }
}
