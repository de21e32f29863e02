//! Business logic services

pub mod auth;
pub mod authors;
pub mod catalog;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub authors: authors::AuthorsService,
    pub catalog: catalog::CatalogService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), auth_config)?,
            authors: authors::AuthorsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            repository,
        })
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

/// Turn a unique-constraint violation into a client error; pass anything else through.
pub(crate) fn unique_violation_as(err: AppError, message: &str) -> AppError {
    match err {
        AppError::Database(ref db_err)
            if db_err
                .as_database_error()
                .map(|e| e.is_unique_violation())
                .unwrap_or(false) =>
        {
            AppError::AlreadyExists(message.to_string())
        }
        other => other,
    }
}
