//! Catalog Server
//!
//! REST JSON API for a library catalog: authors, books, bulk import from
//! JSON or CSV files and bearer-token authentication.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use sqlx::{Pool, Postgres};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire repository and services on top of a database pool
    pub fn new(config: AppConfig, pool: Pool<Postgres>) -> AppResult<Self> {
        let services = Services::new(Repository::new(pool), config.auth.clone())?;
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
