//! Library Catalog
//!
//! A REST JSON server for a small lending library: books, the people who
//! borrow them, and the loans between the two.

use std::sync::Arc;

pub mod api;
pub mod clock;
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
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        repository: repository::Repository,
        clock: Arc<dyn clock::Clock>,
    ) -> Self {
        let services = services::Services::new(repository, clock, &config.loans);
        Self {
            services: Arc::new(services),
        }
    }
}
