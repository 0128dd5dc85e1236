//! Lendhub inventory lending server
//!
//! A REST JSON API where users browse a catalog, keep wishlists and open
//! inquiries about items, while staff (admins and editors) manage the
//! catalog, answer inquiries and approve new staff accounts.

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
    /// Build the state over an already constructed repository
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, config.auth.clone(), config.pagination);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
