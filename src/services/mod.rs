//! Business logic services

pub mod auth;
pub mod books;
pub mod catalog;
pub mod redis;
pub mod sessions;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub sessions: sessions::SessionManager,
    pub repository: Repository,
}

impl Services {
    /// Wire services over the repository and the injected session store and catalog
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        session_store: Arc<dyn sessions::SessionStore>,
        catalog: Arc<dyn catalog::BookLookup>,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            books: books::BooksService::new(repository.clone(), catalog),
            sessions: sessions::SessionManager::new(session_store, config.session_ttl_seconds()),
            repository,
        }
    }
}
