//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{Database, SessionStore, UserStore};
use crate::services::{AccountManager, UserAccountService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// User account service
    pub account_service: Arc<dyn UserAccountService>,
    /// Per-visitor session registry
    pub sessions: Arc<SessionStore>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state wired against the database.
    pub fn from_database(database: Arc<Database>) -> Self {
        let repo = Arc::new(UserStore::new(database.get_connection()));

        Self {
            account_service: Arc::new(AccountManager::new(repo)),
            sessions: Arc::new(SessionStore::new()),
            database,
        }
    }

    /// Create application state with manually injected services.
    ///
    /// Lets tests swap the account service for a fake while keeping the
    /// real session registry.
    pub fn new(
        account_service: Arc<dyn UserAccountService>,
        sessions: Arc<SessionStore>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            account_service,
            sessions,
            database,
        }
    }
}
