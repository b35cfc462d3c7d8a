//! Application state - Dependency injection container.
//!
//! Provides centralized access to the account service and
//! infrastructure handles.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter, UserStore};
use crate::services::{AccountManager, AccountService, TokenIssuer};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Account service (the nine operations)
    pub accounts: Arc<dyn AccountService>,
    /// Rate limiter for credential endpoints
    pub limiter: Arc<dyn RateLimiter>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production service graph from configuration: SeaORM
    /// store, token issuer, account manager.
    pub fn from_config(
        database: Arc<Database>,
        limiter: Arc<dyn RateLimiter>,
        config: &Config,
    ) -> Self {
        let repo = Arc::new(UserStore::new(database.get_connection()));
        let tokens = TokenIssuer::new(config);
        let accounts = Arc::new(AccountManager::new(repo, tokens));

        Self {
            accounts,
            limiter,
            database,
        }
    }

    /// Create application state with manually injected services
    /// (used by tests).
    pub fn new(
        accounts: Arc<dyn AccountService>,
        limiter: Arc<dyn RateLimiter>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            accounts,
            limiter,
            database,
        }
    }
}
