//! Application state and authentication context types.

use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::matching::MatchMode;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared database (users, topics, sessions, connections)
    pub db: DbPool,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        self.config.match_mode
    }

    pub fn session_expiry_hours(&self) -> i64 {
        self.config.session_expiry_hours
    }
}
