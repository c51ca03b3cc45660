//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(db: Database, sessions: SessionStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db, sessions }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}
