use std::sync::Arc;

use tokio::sync::RwLock;

use crate::registry::BookRegistry;

/// Shared handle to the registry, cloned into every request. Concurrent requests
/// against different symbols still serialize briefly on this lock to resolve their
/// book; requests against the same symbol serialize for the whole operation, which
/// matches the engine's single-threaded-per-book requirement.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<BookRegistry>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(BookRegistry::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}
