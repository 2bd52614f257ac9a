//! Application state for dependency injection.

use std::sync::Arc;

use user_service_lib::service::{StoreProbe, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub probe: Arc<dyn StoreProbe>,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_service: Arc<dyn UserService>, probe: Arc<dyn StoreProbe>) -> Self {
        Self {
            user_service,
            probe,
        }
    }
}
