// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::config::Config;

/// Grading records shared between request handlers.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Catalog::new())),
            config,
        }
    }
}

impl FromRef<AppState> for SharedCatalog {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
