use std::sync::Arc;

use roofquote_core::store::QuoteStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The quote store. Built once at startup and closed after shutdown.
    pub store: Arc<dyn QuoteStore>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuoteStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Borrow the store as a trait object for the core operations.
    pub fn store(&self) -> &dyn QuoteStore {
        self.store.as_ref()
    }
}
