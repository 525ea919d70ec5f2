//! Shared application state for Axum routers.

use std::sync::Arc;

use entwine_engine::Resolver;
use entwine_storage::InMemoryContactStore;

/// Type alias for the resolver wiring used by the API.
///
/// The in-memory store is the reference backend; swapping in a durable
/// `ContactStore` implementation only changes this alias and the wiring in
/// `main.rs`, never the handlers.
pub type ApiResolver = Resolver<InMemoryContactStore>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The identity-resolution engine.
    pub resolver: Arc<ApiResolver>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(store: InMemoryContactStore) -> Self {
        Self {
            resolver: Arc::new(Resolver::new(Arc::new(store))),
            start_time: std::time::Instant::now(),
        }
    }

    /// The store handle behind the resolver (health checks, tests).
    pub fn store(&self) -> &InMemoryContactStore {
        self.resolver.store().as_ref()
    }
}
