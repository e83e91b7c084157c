//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use terra_app::controller::Terrarium;

/// Application state shared across all axum handlers.
///
/// Generic over the actuator and sensor port types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the port types themselves do
/// not need to be `Clone` — only the `Arc` is cloned. The same `Arc` is held
/// by the tick loop; every handler takes the lock before touching the
/// aggregate.
pub struct AppState<A, S> {
    pub terrarium: Arc<Mutex<Terrarium<A, S>>>,
}

impl<A, S> Clone for AppState<A, S> {
    fn clone(&self) -> Self {
        Self {
            terrarium: Arc::clone(&self.terrarium),
        }
    }
}

impl<A, S> AppState<A, S> {
    /// Wrap the shared aggregate for the router.
    pub fn new(terrarium: Arc<Mutex<Terrarium<A, S>>>) -> Self {
        Self { terrarium }
    }
}
