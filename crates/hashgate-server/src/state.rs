use hashgate_store::ContentStore;

use crate::auth::AccessGate;

/// Shared application state passed to all handlers via `axum::extract::State`.
///
/// Read-only after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub content: ContentStore,
    pub gate: AccessGate,
}

impl AppState {
    pub fn new(content: ContentStore, gate: AccessGate) -> Self {
        Self { content, gate }
    }
}
