use tokio::sync::Mutex;

use watchlog_engine::Engine;

/// Shared server state. One coarse lock serializes every engine touch; the
/// history stacks and fetch marker are only coherent under serial mutation.
pub(crate) struct AppState {
    pub(crate) engine: Mutex<Engine>,
}
