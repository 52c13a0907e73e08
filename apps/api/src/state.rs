use std::sync::Arc;

use crate::config::Config;
use crate::session::store::SessionStore;
use crate::session::workflow::Assistant;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Workflow orchestrator. Holds the text generator behind `Arc<dyn TextGenerator>`
    /// so tests can swap in a scripted one.
    pub assistant: Arc<Assistant>,
    pub config: Config,
}
