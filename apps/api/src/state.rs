use std::sync::Arc;

use crate::config::Config;
use crate::generation::companion::DocumentGenerators;
use crate::layout::LogLayout;
use crate::schedule::Clock;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Supplies "today" for staff with no separation date.
    pub clock: Arc<dyn Clock>,
    /// Certificate and test generators. Default: ScriptGenerators.
    pub generators: Arc<dyn DocumentGenerators>,
    /// Page geometry and styling for the training log.
    pub layout: Arc<LogLayout>,
}
