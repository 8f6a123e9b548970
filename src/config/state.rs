// Application state module
// Immutable state shared by every connection task

use std::path::PathBuf;

use super::types::Config;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical directory whose subtree is served
    pub root: PathBuf,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Whether per-request access logging is enabled
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
