//! Startup error types
//!
//! Every variant is fatal: the server never retries a failed startup step.

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address {0}")]
    InvalidAddress(String),

    #[error("cannot serve from {}: {source}", path.display())]
    RootDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("logger setup failed: {0}")]
    Logger(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
