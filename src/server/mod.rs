// Server module entry point
// Startup (root resolution, binding) and the accept loop

pub mod connection;
pub mod listener;
pub mod root;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServerError;

pub use listener::create_listener;
pub use root::resolve_root;
pub use server_loop::run_server_loop;
pub use signal::shutdown_signal;

/// A bound server, ready to accept connections
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Resolve the server root and bind the listening socket
    ///
    /// Must be called from within a Tokio runtime. Every failure here is
    /// fatal for the process.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let root = resolve_root(config.files.root.as_deref())?;
        let addr = config.get_socket_addr()?;
        let listener = create_listener(addr)?;

        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config, root)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn root(&self) -> &Path {
        &self.state.root
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        run_server_loop(self.listener, self.state, shutdown).await;
    }
}
