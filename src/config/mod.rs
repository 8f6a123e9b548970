// Configuration module entry point
// Loads the server configuration and holds the shared runtime state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, FilesConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file used when `DEVSERVE_CONFIG` is not set (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "devserve";

/// Port served when nothing overrides it
pub const DEFAULT_PORT: u16 = 8000;

impl Config {
    /// Load configuration from `DEVSERVE_CONFIG`, falling back to `devserve.toml`
    pub fn load() -> Result<Self, ServerError> {
        let path =
            std::env::var("DEVSERVE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; defaults and environment apply
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("files.index_files", vec!["index.html", "index.htm"])?
            .set_default("files.directory_listing", true)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .set_default(
                "http.server_name",
                format!("devserve/{}", env!("CARGO_PKG_VERSION")),
            )?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        host.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.server.port))
            .map_err(|e| ServerError::InvalidAddress(format!("{}: {e}", self.server.host)))
    }
}
