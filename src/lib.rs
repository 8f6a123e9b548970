//! # devserve
//!
//! Static file server for local development. Files are served from the
//! program's own directory, and every response carries headers that keep
//! browsers and proxies from caching it:
//!
//! ```text
//! Cache-Control: no-cache, no-store, must-revalidate
//! Pragma: no-cache
//! Expires: 0
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::ServerError;
pub use server::Server;
