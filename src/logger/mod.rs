//! Logger module
//!
//! Provides logging utilities for the dev server:
//! - Startup status lines
//! - Access logging in common or combined format
//! - Error and warning logging
//! - Optional file-based log sinks

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to access log
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Announce the listening port on stdout
///
/// Always printed to the terminal, independent of the configured log files.
pub fn log_startup(addr: &SocketAddr) {
    for line in startup_lines(addr) {
        println!("{line}");
    }
}

fn startup_lines(addr: &SocketAddr) -> [String; 3] {
    let port = addr.port();
    [
        format!("Server started on port {port}"),
        format!("Open: http://localhost:{port}"),
        "Anti-cache headers enabled for development".to_string(),
    ]
}

pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    write_access(&entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown(signal: &str) {
    write_error(&format!("[SIGNAL] {signal} received, shutting down"));
}
