// Connection handling module
// Serves one accepted TCP connection on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::http::NoCache;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// The request handler is wrapped in [`NoCache`], so every response written
/// on this connection carries the anti-cache headers.
///
/// `performance.header_read_timeout` only bounds the wait for a request
/// head, so a response already being written is never cut off (0 disables
/// the limit).
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout = Duration::from_secs(state.config.performance.header_read_timeout);

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(state.config.performance.keep_alive)
            .header_read_timeout((!timeout.is_zero()).then_some(timeout));

        let service = NoCache::new(service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&state), peer_addr)
        }));

        match builder.serve_connection(io, service).await {
            Ok(()) => {}
            // Client went away mid-request
            Err(err) if err.is_incomplete_message() => {}
            // Idle keep-alive connection hit the header read timeout
            Err(err) if err.is_timeout() => {}
            Err(err) => logger::log_connection_error(&err),
        }
    });
}
