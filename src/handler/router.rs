//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, dispatch to the
//! static file handler, `Server` header and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request data the static file handler needs, detached from the body
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Path as received, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: collapse_leading_slashes(parts.uri.path()),
            query: parts.uri.query().map(ToString::to_string),
            is_head: parts.method == Method::HEAD,
            if_modified_since: header_string(parts, "if-modified-since"),
            if_none_match: header_string(parts, "if-none-match"),
            range_header: header_string(parts, "range"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Request bodies are never read; only GET and HEAD are served.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let parts = req.into_parts().0;
    let ctx = RequestContext::from_parts(&parts);

    let mut response = match ctx.method {
        Method::GET | Method::HEAD => static_files::serve(&ctx, &state).await,
        ref other => {
            logger::log_warning(&format!("Unsupported method: {other}"));
            http::build_error_response(
                StatusCode::NOT_IMPLEMENTED,
                &format!("Unsupported method ('{other}')"),
                false,
            )
        }
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.access_log() {
        log_access(&parts, &response, &state, remote_addr);
    }

    Ok(response)
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    state: &AppState,
    remote_addr: SocketAddr,
) {
    let target = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        parts.method.to_string(),
        target,
    );
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_string(parts, "referer");
    entry.user_agent = header_string(parts, "user-agent");

    let format =
        AccessLogFormat::from_name(&state.config.logging.access_log_format).unwrap_or_default();
    logger::log_access(&entry, format);
}

/// `//host/x` would be a protocol-relative URL once echoed into `Location`
fn collapse_leading_slashes(path: &str) -> String {
    if path.starts_with("//") {
        format!("/{}", path.trim_start_matches('/'))
    } else {
        path.to_string()
    }
}

fn header_string(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
