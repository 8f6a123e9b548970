//! Static file serving module
//!
//! Maps request paths onto the server root and answers with file contents,
//! index files, or directory listings.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, RangeRequest};
use crate::logger;

/// Request path resolved against the server root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    pub fs_path: PathBuf,
    /// The request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a URL path into a filesystem path under `root`
///
/// The path is percent-decoded and normalized: `..` removes the previous
/// segment but never climbs above `root`, and empty, `.` or otherwise
/// non-plain segments are dropped. Symbolic links are not resolved.
pub fn translate_path(root: &Path, url_path: &str) -> TranslatedPath {
    let path = url_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_plain_segment(s) => segments.push(s),
            _ => {}
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    TranslatedPath {
        fs_path,
        trailing_slash: path.trim_end().ends_with('/'),
    }
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.contains('\0') {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Serve a GET or HEAD request from the server root
pub async fn serve(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let target = translate_path(&state.root, &ctx.path);

    let Ok(metadata) = fs::metadata(&target.fs_path).await else {
        return not_found(ctx, "File not found");
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &target.fs_path).await;
    }

    if target.trailing_slash {
        return not_found(ctx, "File not found");
    }

    serve_file(ctx, &target.fs_path, &metadata).await
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let location = match &ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index in &state.config.files.index_files {
        let candidate = dir.join(index);
        if let Ok(metadata) = fs::metadata(&candidate).await {
            if metadata.is_file() {
                return serve_file(ctx, &candidate, &metadata).await;
            }
        }
    }

    if !state.config.files.directory_listing {
        return not_found(ctx, "No permission to list directory");
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            let display_path = percent_decode_str(&ctx.path).decode_utf8_lossy();
            let html = listing::render_listing(&display_path, &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!("Cannot list '{}': {e}", dir.display()));
            not_found(ctx, "No permission to list directory")
        }
    }
}

/// Serve a single regular file, honoring conditional and range headers
async fn serve_file(
    ctx: &RequestContext,
    path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().ok();
    let last_modified = cache::format_http_date(modified.unwrap_or_else(SystemTime::now));

    if let Some(modified) = modified {
        if cache::is_not_modified(
            modified,
            ctx.if_modified_since.as_deref(),
            ctx.if_none_match.as_deref(),
        ) {
            return http::build_304_response(&last_modified);
        }
    }

    let data = match fs::read(path).await {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                logger::log_warning(&format!("Failed to read '{}': {e}", path.display()));
            }
            return not_found(ctx, "File not found");
        }
    };

    let content_type = mime::content_type_for(path);

    match http::parse_range(ctx.range_header.as_deref(), data.len()) {
        RangeRequest::Full => {
            http::build_file_response(data, content_type, &last_modified, ctx.is_head)
        }
        RangeRequest::Partial(range) => http::build_partial_response(
            &data,
            range,
            content_type,
            &last_modified,
            ctx.is_head,
        ),
        RangeRequest::NotSatisfiable => http::build_416_response(data.len(), ctx.is_head),
    }
}

fn not_found(ctx: &RequestContext, message: &str) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, message, ctx.is_head)
}
