//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! static file handler.

pub mod cache;
pub mod mime;
pub mod no_cache;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use no_cache::{apply_no_cache_headers, NoCache};
pub use range::{parse_range, ByteRange, RangeRequest};
pub use response::{
    build_304_response, build_416_response, build_error_response, build_file_response,
    build_html_response, build_partial_response, build_redirect_response,
};

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
