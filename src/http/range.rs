//! HTTP Range request parsing module
//!
//! Single byte-range support (RFC 7233). Multi-range requests are answered
//! with the full representation.

/// Inclusive byte range resolved against a concrete file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn content_length(&self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this range
    pub fn content_range(&self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// What a request's Range header asks for
#[derive(Debug, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable Range header, serve the whole file
    Full,
    Partial(ByteRange),
    /// Syntactically valid but outside the file, answer 416
    NotSatisfiable,
}

/// Parse an HTTP Range header against a file of `file_size` bytes
///
/// Supported formats:
/// - `bytes=start-end`
/// - `bytes=start-`
/// - `bytes=-suffix` (last `suffix` bytes)
///
/// # Examples
/// ```
/// use devserve::http::range::{parse_range, ByteRange, RangeRequest};
///
/// assert_eq!(
///     parse_range(Some("bytes=0-99"), 1000),
///     RangeRequest::Partial(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range(None, 1000), RangeRequest::Full);
/// ```
pub fn parse_range(range_header: Option<&str>, file_size: usize) -> RangeRequest {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeRequest::Full;
    };

    if spec.contains(',') {
        return RangeRequest::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeRequest::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeRequest::Full;
        };
        if suffix == 0 || file_size == 0 {
            return RangeRequest::NotSatisfiable;
        }
        return RangeRequest::Partial(ByteRange {
            start: file_size.saturating_sub(suffix),
            end: file_size - 1,
        });
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeRequest::Full;
    };

    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<usize>() {
            Ok(e) => Some(e),
            Err(_) => return RangeRequest::Full,
        }
    };

    // "500-100" is invalid syntax, not an unsatisfiable range
    if end.is_some_and(|e| e < start) {
        return RangeRequest::Full;
    }

    if start >= file_size {
        return RangeRequest::NotSatisfiable;
    }

    let last = file_size - 1;
    RangeRequest::Partial(ByteRange {
        start,
        end: end.map_or(last, |e| e.min(last)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_range() {
        let r = parse_range(Some("bytes=0-9"), 100);
        assert_eq!(r, RangeRequest::Partial(ByteRange { start: 0, end: 9 }));
        if let RangeRequest::Partial(range) = r {
            assert_eq!(range.content_length(), 10);
            assert_eq!(range.content_range(100), "bytes 0-9/100");
        }
    }

    #[test]
    fn test_open_and_clamped_ranges() {
        assert_eq!(
            parse_range(Some("bytes=50-"), 100),
            RangeRequest::Partial(ByteRange { start: 50, end: 99 })
        );
        assert_eq!(
            parse_range(Some("bytes=90-500"), 100),
            RangeRequest::Partial(ByteRange { start: 90, end: 99 })
        );
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            parse_range(Some("bytes=-20"), 100),
            RangeRequest::Partial(ByteRange { start: 80, end: 99 })
        );
        // Suffix longer than the file selects all of it
        assert_eq!(
            parse_range(Some("bytes=-500"), 100),
            RangeRequest::Partial(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(parse_range(Some("bytes=200-"), 100), RangeRequest::NotSatisfiable);
        assert_eq!(parse_range(Some("bytes=-0"), 100), RangeRequest::NotSatisfiable);
        assert_eq!(parse_range(Some("bytes=0-"), 0), RangeRequest::NotSatisfiable);
        assert_eq!(parse_range(Some("bytes=-5"), 0), RangeRequest::NotSatisfiable);
    }

    #[test]
    fn test_ignored_headers() {
        assert_eq!(parse_range(None, 100), RangeRequest::Full);
        assert_eq!(parse_range(Some("bytes=a-b"), 100), RangeRequest::Full);
        assert_eq!(parse_range(Some("bytes=0-9,20-29"), 100), RangeRequest::Full);
        assert_eq!(parse_range(Some("items=0-9"), 100), RangeRequest::Full);
        assert_eq!(parse_range(Some("bytes=50-10"), 100), RangeRequest::Full);
    }
}
