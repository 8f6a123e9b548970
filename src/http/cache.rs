//! HTTP cache validation module
//!
//! `Last-Modified` formatting and `If-Modified-Since` handling. Responses are
//! never cacheable here, but browsers still revalidate with conditional
//! requests and a 304 saves resending unchanged files.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use std::time::SystemTime;

/// RFC 7231 preferred date format, always in GMT
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
/// Obsolete formats recipients must still accept
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME_DATE: &str = "%a %b %e %H:%M:%S %Y";

/// Format a timestamp as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP date in any of the three RFC 7231 formats
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    [IMF_FIXDATE, RFC850_DATE, ASCTIME_DATE]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_rfc2822(value)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        })
}

/// Whether a conditional GET can be answered with 304 Not Modified
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no entity
/// tags are issued, its presence disables the date check. Unparseable dates
/// are ignored.
pub fn is_not_modified(
    modified: SystemTime,
    if_modified_since: Option<&str>,
    if_none_match: Option<&str>,
) -> bool {
    if if_none_match.is_some() {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).trunc_subsecs(0) <= since
}
