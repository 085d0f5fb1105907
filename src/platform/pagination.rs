//! `Link` header pagination

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::sync::LazyLock;
use url::Url;

/// Items requested per page (GitHub's maximum)
pub const PER_PAGE: u32 = 100;

static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("next-link pattern is valid")
});

/// URL of the next page, if the response advertises one
pub fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(link)
}

/// Extract the `rel="next"` target from a `Link` header value
pub fn parse_next_link(link: &str) -> Option<String> {
    link.split(',')
        .find_map(|part| NEXT_LINK.captures(part.trim()))
        .map(|caps| caps[1].to_string())
}

/// Whether `candidate` points at the same scheme, host and port as `base`
///
/// Credentials are only sent to the configured API origin.
pub fn same_origin(base: &Url, candidate: &Url) -> bool {
    base.scheme() == candidate.scheme()
        && base.host_str() == candidate.host_str()
        && base.port_or_known_default() == candidate.port_or_known_default()
}
