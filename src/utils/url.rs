// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Non-empty path segments of a URL.
///
/// # Examples
/// ```
/// use ats_search::utils::url::path_segments;
///
/// let url = url::Url::parse("https://jobs.lever.co/acme/").unwrap();
/// assert_eq!(path_segments(&url), vec!["acme".to_string()]);
/// ```
pub fn path_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// First non-empty path segment, if any.
pub fn first_segment(url: &Url) -> Option<String> {
    path_segments(url).into_iter().next()
}

/// Last non-empty path segment, if any.
pub fn last_segment(url: &Url) -> Option<String> {
    path_segments(url).pop()
}

/// Whether the URL host is `domain` or one of its subdomains (case-insensitive).
pub fn host_ends_with(url: &Url, domain: &str) -> bool {
    url.host_str()
        .map(|host| host.to_lowercase().ends_with(&domain.to_lowercase()))
        .unwrap_or(false)
}
