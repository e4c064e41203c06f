//! URL Utilities for Proxy Probes
//!
//! Provides candidate URL handling:
//! - Endpoint joining for basic and business probes
//! - Candidate validation
//! - Display shortening for reports and notifications

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Missing host in URL")]
    MissingHost,
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Normalize base URL by trimming trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Append an endpoint suffix to a candidate base address
///
/// An empty suffix returns the base address untouched, so the basic probe
/// hits exactly the configured URL.
///
/// # Examples
/// - `("https://proxy.com", "/status")` → `https://proxy.com/status`
/// - `("https://proxy.com/", "/")` → `https://proxy.com/`
/// - `("http://host:1200", "")` → `http://host:1200`
/// - `("https://proxy.com", "health")` → `https://proxy.com/health`
pub fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    if endpoint.is_empty() {
        return base_url.to_string();
    }

    let normalized = normalize_base_url(base_url);
    if endpoint.starts_with('/') {
        format!("{}{}", normalized, endpoint)
    } else {
        format!("{}/{}", normalized, endpoint)
    }
}

/// Validate a candidate base address (http/https with a host)
pub fn validate_candidate_url(candidate: &str) -> Result<(), UrlError> {
    let url = Url::parse(candidate)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    url.host_str().ok_or(UrlError::MissingHost)?;
    Ok(())
}

/// Maximum display width used by reports
pub const SHORT_URL_MAX_LEN: usize = 40;

/// Shorten a URL for display
///
/// URLs within `max_len` characters are returned as-is. Longer ones are
/// reduced to `scheme://host` plus a truncated path, and finally hard
/// truncated with `...`. Unparseable input is only hard truncated.
pub fn shorten_url(url_str: &str, max_len: usize) -> String {
    if url_str.chars().count() <= max_len {
        return url_str.to_string();
    }

    let shortened = match Url::parse(url_str) {
        Ok(url) => {
            let prefix = format!("{}://{}", url.scheme(), url.host_str().unwrap_or(""));
            let path = url.path();
            let path = if path == "/" { "" } else { path };

            let prefix_len = prefix.chars().count();
            let path = if !path.is_empty() && prefix_len + path.chars().count() > max_len {
                let keep = max_len.saturating_sub(prefix_len + 3);
                format!("{}...", truncate_chars(path, keep))
            } else {
                path.to_string()
            };
            format!("{}{}", prefix, path)
        }
        Err(_) => url_str.to_string(),
    };

    if shortened.chars().count() > max_len {
        format!("{}...", truncate_chars(&shortened, max_len.saturating_sub(3)))
    } else {
        shortened
    }
}

fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
