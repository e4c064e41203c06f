/*!
Tests for candidate URL handling: endpoint joining, validation and display
shortening.
*/

use proxyopt::core::network::proxy_health::url::{
    join_endpoint, normalize_base_url, shorten_url, validate_candidate_url, UrlError,
    SHORT_URL_MAX_LEN,
};

#[test]
fn test_join_endpoint() {
    assert_eq!(join_endpoint("https://proxy.com", "/status"), "https://proxy.com/status");
    assert_eq!(join_endpoint("https://proxy.com/", "/status"), "https://proxy.com/status");
    assert_eq!(join_endpoint("https://proxy.com", "health"), "https://proxy.com/health");
    assert_eq!(join_endpoint("https://proxy.com", "/"), "https://proxy.com/");
}

#[test]
fn test_join_empty_endpoint_keeps_base() {
    assert_eq!(join_endpoint("http://host:1200", ""), "http://host:1200");
    assert_eq!(join_endpoint("http://host:1200/", ""), "http://host:1200/");
}

#[test]
fn test_normalize_base_url() {
    assert_eq!(normalize_base_url("https://proxy.com///"), "https://proxy.com");
    assert_eq!(normalize_base_url("https://proxy.com"), "https://proxy.com");
}

#[test]
fn test_validate_candidate_url() {
    assert!(validate_candidate_url("https://129888.xyz").is_ok());
    assert!(validate_candidate_url("http://ark.yanyuwangluo.cn:1200").is_ok());

    assert!(matches!(
        validate_candidate_url("ftp://proxy.com"),
        Err(UrlError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
    assert!(matches!(
        validate_candidate_url("not a url"),
        Err(UrlError::ParseError(_))
    ));
}

#[test]
fn test_shorten_url_keeps_short_urls() {
    assert_eq!(shorten_url("https://129888.xyz", SHORT_URL_MAX_LEN), "https://129888.xyz");
}

#[test]
fn test_shorten_url_truncates_long_path() {
    let url = "https://proxy.example.com/a/very/long/path/segment/that/keeps/going";
    let short = shorten_url(url, SHORT_URL_MAX_LEN);

    assert!(short.chars().count() <= SHORT_URL_MAX_LEN);
    assert!(short.starts_with("https://proxy.example.com/a/"));
    assert!(short.ends_with("..."));
}

#[test]
fn test_shorten_url_drops_query() {
    let url = "https://proxy.example.com/?token=abcdefghijklmnopqrstuvwxyz";
    assert_eq!(shorten_url(url, SHORT_URL_MAX_LEN), "https://proxy.example.com");
}

#[test]
fn test_shorten_url_unparseable_is_hard_truncated() {
    let raw = "x".repeat(60);
    let short = shorten_url(&raw, 20);
    assert_eq!(short.chars().count(), 20);
    assert!(short.ends_with("..."));
}
