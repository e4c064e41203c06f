/*!
Tests for the one-shot network diagnostic.
*/

use crate::common::{MockProbeClient, MockResolver};
use proxyopt::config::{DiagnosticSettings, DiagnosticTarget};
use proxyopt::core::network::diagnostic::NetworkDiagnostic;
use proxyopt::core::network::proxy_health::client::ProbeMethod;
use std::time::Duration;

const UA: &str = "proxyopt-test";

fn settings(targets: &[&str], domains: &[&str]) -> DiagnosticSettings {
    DiagnosticSettings {
        targets: targets
            .iter()
            .map(|url| DiagnosticTarget {
                description: format!("target {}", url),
                url: url.to_string(),
            })
            .collect(),
        dns_domains: domains.iter().map(|d| d.to_string()).collect(),
        ..DiagnosticSettings::default()
    }
}

#[tokio::test]
async fn test_connection_check_uses_head_and_accepts_redirects() {
    let client = MockProbeClient::new().respond("https://redirect.test", 302, "");
    let resolver = MockResolver::new();
    let settings = settings(&[], &[]);
    let diagnostic = NetworkDiagnostic::new(&client, &resolver, &settings, UA);

    let check = diagnostic.check_connection("redirect", "https://redirect.test").await;

    assert!(check.success);
    assert_eq!(check.http_code, 302);
    assert!(check.error.is_none());

    let call = &client.calls()[0];
    assert_eq!(call.method, ProbeMethod::Head);
    assert_eq!(call.max_redirects, None);
    assert_eq!(call.timeout, Duration::from_secs(10));
    assert_eq!(call.connect_timeout, Duration::from_secs(5));
    assert_eq!(call.user_agent, UA);
}

#[tokio::test]
async fn test_connection_check_failures() {
    let client = MockProbeClient::new()
        .respond("https://missing.test", 404, "")
        .fail("https://down.test", "Could not resolve host");
    let resolver = MockResolver::new();
    let settings = settings(&[], &[]);
    let diagnostic = NetworkDiagnostic::new(&client, &resolver, &settings, UA);

    let missing = diagnostic.check_connection("missing", "https://missing.test").await;
    assert!(!missing.success);
    assert_eq!(missing.http_code, 404);
    assert_eq!(missing.error.as_deref(), Some("HTTP 404"));

    let down = diagnostic.check_connection("down", "https://down.test").await;
    assert!(!down.success);
    assert_eq!(down.http_code, 0);
    assert_eq!(down.error.as_deref(), Some("Could not resolve host"));
}

#[tokio::test]
async fn test_dns_check_success() {
    let client = MockProbeClient::new();
    let resolver = MockResolver::new().resolve_to("qyapi.weixin.qq.com", &["101.91.40.66"]);
    let settings = settings(&[], &[]);
    let diagnostic = NetworkDiagnostic::new(&client, &resolver, &settings, UA);

    let check = diagnostic.check_dns("qyapi.weixin.qq.com").await;
    assert!(check.success);
    assert_eq!(check.address.as_deref(), Some("101.91.40.66"));
}

#[tokio::test]
async fn test_dns_check_ip_literal_resolving_to_itself_fails() {
    let client = MockProbeClient::new();
    let resolver = MockResolver::new().resolve_to("10.0.0.1", &["10.0.0.1"]);
    let settings = settings(&[], &[]);
    let diagnostic = NetworkDiagnostic::new(&client, &resolver, &settings, UA);

    let check = diagnostic.check_dns("10.0.0.1").await;
    assert!(!check.success);
    assert!(check.address.is_none());
}

#[tokio::test]
async fn test_dns_check_resolver_error_and_empty_answer() {
    let client = MockProbeClient::new();
    let resolver = MockResolver::new()
        .fail("nxdomain.test", "Resolution failed")
        .resolve_to("empty.test", &[]);
    let settings = settings(&[], &[]);
    let diagnostic = NetworkDiagnostic::new(&client, &resolver, &settings, UA);

    assert!(!diagnostic.check_dns("nxdomain.test").await.success);
    assert!(!diagnostic.check_dns("empty.test").await.success);
}

#[tokio::test]
async fn test_diagnose_summary_counts() {
    let client = MockProbeClient::new()
        .respond("https://a.test", 200, "")
        .respond("https://b.test", 503, "");
    let resolver = MockResolver::new()
        .resolve_to("one.test", &["192.0.2.1"])
        .resolve_to("two.test", &["192.0.2.2", "2001:db8::1"])
        .fail("three.test", "timeout");
    let settings = settings(&["https://a.test", "https://b.test"], &["one.test", "two.test", "three.test"]);

    let report = NetworkDiagnostic::new(&client, &resolver, &settings, UA)
        .diagnose()
        .await;

    assert_eq!(report.connections.len(), 2);
    assert_eq!(report.dns.len(), 3);
    assert_eq!(report.summary.connection_success, 1);
    assert_eq!(report.summary.connection_total, 2);
    assert_eq!(report.summary.dns_success, 2);
    assert_eq!(report.summary.dns_total, 3);
    assert!(!report.summary.is_normal());
    assert_eq!(report.summary.status_text(), "Abnormal");
}

#[tokio::test]
async fn test_diagnose_all_passing_is_normal() {
    let client = MockProbeClient::new().respond("https://a.test", 204, "");
    let resolver = MockResolver::new().resolve_to("one.test", &["192.0.2.1"]);
    let settings = settings(&["https://a.test"], &["one.test"]);

    let report = NetworkDiagnostic::new(&client, &resolver, &settings, UA)
        .diagnose()
        .await;

    assert!(report.summary.is_normal());
    assert_eq!(report.summary.status_text(), "Normal");
}
