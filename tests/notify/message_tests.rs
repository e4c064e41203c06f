use proxyopt::core::config_store::{ConfigUpdateResult, MSG_ALL_FAILED, MSG_ALREADY_OPTIMAL};
use proxyopt::core::network::types::{DiagnosticSummary, EvaluationOutcome, ProbeResult};
use proxyopt::notify::message::{build_message, TITLE_ALL_FAILED, TITLE_NORMAL, TITLE_UPDATED};
use proxyopt::notify::NotificationContext;
use std::path::PathBuf;
use std::time::Duration;

const CHECKED_AT: &str = "2026-10-16T08:00:00+08:00";

fn healthy() -> DiagnosticSummary {
    DiagnosticSummary {
        connection_success: 4,
        connection_total: 4,
        dns_success: 3,
        dns_total: 3,
    }
}

fn passing(millis: u64) -> ProbeResult {
    ProbeResult {
        success: true,
        status_code: 200,
        elapsed: Duration::from_millis(millis),
        error: None,
        body_preview: None,
    }
}

fn refused() -> ProbeResult {
    ProbeResult::transport_failure("connection refused", Duration::from_millis(2))
}

fn mixed_outcomes() -> Vec<EvaluationOutcome> {
    let mut last = passing(700);
    last.success = false;
    last.status_code = 500;
    last.error = Some("HTTP 500".to_string());

    vec![
        EvaluationOutcome::basic_failed(0, "https://a.test", &refused()),
        EvaluationOutcome::basic_only(1, "https://b.test", "/", &last),
        EvaluationOutcome::business_ready(2, "https://c.test", "/api/status", &passing(345)),
    ]
}

#[test]
fn test_updated_report() {
    let outcomes = mixed_outcomes();
    let diagnostic = healthy();
    let update = ConfigUpdateResult {
        updated: true,
        old_proxy: "https://a.test".to_string(),
        new_proxy: "https://c.test".to_string(),
        backup_file: Some(PathBuf::from("/tmp/Config.json.backup.20261016080000")),
        message: "Configuration updated to the optimal proxy".to_string(),
    };
    let context = NotificationContext {
        diagnostic: &diagnostic,
        outcomes: &outcomes,
        config_update: &update,
        current_proxy: "https://a.test",
        all_failed: false,
        checked_at: CHECKED_AT.to_string(),
    };

    let message = build_message(&context);

    assert_eq!(message.title, TITLE_UPDATED);
    let body = &message.description;
    assert!(body.starts_with(&format!("⏰ Checked at: {}", CHECKED_AT)));
    assert!(body.contains("✅ Network diagnosis: Normal"));
    assert!(body.contains("📡 Connection tests: 4/4 succeeded"));
    assert!(body.contains("🔍 DNS resolution: 3/3 succeeded"));
    assert!(body.contains("🚀 Proxy tests: 1 business ready, 1 basic only, 1 failed"));
    assert!(body.contains("🔄 Configuration updated"));
    assert!(body.contains("📝 Previous: https://a.test"));
    assert!(body.contains("🆕 New: https://c.test"));
    assert!(body.contains("❌ https://a.test - failed [current]"));
    assert!(body.contains("⚠️ https://b.test - 0.700s"));
    assert!(body.contains("✅ https://c.test - 0.345s"));
}

#[test]
fn test_unchanged_report() {
    let outcomes = mixed_outcomes();
    let diagnostic = DiagnosticSummary {
        dns_success: 2,
        ..healthy()
    };
    let update = ConfigUpdateResult::unchanged("https://c.test", "https://c.test", MSG_ALREADY_OPTIMAL);
    let context = NotificationContext {
        diagnostic: &diagnostic,
        outcomes: &outcomes,
        config_update: &update,
        current_proxy: "https://c.test",
        all_failed: false,
        checked_at: CHECKED_AT.to_string(),
    };

    let message = build_message(&context);

    assert_eq!(message.title, TITLE_NORMAL);
    assert!(message.description.contains("⚠️ Network diagnosis: Abnormal"));
    assert!(message
        .description
        .contains(&format!("ℹ️ {}", MSG_ALREADY_OPTIMAL)));
    assert!(message.description.contains("📍 Current: https://c.test"));
    assert!(message.description.contains("✅ https://c.test - 0.345s [current]"));
    assert!(!message.description.contains("🔄 Configuration updated"));
}

#[test]
fn test_all_failed_alert() {
    let outcomes = vec![
        EvaluationOutcome::basic_failed(0, "https://a.test", &refused()),
        EvaluationOutcome::basic_failed(1, "https://b.test", &refused()),
    ];
    let diagnostic = healthy();
    let update = ConfigUpdateResult::unchanged("https://b.test", "", MSG_ALL_FAILED);
    let context = NotificationContext {
        diagnostic: &diagnostic,
        outcomes: &outcomes,
        config_update: &update,
        current_proxy: "https://b.test",
        all_failed: true,
        checked_at: CHECKED_AT.to_string(),
    };

    let message = build_message(&context);

    assert_eq!(message.title, TITLE_ALL_FAILED);
    let body = &message.description;
    assert!(body.contains("🚨 Every proxy address failed"));
    assert!(body.contains("1. ❌ https://a.test - connection failed\n   Error: connection refused"));
    assert!(body.contains("2. ❌ https://b.test - connection failed [current config]"));
    assert!(body.ends_with("⚠️ Advice: check the network connection or contact an administrator"));
}

#[test]
fn test_long_urls_are_shortened() {
    let long = "https://proxy.example.com/a/very/long/path/that/exceeds/the/limit";
    let outcomes = vec![EvaluationOutcome::business_ready(0, long, "/", &passing(100))];
    let diagnostic = healthy();
    let update = ConfigUpdateResult::unchanged(long, long, MSG_ALREADY_OPTIMAL);
    let context = NotificationContext {
        diagnostic: &diagnostic,
        outcomes: &outcomes,
        config_update: &update,
        current_proxy: long,
        all_failed: false,
        checked_at: CHECKED_AT.to_string(),
    };

    let message = build_message(&context);
    assert!(!message.description.contains(long));
    assert!(message.description.contains("https://proxy.example.com/"));
}
