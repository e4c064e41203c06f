// Message composition for run reports
use super::NotificationContext;
use crate::core::network::proxy_health::url::{shorten_url, SHORT_URL_MAX_LEN};
use crate::core::network::report_renderer::count_state;
use crate::core::network::types::{DiagnosticSummary, EvaluationState};
use std::fmt::Write;

pub const TITLE_UPDATED: &str = "🔄 Proxy configuration optimized";
pub const TITLE_NORMAL: &str = "✅ Network status normal";
pub const TITLE_ALL_FAILED: &str = "❌ URGENT: all proxies unavailable";

/// Title and multi-line body of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent {
    pub title: String,
    pub description: String,
}

/// Pick the template matching the run and render it
pub fn build_message(context: &NotificationContext<'_>) -> MessageContent {
    if context.all_failed {
        build_all_failed_message(context)
    } else {
        build_report_message(context)
    }
}

fn short(url: &str) -> String {
    shorten_url(url, SHORT_URL_MAX_LEN)
}

fn push_diagnostic(description: &mut String, summary: &DiagnosticSummary) {
    let emoji = if summary.is_normal() { "✅" } else { "⚠️" };
    let _ = writeln!(description, "{} Network diagnosis: {}", emoji, summary.status_text());
    let _ = writeln!(
        description,
        "📡 Connection tests: {}/{} succeeded",
        summary.connection_success, summary.connection_total
    );
    let _ = writeln!(
        description,
        "🔍 DNS resolution: {}/{} succeeded",
        summary.dns_success, summary.dns_total
    );
    description.push('\n');
}

/// Regular template: counts, config change and per-candidate details
pub fn build_report_message(context: &NotificationContext<'_>) -> MessageContent {
    let update = context.config_update;
    let outcomes = context.outcomes;

    let title = if update.updated { TITLE_UPDATED } else { TITLE_NORMAL };

    let mut description = format!("⏰ Checked at: {}\n\n", context.checked_at);
    push_diagnostic(&mut description, context.diagnostic);

    let _ = writeln!(
        description,
        "🚀 Proxy tests: {} business ready, {} basic only, {} failed",
        count_state(outcomes, EvaluationState::BusinessReady),
        count_state(outcomes, EvaluationState::BasicOnly),
        count_state(outcomes, EvaluationState::BasicFailed)
    );

    if update.updated {
        description.push_str("\n🔄 Configuration updated\n");
        let _ = writeln!(description, "📝 Previous: {}", short(&update.old_proxy));
        let _ = writeln!(description, "🆕 New: {}", short(&update.new_proxy));
    } else {
        let _ = writeln!(description, "\nℹ️ {}", update.message);
        let _ = writeln!(description, "📍 Current: {}", short(context.current_proxy));
    }

    description.push_str("\n📊 Details:\n");
    for outcome in outcomes {
        let time = outcome
            .response_time_display()
            .unwrap_or_else(|| "failed".to_string());
        let current = if outcome.url == context.current_proxy { " [current]" } else { "" };
        let _ = writeln!(
            description,
            "{} {} - {}{}",
            outcome.state.emoji(),
            short(&outcome.url),
            time,
            current
        );
    }

    MessageContent {
        title: title.to_string(),
        description,
    }
}

/// Alarm template used when every candidate failed the basic probe
pub fn build_all_failed_message(context: &NotificationContext<'_>) -> MessageContent {
    let mut description = format!("⏰ Checked at: {}\n\n", context.checked_at);
    description.push_str("🚨 Every proxy address failed, check immediately!\n\n");
    push_diagnostic(&mut description, context.diagnostic);

    description.push_str("📋 Proxy test details:\n");
    for (position, outcome) in context.outcomes.iter().enumerate() {
        let time = outcome
            .response_time_display()
            .unwrap_or_else(|| "connection failed".to_string());
        let current = if outcome.url == context.current_proxy {
            " [current config]"
        } else {
            ""
        };
        let _ = writeln!(
            description,
            "{}. {} {} - {}{}",
            position + 1,
            outcome.state.emoji(),
            short(&outcome.url),
            time,
            current
        );
        if let Some(error) = outcome.error.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(description, "   Error: {}", error);
        }
    }

    description.push_str("\n⚠️ Advice: check the network connection or contact an administrator");

    MessageContent {
        title: TITLE_ALL_FAILED.to_string(),
        description,
    }
}
