// Console rendering of evaluation results
use crate::core::network::types::{EvaluationOutcome, EvaluationState, Selection};

/// Renders the end-of-run summary table for terminal output
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one line per candidate plus counts and the recommendation
    ///
    /// Line format: `<url> - <emoji> <label>[ [current]][ [recommended]]`,
    /// followed by indented time/HTTP and error lines when present.
    pub fn render_summary(
        &self,
        outcomes: &[EvaluationOutcome],
        selection: &Selection,
        current_proxy: &str,
    ) -> String {
        if selection.is_all_failed() {
            return self.render_all_failed(outcomes);
        }

        let recommended = selection.winner().map(|w| w.url.as_str());
        let mut lines = vec!["=== Test result summary ===".to_string()];

        for outcome in outcomes {
            let current_mark = if outcome.url == current_proxy { " [current]" } else { "" };
            let best_mark = if Some(outcome.url.as_str()) == recommended {
                " [recommended]"
            } else {
                ""
            };
            lines.push(format!(
                "{} - {} {}{}{}",
                outcome.url,
                outcome.state.emoji(),
                outcome.state.label(),
                current_mark,
                best_mark
            ));

            if let Some(time) = outcome.response_time_display() {
                let http = outcome
                    .http_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                lines.push(format!("   Response time: {} | HTTP: {}", time, http));
            }
            if let Some(error) = &outcome.error {
                lines.push(format!("   Error: {}", error));
            }
        }

        let business = count_state(outcomes, EvaluationState::BusinessReady);
        let basic_only = count_state(outcomes, EvaluationState::BasicOnly);
        lines.push(String::new());
        lines.push(format!(
            "📊 Stats: {} business ready, {} basic only",
            business, basic_only
        ));

        if let Some(winner) = selection.winner() {
            let time = winner
                .response_time_display()
                .map(|t| format!(" (response time: {})", t))
                .unwrap_or_default();
            lines.push(format!("🏆 Recommended proxy: {}{}", winner.url, time));
        }

        lines.join("\n")
    }

    fn render_all_failed(&self, outcomes: &[EvaluationOutcome]) -> String {
        let mut lines = vec!["❌ All proxy addresses are unavailable!".to_string()];
        for outcome in outcomes {
            let error = outcome.error.as_deref().unwrap_or("unknown error");
            lines.push(format!("   {} - {}", outcome.url, error));
        }
        lines.join("\n")
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of outcomes in the given state
pub fn count_state(outcomes: &[EvaluationOutcome], state: EvaluationState) -> usize {
    outcomes.iter().filter(|o| o.state == state).count()
}
