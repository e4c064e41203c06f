//! Proxy Health Evaluation
//!
//! Tiered evaluation of each candidate:
//! 1. Basic probe: GET `candidate + test_endpoint`, must return HTTP 200 with
//!    the "pong" marker in its body
//! 2. Business probe (only after a passing basic probe): walk the business
//!    endpoint list in order and stop at the first clean response
//!
//! Candidates are evaluated sequentially. The pacing delay follows every
//! candidate that reached the business stage, except the last one. Once the
//! optional deadline has passed no further candidate is probed; the remainder
//! is recorded as `BasicFailed` so that selection still sees every candidate.

use std::time::{Duration, Instant};

use crate::config::ProbeSettings;
use crate::core::network::debug_logger::EnhancedDebugLogger;
use crate::core::network::proxy_health::{
    classify::{classify_basic, classify_business},
    client::{ProbeClient, ProbeRequest},
    probe::run_probe,
    url::join_endpoint,
};
use crate::core::network::types::{EvaluationOutcome, EvaluationState, ProbeResult};

/// Error recorded for candidates skipped after the deadline
pub const MSG_TIME_LIMIT: &str = "run time limit reached";

/// Evaluates candidates against the configured probe thresholds
pub struct ProxyEvaluator<'a> {
    client: &'a dyn ProbeClient,
    settings: &'a ProbeSettings,
    logger: EnhancedDebugLogger,
    show_progress: bool,
    deadline: Option<Instant>,
}

impl<'a> ProxyEvaluator<'a> {
    pub fn new(client: &'a dyn ProbeClient, settings: &'a ProbeSettings) -> Self {
        Self {
            client,
            settings,
            logger: EnhancedDebugLogger::new(),
            show_progress: false,
            deadline: None,
        }
    }

    /// Stop starting new candidates once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Print per-candidate progress lines to stdout
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Evaluate every candidate, returning outcomes in input order
    pub async fn evaluate(&self, candidates: &[String]) -> Vec<EvaluationOutcome> {
        let total = candidates.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, candidate) in candidates.iter().enumerate() {
            if self.show_progress {
                println!("Testing [{}/{}]: {}", index + 1, total, candidate);
            }

            let outcome = if self.deadline_passed() {
                let skipped = ProbeResult::transport_failure(MSG_TIME_LIMIT, Duration::ZERO);
                EvaluationOutcome::basic_failed(index, candidate, &skipped)
            } else {
                self.evaluate_candidate(index, candidate).await
            };

            if self.show_progress {
                print_outcome(&outcome);
            }
            self.logger.evaluation_outcome(&outcome);
            let paced = outcome.state != EvaluationState::BasicFailed;
            outcomes.push(outcome);

            let pacing = self.settings.pacing();
            if paced && index + 1 < total && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }

        outcomes
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Run both stages for one candidate
    pub async fn evaluate_candidate(&self, index: usize, candidate: &str) -> EvaluationOutcome {
        let basic = self.basic_probe(candidate).await;
        if !basic.success {
            return EvaluationOutcome::basic_failed(index, candidate, &basic);
        }

        let (endpoint, business) = self.business_probe(candidate).await;
        if business.success {
            EvaluationOutcome::business_ready(index, candidate, endpoint, &business)
        } else {
            EvaluationOutcome::basic_only(index, candidate, endpoint, &business)
        }
    }

    /// Stage 1: reachability with the "pong" marker
    pub async fn basic_probe(&self, candidate: &str) -> ProbeResult {
        let url = join_endpoint(candidate, &self.settings.test_endpoint);
        let timeout = self.settings.basic_timeout();
        let request = ProbeRequest::get(&url, &self.settings.user_agent)
            .with_timeouts(timeout, timeout)
            .with_max_redirects(Some(self.settings.max_redirects));

        self.logger.probe_start("basic", &url, timeout.as_millis() as u64);
        let marker = self.settings.basic_marker.as_str();
        let result = run_probe(self.client, request, |response| classify_basic(response, marker)).await;
        self.logger.probe_end("basic", &url, &result);
        result
    }

    /// Stage 2: first business endpoint with a clean response
    ///
    /// When every endpoint fails, the result of the last attempt is returned
    /// (not the first or "best" failure), together with its endpoint.
    pub async fn business_probe(&self, candidate: &str) -> (String, ProbeResult) {
        let mut last: Option<(String, ProbeResult)> = None;

        for endpoint in &self.settings.business_endpoints {
            let result = self.business_attempt(candidate, endpoint).await;
            if result.success {
                return (endpoint.clone(), result);
            }
            last = Some((endpoint.clone(), result));
        }

        last.unwrap_or_else(|| {
            (
                String::new(),
                ProbeResult::transport_failure("no business endpoints configured", Default::default()),
            )
        })
    }

    async fn business_attempt(&self, candidate: &str, endpoint: &str) -> ProbeResult {
        let url = join_endpoint(candidate, endpoint);
        let request = ProbeRequest::get(&url, &self.settings.user_agent)
            .with_timeouts(
                self.settings.business_timeout(),
                self.settings.business_connect_timeout(),
            )
            .with_max_redirects(Some(self.settings.max_redirects));

        self.logger.probe_start(
            "business",
            &url,
            self.settings.business_timeout().as_millis() as u64,
        );
        let markers = self.settings.error_markers.as_slice();
        let result = run_probe(self.client, request, |response| {
            classify_business(response, markers)
        })
        .await;
        self.logger.probe_end("business", &url, &result);
        result
    }
}

fn print_outcome(outcome: &EvaluationOutcome) {
    let time = outcome
        .response_time_display()
        .map(|t| format!(" - {}", t))
        .unwrap_or_default();
    let error = outcome
        .error
        .as_deref()
        .map(|e| format!(" ({})", e))
        .unwrap_or_default();
    println!(
        "  {} {}{}{}",
        outcome.state.emoji(),
        outcome.state.label(),
        time,
        error
    );
    println!("{}", "-".repeat(50));
}
