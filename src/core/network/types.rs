// Core types for proxy probing, evaluation and selection
use std::time::Duration;

/// Outcome of a single HTTP attempt against a candidate or reference target
///
/// Transport failures never surface as errors: they are folded into a
/// negative result with `status_code == 0` and the transport message in `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Whether the attempt satisfied the classification rule of its stage
    pub success: bool,
    /// HTTP status code (0 if no response was obtained)
    pub status_code: u16,
    /// Wall-clock time spent on the attempt
    pub elapsed: Duration,
    /// Reason the attempt was judged negative (None on success)
    pub error: Option<String>,
    /// First bytes of the response body, lossily decoded
    pub body_preview: Option<String>,
}

impl ProbeResult {
    /// Negative result for an attempt that never produced a response
    pub fn transport_failure(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            status_code: 0,
            elapsed,
            error: Some(error.into()),
            body_preview: None,
        }
    }

    /// True when a response (of any status) was received
    pub fn has_response(&self) -> bool {
        self.status_code != 0
    }
}

/// Terminal evaluation state of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationState {
    /// No acceptable basic response ("pong" probe failed)
    BasicFailed,
    /// Reachable, but no business endpoint confirmed success
    BasicOnly,
    /// A business endpoint confirmed success
    BusinessReady,
}

impl EvaluationState {
    /// Whether the basic probe succeeded for this state
    pub fn is_reachable(&self) -> bool {
        !matches!(self, EvaluationState::BasicFailed)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            EvaluationState::BusinessReady => "✅",
            EvaluationState::BasicOnly => "⚠️",
            EvaluationState::BasicFailed => "❌",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvaluationState::BusinessReady => "Business ready",
            EvaluationState::BasicOnly => "Basic only",
            EvaluationState::BasicFailed => "Failed",
        }
    }
}

/// Per-candidate result of the full tiered evaluation
///
/// Built only through the state constructors so that `BusinessReady`
/// always implies a successful basic probe and `BasicFailed` never
/// carries a response time.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationOutcome {
    /// Position of the candidate in the configured list
    pub index: usize,
    /// Candidate base address
    pub url: String,
    pub state: EvaluationState,
    /// Time of the deciding business attempt (None for BasicFailed)
    pub response_time: Option<Duration>,
    /// HTTP status of the deciding attempt, when one was received
    pub http_code: Option<u16>,
    /// Failure description when not fully successful
    pub error: Option<String>,
    /// Business endpoint suffix that decided the outcome
    pub endpoint: Option<String>,
}

impl EvaluationOutcome {
    pub fn basic_failed(index: usize, url: impl Into<String>, basic: &ProbeResult) -> Self {
        Self {
            index,
            url: url.into(),
            state: EvaluationState::BasicFailed,
            response_time: None,
            http_code: basic.has_response().then_some(basic.status_code),
            error: Some(
                basic
                    .error
                    .clone()
                    .unwrap_or_else(|| "connection failed or invalid response".to_string()),
            ),
            endpoint: None,
        }
    }

    pub fn basic_only(
        index: usize,
        url: impl Into<String>,
        endpoint: impl Into<String>,
        last_attempt: &ProbeResult,
    ) -> Self {
        Self {
            index,
            url: url.into(),
            state: EvaluationState::BasicOnly,
            response_time: Some(last_attempt.elapsed),
            http_code: last_attempt.has_response().then_some(last_attempt.status_code),
            error: last_attempt.error.clone(),
            endpoint: Some(endpoint.into()),
        }
    }

    pub fn business_ready(
        index: usize,
        url: impl Into<String>,
        endpoint: impl Into<String>,
        attempt: &ProbeResult,
    ) -> Self {
        Self {
            index,
            url: url.into(),
            state: EvaluationState::BusinessReady,
            response_time: Some(attempt.elapsed),
            http_code: Some(attempt.status_code),
            error: None,
            endpoint: Some(endpoint.into()),
        }
    }

    /// Response time rendered in seconds with millisecond precision
    pub fn response_time_display(&self) -> Option<String> {
        self.response_time
            .map(|t| format!("{:.3}s", t.as_secs_f64()))
    }
}

/// Single reference-target connection check
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCheck {
    pub description: String,
    pub url: String,
    pub success: bool,
    pub http_code: u16,
    pub response_time: Duration,
    pub error: Option<String>,
}

/// Single DNS resolution check
#[derive(Debug, Clone, PartialEq)]
pub struct DnsCheck {
    pub domain: String,
    /// First resolved address distinct from the input
    pub address: Option<String>,
    pub elapsed: Duration,
    pub success: bool,
}

/// Aggregate pass/fail counts of the diagnostic probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagnosticSummary {
    pub connection_success: usize,
    pub connection_total: usize,
    pub dns_success: usize,
    pub dns_total: usize,
}

impl DiagnosticSummary {
    /// Normal iff every connection check and every DNS check succeeded
    pub fn is_normal(&self) -> bool {
        self.connection_success == self.connection_total && self.dns_success == self.dns_total
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_normal() {
            "Normal"
        } else {
            "Abnormal"
        }
    }
}

/// Full diagnostic output: individual checks plus their summary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagnosticReport {
    pub connections: Vec<ConnectionCheck>,
    pub dns: Vec<DnsCheck>,
    pub summary: DiagnosticSummary,
}

impl DiagnosticReport {
    pub fn new(connections: Vec<ConnectionCheck>, dns: Vec<DnsCheck>) -> Self {
        let summary = DiagnosticSummary {
            connection_success: connections.iter().filter(|c| c.success).count(),
            connection_total: connections.len(),
            dns_success: dns.iter().filter(|d| d.success).count(),
            dns_total: dns.len(),
        };
        Self {
            connections,
            dns,
            summary,
        }
    }
}

/// Tier through which a winner was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTier {
    /// Chosen among BusinessReady outcomes
    Business,
    /// No BusinessReady outcome; chosen among reachable outcomes
    Reachable,
}

/// Result of the tiered selection policy
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Winner {
        outcome: EvaluationOutcome,
        tier: SelectionTier,
    },
    /// Every candidate failed the basic probe
    NoCandidate,
}

impl Selection {
    pub fn winner(&self) -> Option<&EvaluationOutcome> {
        match self {
            Selection::Winner { outcome, .. } => Some(outcome),
            Selection::NoCandidate => None,
        }
    }

    pub fn is_all_failed(&self) -> bool {
        matches!(self, Selection::NoCandidate)
    }
}

/// Network layer errors (only precondition faults, probes never raise)
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("HTTP capability unavailable: {0}")]
    HttpUnavailable(String),
}

// Environment variable utilities
/// Parse boolean environment variables
///
/// Accepts true/1/yes/on (case insensitive); anything else, or unset, is false.
pub fn parse_env_bool(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}

/// Local timezone ISO-8601 timestamp used across logs and reports
pub fn get_local_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}
