//! Probe Response Classification
//!
//! Pure classification rules for the two probe stages:
//! - Basic: no transport error, HTTP 200 exactly, body contains the marker
//!   ("pong") case-insensitively
//! - Business: a response was received, HTTP status in [200, 400), and the
//!   lower-cased body contains none of the error markers

use crate::core::network::proxy_health::client::ProbeResponse;
use std::fmt;

/// Maximum number of characters kept as response preview
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Classification verdict for one probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// No response obtained
    Transport(String),
    /// Response status outside the accepted range
    Status(u16),
    /// Basic probe body lacks the required marker
    MissingMarker(String),
    /// Business probe body contains an error marker
    ErrorMarker(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Failure description, None for `Pass`
    pub fn reason(&self) -> Option<String> {
        match self {
            Verdict::Pass => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "ok"),
            Verdict::Transport(msg) => write!(f, "{}", msg),
            Verdict::Status(code) => write!(f, "HTTP {}", code),
            Verdict::MissingMarker(marker) => write!(f, "response missing \"{}\" marker", marker),
            Verdict::ErrorMarker(marker) => {
                write!(f, "response contains error marker \"{}\"", marker)
            }
        }
    }
}

/// Classify a basic (reachability) probe
pub fn classify_basic(response: Result<&ProbeResponse, &str>, marker: &str) -> Verdict {
    let response = match response {
        Ok(response) => response,
        Err(error) => return Verdict::Transport(error.to_string()),
    };

    if response.status_code != 200 {
        return Verdict::Status(response.status_code);
    }

    if !contains_ignore_case(&response.body, marker) {
        return Verdict::MissingMarker(marker.to_string());
    }

    Verdict::Pass
}

/// Classify a business endpoint probe
pub fn classify_business(response: Result<&ProbeResponse, &str>, error_markers: &[String]) -> Verdict {
    let response = match response {
        Ok(response) => response,
        Err(error) => return Verdict::Transport(error.to_string()),
    };

    if !is_success_status(response.status_code) {
        return Verdict::Status(response.status_code);
    }

    match find_error_marker(&response.body, error_markers) {
        Some(marker) => Verdict::ErrorMarker(marker.to_string()),
        None => Verdict::Pass,
    }
}

/// Status range accepted by business and diagnostic probes
pub fn is_success_status(status_code: u16) -> bool {
    (200..400).contains(&status_code)
}

/// Case-insensitive substring search over a (possibly non UTF-8) body
///
/// An empty body never contains a marker.
pub fn contains_ignore_case(body: &[u8], marker: &str) -> bool {
    if body.is_empty() {
        return false;
    }
    String::from_utf8_lossy(body)
        .to_lowercase()
        .contains(&marker.to_lowercase())
}

/// First error marker found in the lower-cased body, in marker order
pub fn find_error_marker<'a>(body: &[u8], error_markers: &'a [String]) -> Option<&'a str> {
    let lowered = String::from_utf8_lossy(body).to_lowercase();
    error_markers
        .iter()
        .map(String::as_str)
        .find(|marker| lowered.contains(&marker.to_lowercase()))
}

/// Lossy preview of the first `BODY_PREVIEW_CHARS` characters
pub fn body_preview(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    Some(
        String::from_utf8_lossy(body)
            .chars()
            .take(BODY_PREVIEW_CHARS)
            .collect(),
    )
}
