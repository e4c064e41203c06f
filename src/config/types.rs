use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Operator settings for one optimizer run
///
/// Plain values precede tables so the struct serializes to valid TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ordered candidate proxy base addresses
    pub candidates: Vec<String>,
    /// Wall-clock budget after which no further candidate is probed
    pub run_timeout_secs: u64,
    pub probe: ProbeSettings,
    pub diagnostic: DiagnosticSettings,
    pub target: TargetSettings,
    pub wecom: WeComSettings,
}

impl Settings {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

/// Thresholds and endpoint lists used by the proxy evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Basic probe timeout, used for both total and connect timeout
    pub basic_timeout_secs: u64,
    /// Suffix appended to the candidate for the basic probe
    pub test_endpoint: String,
    /// Case-insensitive marker the basic probe body must contain
    pub basic_marker: String,
    /// Business endpoint suffixes, tried in order
    pub business_endpoints: Vec<String>,
    pub business_timeout_secs: u64,
    pub business_connect_timeout_secs: u64,
    /// Lower-case substrings that disqualify a business response
    pub error_markers: Vec<String>,
    pub max_redirects: u32,
    pub user_agent: String,
    /// Delay between successive candidates
    pub pacing_ms: u64,
}

impl ProbeSettings {
    pub fn basic_timeout(&self) -> Duration {
        Duration::from_secs(self.basic_timeout_secs)
    }

    pub fn business_timeout(&self) -> Duration {
        Duration::from_secs(self.business_timeout_secs)
    }

    pub fn business_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.business_connect_timeout_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

/// Reference target for the connectivity diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTarget {
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub dns_timeout_secs: u64,
    pub dns_domains: Vec<String>,
    pub targets: Vec<DiagnosticTarget>,
}

impl DiagnosticSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }
}

/// JSON configuration file whose proxy field is maintained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    pub config_file: PathBuf,
    pub proxy_field: String,
}

/// WeCom (enterprise WeChat) application credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeComSettings {
    pub corp_id: String,
    pub agent_id: String,
    pub secret: String,
    pub to_user: String,
    pub api_base: String,
}

/// Placeholder printed instead of a configured secret
pub const SECRET_MASK: &str = "********";

impl WeComSettings {
    /// Copy safe to display: a non-empty secret is replaced by `SECRET_MASK`
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if !masked.secret.is_empty() {
            masked.secret = SECRET_MASK.to_string();
        }
        masked
    }

    /// All three secrets present
    pub fn is_complete(&self) -> bool {
        !self.corp_id.trim().is_empty()
            && !self.agent_id.trim().is_empty()
            && !self.secret.trim().is_empty()
    }
}
