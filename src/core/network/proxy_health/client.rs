//! Probe Client Implementations
//!
//! Provides the HTTP client abstraction used by every probe: proxy basic
//! checks, business endpoint checks and diagnostic reachability checks.

use crate::core::network::types::NetworkError;
use std::time::{Duration, Instant};

use isahc::config::{Configurable, RedirectPolicy, SslOption};
use isahc::{AsyncReadResponseExt, HttpClient, Request};

/// Request method for a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Get,
    /// Header-only reachability check (no body transferred)
    Head,
}

/// Fully described probe request
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub method: ProbeMethod,
    pub url: String,
    /// Total request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Maximum redirects to follow (None = follow without limit)
    pub max_redirects: Option<u32>,
    pub user_agent: String,
}

impl ProbeRequest {
    pub fn get(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            method: ProbeMethod::Get,
            url: url.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            max_redirects: Some(3),
            user_agent: user_agent.into(),
        }
    }

    pub fn head(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            method: ProbeMethod::Head,
            max_redirects: None,
            ..Self::get(url, user_agent)
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: Option<u32>) -> Self {
        self.max_redirects = max_redirects;
        self
    }
}

/// Probe response containing full response data for classification
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Final HTTP status code (after redirects)
    pub status_code: u16,
    /// Response body (empty for HEAD requests)
    pub body: Vec<u8>,
    /// Request duration
    pub duration: Duration,
}

/// HTTP client seam for every probe
///
/// Implementations must not treat non-2xx statuses as errors: only
/// transport-level failures (DNS, connect, TLS, timeout) map to `Err`.
#[async_trait::async_trait]
pub trait ProbeClient: Send + Sync {
    /// Execute one probe request
    ///
    /// # Returns
    /// * `Ok(ProbeResponse)` - Any HTTP response, with status, body and timing
    /// * `Err(String)` - Transport failure description
    async fn execute(&self, request: ProbeRequest) -> Result<ProbeResponse, String>;
}

/// Production probe client implementation using isahc
///
/// TLS verification is disabled: candidates are frequently fronted by
/// self-signed or mismatched certificates.
pub struct IsahcProbeClient {
    client: HttpClient,
}

#[async_trait::async_trait]
impl ProbeClient for IsahcProbeClient {
    async fn execute(&self, request: ProbeRequest) -> Result<ProbeResponse, String> {
        let start = Instant::now();

        let redirect_policy = match request.max_redirects {
            Some(0) => RedirectPolicy::None,
            Some(max) => RedirectPolicy::Limit(max),
            None => RedirectPolicy::Follow,
        };

        let builder = match request.method {
            ProbeMethod::Get => Request::get(&request.url),
            ProbeMethod::Head => Request::head(&request.url),
        };

        let http_request = builder
            .timeout(request.timeout)
            .connect_timeout(request.connect_timeout)
            .redirect_policy(redirect_policy)
            .auto_referer()
            .ssl_options(SslOption::DANGER_ACCEPT_INVALID_CERTS | SslOption::DANGER_ACCEPT_INVALID_HOSTS)
            .header("User-Agent", request.user_agent.as_str())
            .body(Vec::new())
            .map_err(|e| format!("Probe request creation failed: {}", e))?;

        let mut response = self
            .client
            .send_async(http_request)
            .await
            .map_err(|e| format!("Probe request failed: {}", e))?;

        let status_code = response.status().as_u16();

        let body = match request.method {
            ProbeMethod::Head => Vec::new(),
            ProbeMethod::Get => response
                .bytes()
                .await
                .map_err(|e| format!("Failed to read probe response body: {}", e))?
                .to_vec(),
        };

        Ok(ProbeResponse {
            status_code,
            body,
            duration: start.elapsed(),
        })
    }
}

impl IsahcProbeClient {
    /// Build the libcurl-backed client
    ///
    /// Failure here means outbound HTTP is unavailable in this process,
    /// which is fatal before any probing starts.
    pub fn new() -> Result<Self, NetworkError> {
        let client = HttpClient::builder()
            .ssl_options(SslOption::DANGER_ACCEPT_INVALID_CERTS | SslOption::DANGER_ACCEPT_INVALID_HOSTS)
            .build()
            .map_err(|e| {
                NetworkError::HttpUnavailable(format!("Failed to create probe client: {}", e))
            })?;
        Ok(Self { client })
    }
}
