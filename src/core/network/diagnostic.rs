/*!
One-shot network diagnostic.

Checks general outbound reachability against a fixed list of reference
targets (HEAD requests) and name resolution for a fixed list of domains.
Results are informational only: nothing here is retried or fatal.
*/

use crate::config::DiagnosticSettings;
use crate::core::network::debug_logger::EnhancedDebugLogger;
use crate::core::network::proxy_health::classify::{is_success_status, Verdict};
use crate::core::network::proxy_health::client::{ProbeClient, ProbeRequest};
use crate::core::network::proxy_health::probe::run_probe;
use crate::core::network::types::{ConnectionCheck, DiagnosticReport, DnsCheck};
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Name resolution abstraction for dependency injection and testing
#[async_trait::async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve a domain to its addresses
    async fn resolve(&self, domain: &str, timeout: Duration) -> Result<Vec<IpAddr>, String>;
}

/// Production resolver backed by the system resolver through tokio
#[derive(Default)]
pub struct SystemDnsResolver;

#[async_trait::async_trait]
impl DnsResolver for SystemDnsResolver {
    async fn resolve(&self, domain: &str, timeout: Duration) -> Result<Vec<IpAddr>, String> {
        let lookup = tokio::net::lookup_host((domain, 0));
        match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(addrs)) => Ok(addrs.map(|addr| addr.ip()).collect()),
            Ok(Err(e)) => Err(format!("Resolution failed: {}", e)),
            Err(_) => Err(format!("Resolution timed out after {}ms", timeout.as_millis())),
        }
    }
}

/// Diagnostic runner over reference targets and DNS domains
pub struct NetworkDiagnostic<'a> {
    client: &'a dyn ProbeClient,
    resolver: &'a dyn DnsResolver,
    settings: &'a DiagnosticSettings,
    user_agent: String,
    show_progress: bool,
}

impl<'a> NetworkDiagnostic<'a> {
    pub fn new(
        client: &'a dyn ProbeClient,
        resolver: &'a dyn DnsResolver,
        settings: &'a DiagnosticSettings,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client,
            resolver,
            settings,
            user_agent: user_agent.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run every connection and DNS check sequentially
    pub async fn diagnose(&self) -> DiagnosticReport {
        let mut connections = Vec::with_capacity(self.settings.targets.len());
        for target in &self.settings.targets {
            let check = self.check_connection(&target.description, &target.url).await;
            if self.show_progress {
                match &check.error {
                    None => println!(
                        "✅ {}: HTTP {} ({:.3}s)",
                        check.description,
                        check.http_code,
                        check.response_time.as_secs_f64()
                    ),
                    Some(error) => println!(
                        "❌ {}: {} (HTTP {})",
                        check.description, error, check.http_code
                    ),
                }
            }
            connections.push(check);
        }

        let mut dns = Vec::with_capacity(self.settings.dns_domains.len());
        for domain in &self.settings.dns_domains {
            let check = self.check_dns(domain).await;
            if self.show_progress {
                match &check.address {
                    Some(address) => println!(
                        "✅ {} -> {} ({:.3}s)",
                        check.domain,
                        address,
                        check.elapsed.as_secs_f64()
                    ),
                    None => println!("❌ {} resolution failed", check.domain),
                }
            }
            dns.push(check);
        }

        let report = DiagnosticReport::new(connections, dns);
        EnhancedDebugLogger::new().diagnostic_summary(
            report.summary.connection_success,
            report.summary.connection_total,
            report.summary.dns_success,
            report.summary.dns_total,
        );
        report
    }

    /// HEAD reachability check; success iff a response arrived with status in [200, 400)
    pub async fn check_connection(&self, description: &str, url: &str) -> ConnectionCheck {
        let request = ProbeRequest::head(url, self.user_agent.as_str())
            .with_timeouts(self.settings.timeout(), self.settings.connect_timeout());

        let result = run_probe(self.client, request, |response| match response {
            Err(error) => Verdict::Transport(error.to_string()),
            Ok(response) if is_success_status(response.status_code) => Verdict::Pass,
            Ok(response) => Verdict::Status(response.status_code),
        })
        .await;

        ConnectionCheck {
            description: description.to_string(),
            url: url.to_string(),
            success: result.success,
            http_code: result.status_code,
            response_time: result.elapsed,
            error: result.error,
        }
    }

    /// Resolve one domain
    ///
    /// An answer with no address distinct from the input (including an IP
    /// literal resolving to itself) counts as a failure.
    pub async fn check_dns(&self, domain: &str) -> DnsCheck {
        let start = Instant::now();
        let resolved = self.resolver.resolve(domain, self.settings.dns_timeout()).await;
        let elapsed = start.elapsed();

        let address = resolved.ok().and_then(|addrs| {
            addrs
                .into_iter()
                .map(|ip| ip.to_string())
                .find(|ip| ip != domain)
        });

        DnsCheck {
            domain: domain.to_string(),
            success: address.is_some(),
            address,
            elapsed,
        }
    }
}
