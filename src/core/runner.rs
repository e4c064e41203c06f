/*!
Run orchestration.

One run: diagnostic probe → sequential candidate evaluation → tiered
selection → config update → notification. Probe negatives are absorbed into
outcomes, notification failures are logged and swallowed, configuration
faults abort the run. The wall-clock ceiling only stops new candidates
from being probed; a run that hits it still selects, updates and notifies.
*/

use std::time::Instant;

use crate::config::{Settings, SettingsError};
use crate::core::config_store::{
    ConfigError, ConfigUpdateResult, ProxyConfigStore, MSG_ALL_FAILED, MSG_DRY_RUN,
};
use crate::core::network::debug_logger::EnhancedDebugLogger;
use crate::core::network::diagnostic::{DnsResolver, NetworkDiagnostic, SystemDnsResolver};
use crate::core::network::proxy_health::client::{IsahcProbeClient, ProbeClient};
use crate::core::network::proxy_health::evaluator::ProxyEvaluator;
use crate::core::network::proxy_health::selector::select;
use crate::core::network::report_renderer::ReportRenderer;
use crate::core::network::types::{
    get_local_timestamp, DiagnosticReport, EvaluationOutcome, NetworkError, Selection,
};
use crate::notify::{NoopNotifier, NotificationContext, Notifier, NotifyOutcome};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Precondition(#[from] NetworkError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub diagnostic: DiagnosticReport,
    pub outcomes: Vec<EvaluationOutcome>,
    pub selection: Selection,
    /// Address configured when the run started
    pub previous_proxy: String,
    pub config_update: ConfigUpdateResult,
    pub notification: NotifyOutcome,
}

impl RunReport {
    /// True iff at least one candidate was usable
    pub fn succeeded(&self) -> bool {
        !self.selection.is_all_failed()
    }

    pub fn exit_code(&self) -> i32 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }
}

/// Wires probes, selection, persistence and notification together
pub struct ProxyOptimizer {
    settings: Settings,
    client: Box<dyn ProbeClient>,
    resolver: Box<dyn DnsResolver>,
    notifier: Box<dyn Notifier>,
    store: ProxyConfigStore,
    dry_run: bool,
    show_progress: bool,
}

impl ProxyOptimizer {
    /// Build with production collaborators
    ///
    /// # Errors
    ///
    /// Returns `RunError::Settings` for invalid settings and
    /// `RunError::Precondition` when the HTTP client cannot be created.
    pub fn new(settings: Settings) -> Result<Self, RunError> {
        settings.check()?;

        let client: Box<dyn ProbeClient> = Box::new(IsahcProbeClient::new()?);
        let notifier = default_notifier(&settings);
        let store = ProxyConfigStore::new(
            settings.target.config_file.clone(),
            settings.target.proxy_field.clone(),
        );

        Ok(Self {
            settings,
            client,
            resolver: Box::new(SystemDnsResolver),
            notifier,
            store,
            dry_run: false,
            show_progress: false,
        })
    }

    /// Build with injected collaborators (for testing)
    pub fn with_parts(
        settings: Settings,
        client: Box<dyn ProbeClient>,
        resolver: Box<dyn DnsResolver>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let store = ProxyConfigStore::new(
            settings.target.config_file.clone(),
            settings.target.proxy_field.clone(),
        );
        Self {
            settings,
            client,
            resolver,
            notifier,
            store,
            dry_run: false,
            show_progress: false,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Evaluate and select without writing the target config
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run once
    ///
    /// Candidates not yet probed when the configured run timeout elapses are
    /// recorded as failed; everything evaluated so far is still used.
    pub async fn run(&self) -> Result<RunReport, RunError> {
        let deadline = Instant::now() + self.settings.run_timeout();
        let logger = EnhancedDebugLogger::new();
        let previous_proxy = self.store.current_proxy();
        logger.debug(
            "ProxyOptimizer",
            "run_start",
            &format!(
                "{} candidates, config {} (current: {}, dry run: {})",
                self.settings.candidates.len(),
                self.store.path().display(),
                previous_proxy,
                self.dry_run
            ),
        );

        if self.show_progress {
            println!("=== Network diagnosis & proxy optimization ===");
            println!("Config file: {}", self.store.path().display());
            println!("Current proxy: {}", previous_proxy);
            println!("==============================\n");
            println!("=== Network diagnosis ===");
        }

        let diagnostic = NetworkDiagnostic::new(
            self.client.as_ref(),
            self.resolver.as_ref(),
            &self.settings.diagnostic,
            self.settings.probe.user_agent.as_str(),
        )
        .with_progress(self.show_progress)
        .diagnose()
        .await;

        if self.show_progress {
            println!("\n=== Proxy evaluation ===");
        }

        let outcomes = ProxyEvaluator::new(self.client.as_ref(), &self.settings.probe)
            .with_progress(self.show_progress)
            .with_deadline(Some(deadline))
            .evaluate(&self.settings.candidates)
            .await;

        let selection = select(&outcomes);
        logger.selection(&selection);

        if self.show_progress {
            println!(
                "\n{}",
                ReportRenderer::new().render_summary(&outcomes, &selection, &previous_proxy)
            );
        }

        let config_update = match selection.winner() {
            None => ConfigUpdateResult::unchanged(&previous_proxy, "", MSG_ALL_FAILED),
            Some(winner) if self.dry_run => {
                ConfigUpdateResult::unchanged(&previous_proxy, &winner.url, MSG_DRY_RUN)
            }
            Some(winner) => self.store.update_proxy(&winner.url)?,
        };

        if self.show_progress && config_update.updated {
            println!("\nConfig file updated!");
            println!("Previous: {}", config_update.old_proxy);
            println!("New: {}", config_update.new_proxy);
            if let Some(backup) = &config_update.backup_file {
                println!("Backup: {}", backup.display());
            }
        }

        let context = NotificationContext {
            diagnostic: &diagnostic.summary,
            outcomes: &outcomes,
            config_update: &config_update,
            current_proxy: &previous_proxy,
            all_failed: selection.is_all_failed(),
            checked_at: get_local_timestamp(),
        };

        let notification = match self.notifier.notify(&context) {
            Ok(outcome) => outcome,
            Err(e) => {
                logger.error("Notifier", "delivery_failed", &e.to_string());
                eprintln!("⚠️ Notification delivery failed: {}", e);
                NotifyOutcome::Failed(e.to_string())
            }
        };

        Ok(RunReport {
            diagnostic,
            outcomes,
            selection,
            previous_proxy,
            config_update,
            notification,
        })
    }
}

#[cfg(feature = "wecom")]
fn default_notifier(settings: &Settings) -> Box<dyn Notifier> {
    Box::new(crate::notify::WeComNotifier::new(settings.wecom.clone()))
}

#[cfg(not(feature = "wecom"))]
fn default_notifier(_settings: &Settings) -> Box<dyn Notifier> {
    Box::new(NoopNotifier::new("notification support not compiled in"))
}

/// Notifier for `--no-notify` runs
pub fn disabled_notifier() -> Box<dyn Notifier> {
    Box::new(NoopNotifier::new("notifications disabled"))
}
