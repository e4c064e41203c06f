use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::network::types::{parse_env_bool, EvaluationOutcome, ProbeResult, Selection};

pub const DEBUG_ENV_VAR: &str = "PROXYOPT_DEBUG";
pub const DEBUG_LOG_PATH_ENV_VAR: &str = "PROXYOPT_DEBUG_LOG";

const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: usize = 5;
const ROTATION_CHECK_INTERVAL: u32 = 100;

static SESSION_ID: OnceLock<String> = OnceLock::new();

/// Correlation id shared by every logger in this process
fn process_session_id() -> &'static str {
    SESSION_ID.get_or_init(|| Uuid::new_v4().to_string()[..8].to_string())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub component: String,
    pub event: String,
    pub message: String,
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, Value>,
}

struct RotatingLogger {
    log_path: PathBuf,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        Self {
            log_path,
            write_count: AtomicU32::new(0),
        }
    }

    fn append(&self, json_line: &str) -> std::io::Result<()> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            // Rotation problems must never stop logging
            let _ = self.rotate_if_needed();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", json_line)
    }

    fn oversized(&self) -> std::io::Result<bool> {
        match std::fs::metadata(&self.log_path) {
            Ok(meta) => Ok(meta.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.oversized()? {
            return Ok(());
        }

        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        // Another process holds the lock and is rotating
        if lock_file.try_lock_exclusive().is_err() {
            return Ok(());
        }

        let result = if self.oversized()? {
            self.rotate()
        } else {
            Ok(())
        };
        let _ = std::fs::remove_file(&lock_path);
        result
    }

    fn rotate(&self) -> std::io::Result<()> {
        let (dir, stem) = split_log_path(&self.log_path)?;
        let archive_path = dir.join(format!(
            "{}.{}.gz",
            stem,
            Local::now().format("%Y%m%d_%H%M%S")
        ));

        let staging = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &staging)?;

        let mut encoder = GzEncoder::new(File::create(&archive_path)?, Compression::default());
        std::io::copy(&mut BufReader::new(File::open(&staging)?), &mut encoder)?;
        encoder.finish()?;
        std::fs::remove_file(&staging)?;

        let _ = prune_archives(dir, &stem);
        Ok(())
    }
}

fn split_log_path(path: &Path) -> std::io::Result<(&Path, String)> {
    let invalid = || std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid log path");
    let dir = path.parent().ok_or_else(invalid)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?
        .to_string();
    Ok((dir, stem))
}

/// Keep only the newest `MAX_ARCHIVES` gzip archives
fn prune_archives(dir: &Path, stem: &str) -> std::io::Result<()> {
    let prefix = format!("{}.", stem);
    let mut archives = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&prefix) && name.ends_with(".gz") {
            archives.push((entry.path(), entry.metadata()?.modified()?));
        }
    }

    archives.sort_by_key(|(_, modified)| *modified);
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for (path, _) in archives.into_iter().take(excess) {
        let _ = std::fs::remove_file(path);
    }
    Ok(())
}

/// JSON-Lines debug logger for probe, selection and delivery events
///
/// Disabled unless `PROXYOPT_DEBUG` is set to true/1/yes/on. Every entry
/// carries the process correlation id and passes through secret redaction.
pub struct EnhancedDebugLogger {
    enabled: bool,
    writer: Option<Mutex<RotatingLogger>>,
    session_id: &'static str,
    redaction_patterns: Vec<Regex>,
}

impl EnhancedDebugLogger {
    pub fn new() -> Self {
        let enabled = parse_env_bool(DEBUG_ENV_VAR);
        let writer = if enabled {
            Some(Mutex::new(RotatingLogger::new(Self::log_path())))
        } else {
            None
        };

        Self {
            enabled,
            writer,
            session_id: process_session_id(),
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    /// Log file location, `~/.proxyopt/proxyopt-debug.log` unless overridden
    pub fn log_path() -> PathBuf {
        if let Ok(path) = env::var(DEBUG_LOG_PATH_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".proxyopt")
            .join("proxyopt-debug.log")
    }

    fn compile_redaction_patterns() -> Vec<Regex> {
        [
            r"(?i)authorization[:\s]+[^\s\n]+",
            r"(?i)bearer[:\s]+[^\s\n]+",
            r"(?i)access_token=[^&\s]+",
            r"(?i)corpsecret=[^&\s]+",
            r"(?i)token[:\s]+[^\s\n]+",
            r"(?i)password[:\s]+[^\s\n]+",
            r"(?i)api[_-]?key[:\s]+[^\s\n]+",
            r"(?i)secret[:\s]+[^\s\n]+",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    }

    /// Replace credential-looking fragments with `[REDACTED]`
    pub fn redact(&self, text: &str) -> String {
        self.redaction_patterns
            .iter()
            .fold(text.to_string(), |acc, regex| {
                regex.replace_all(&acc, "[REDACTED]").to_string()
            })
    }

    fn log(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        fields: HashMap<String, Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact(message),
            correlation_id: Some(self.session_id.to_string()),
            fields,
        };

        if let Some(writer) = &self.writer {
            if let (Ok(writer), Ok(line)) = (writer.lock(), serde_json::to_string(&entry)) {
                let _ = writer.append(&line);
            }
        }
    }

    pub fn debug(&self, component: &str, event: &str, message: &str) {
        self.log("DEBUG", component, event, message, HashMap::new());
    }

    pub fn error(&self, component: &str, event: &str, message: &str) {
        self.log("ERROR", component, event, message, HashMap::new());
    }

    pub fn probe_start(&self, stage: &str, url: &str, timeout_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("stage".to_string(), Value::from(stage));
        fields.insert("url".to_string(), Value::from(url));
        fields.insert("timeout_ms".to_string(), Value::from(timeout_ms));

        self.log(
            "PROBE",
            "ProxyEvaluator",
            "probe_start",
            &format!("{} probe -> {}", stage, url),
            fields,
        );
    }

    pub fn probe_end(&self, stage: &str, url: &str, result: &ProbeResult) {
        let success = result.success;
        let duration_ms = result.elapsed.as_millis() as u64;
        let mut fields = HashMap::new();
        fields.insert("stage".to_string(), Value::from(stage));
        fields.insert("url".to_string(), Value::from(url));
        fields.insert("success".to_string(), Value::from(success));
        fields.insert("duration_ms".to_string(), Value::from(duration_ms));
        if result.has_response() {
            fields.insert("http_status".to_string(), Value::from(result.status_code));
        }
        if let Some(error) = &result.error {
            fields.insert("error".to_string(), Value::from(self.redact(error)));
        }
        if let Some(preview) = &result.body_preview {
            fields.insert("body_preview".to_string(), Value::from(self.redact(preview)));
        }

        self.log(
            "PROBE",
            "ProxyEvaluator",
            "probe_end",
            &format!(
                "{} probe {} ({}ms)",
                stage,
                if success { "passed" } else { "failed" },
                duration_ms
            ),
            fields,
        );
    }

    pub fn evaluation_outcome(&self, outcome: &EvaluationOutcome) {
        let mut fields = HashMap::new();
        fields.insert("index".to_string(), Value::from(outcome.index));
        fields.insert("url".to_string(), Value::from(outcome.url.as_str()));
        fields.insert(
            "state".to_string(),
            serde_json::to_value(outcome.state).unwrap_or(Value::Null),
        );
        if let Some(time) = outcome.response_time {
            fields.insert("response_time_ms".to_string(), Value::from(time.as_millis() as u64));
        }
        if let Some(endpoint) = &outcome.endpoint {
            fields.insert("endpoint".to_string(), Value::from(endpoint.as_str()));
        }

        self.log(
            "EVAL",
            "ProxyEvaluator",
            "candidate_evaluated",
            &format!("{} -> {}", outcome.url, outcome.state.label()),
            fields,
        );
    }

    pub fn selection(&self, selection: &Selection) {
        let mut fields = HashMap::new();
        let message = match selection {
            Selection::Winner { outcome, tier } => {
                fields.insert("url".to_string(), Value::from(outcome.url.as_str()));
                fields.insert("tier".to_string(), Value::from(format!("{:?}", tier)));
                format!("Selected {} ({:?})", outcome.url, tier)
            }
            Selection::NoCandidate => "No usable candidate".to_string(),
        };

        self.log("EVAL", "ProxySelector", "selection", &message, fields);
    }

    pub fn config_update(&self, updated: bool, old_proxy: &str, new_proxy: &str) {
        let mut fields = HashMap::new();
        fields.insert("updated".to_string(), Value::from(updated));
        fields.insert("old_proxy".to_string(), Value::from(old_proxy));
        fields.insert("new_proxy".to_string(), Value::from(new_proxy));

        self.log(
            "CONFIG",
            "ProxyConfigStore",
            "proxy_update",
            &format!("{} -> {} (updated: {})", old_proxy, new_proxy, updated),
            fields,
        );
    }

    pub fn diagnostic_summary(&self, connection_ok: usize, connection_total: usize, dns_ok: usize, dns_total: usize) {
        let mut fields = HashMap::new();
        fields.insert("connection_success".to_string(), Value::from(connection_ok));
        fields.insert("connection_total".to_string(), Value::from(connection_total));
        fields.insert("dns_success".to_string(), Value::from(dns_ok));
        fields.insert("dns_total".to_string(), Value::from(dns_total));

        self.log(
            "NETWORK",
            "NetworkDiagnostic",
            "diagnosis_complete",
            &format!(
                "connections {}/{}, dns {}/{}",
                connection_ok, connection_total, dns_ok, dns_total
            ),
            fields,
        );
    }

    pub fn notification(&self, status: &str, detail: &str) {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), Value::from(status));

        self.log(
            "NOTIFY",
            "Notifier",
            "notification",
            &format!("{}: {}", status, detail),
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn session_id(&self) -> &str {
        self.session_id
    }
}

impl Default for EnhancedDebugLogger {
    fn default() -> Self {
        Self::new()
    }
}
