/*!
Target configuration file maintenance.

`ProxyConfigStore` owns the JSON configuration file whose proxy field points
at the active upstream. Updates are idempotent, always preceded by a
timestamped backup, and written through a temp file + rename. A failed write
restores the original bytes before the error is surfaced.
*/

use crate::core::network::debug_logger::EnhancedDebugLogger;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const MSG_ALREADY_OPTIMAL: &str = "Everything normal, current configuration is already optimal";
pub const MSG_UPDATED: &str = "Configuration updated to the optimal proxy";
pub const MSG_ALL_FAILED: &str = "All proxies unavailable, configuration unchanged";
pub const MSG_DRY_RUN: &str = "Dry run, configuration left unchanged";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file {0} does not exist")]
    NotFound(PathBuf),
    #[error("Config file {0} is not writable")]
    NotWritable(PathBuf),
    #[error("Config file read failed: {0}")]
    ReadFailed(#[source] std::io::Error),
    #[error("Config file JSON is malformed: {0}")]
    Malformed(String),
    #[error("Failed to create backup file {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to update config file ({source}); original restored: {restored}")]
    WriteFailed {
        #[source]
        source: std::io::Error,
        restored: bool,
    },
}

/// Result of an update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUpdateResult {
    pub updated: bool,
    pub old_proxy: String,
    pub new_proxy: String,
    pub backup_file: Option<PathBuf>,
    pub message: String,
}

impl ConfigUpdateResult {
    /// Result for a run where nothing was written
    pub fn unchanged(current_proxy: &str, new_proxy: &str, message: &str) -> Self {
        Self {
            updated: false,
            old_proxy: current_proxy.to_string(),
            new_proxy: new_proxy.to_string(),
            backup_file: None,
            message: message.to_string(),
        }
    }
}

/// JSON configuration file with a single maintained proxy field
#[derive(Debug, Clone)]
pub struct ProxyConfigStore {
    path: PathBuf,
    field: String,
}

impl ProxyConfigStore {
    pub fn new(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field: field.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Currently configured proxy, lenient
    ///
    /// Missing files, malformed JSON and non-string fields all read as "".
    pub fn current_proxy(&self) -> String {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .and_then(|doc| doc.get(&self.field).and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default()
    }

    /// Point the proxy field at `new_proxy`
    ///
    /// # Behavior
    /// 1. Missing, read-only or malformed files are fatal
    /// 2. An unchanged address returns `updated = false` without touching disk
    /// 3. Otherwise the original bytes go to `<file>.backup.<YYYYmmddHHMMSS>`
    ///    and the document is rewritten pretty-printed (4-space indent, key
    ///    order kept, Unicode and slashes unescaped)
    pub fn update_proxy(&self, new_proxy: &str) -> Result<ConfigUpdateResult, ConfigError> {
        let (original, mut document) = self.read_document()?;

        let old_proxy = document
            .get(&self.field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if old_proxy == new_proxy {
            return Ok(ConfigUpdateResult::unchanged(
                &old_proxy,
                new_proxy,
                MSG_ALREADY_OPTIMAL,
            ));
        }

        document.insert(self.field.clone(), Value::String(new_proxy.to_string()));

        let backup_file = self.backup_path();
        std::fs::write(&backup_file, &original).map_err(|source| ConfigError::BackupFailed {
            path: backup_file.clone(),
            source,
        })?;

        let rendered = render_pretty(&Value::Object(document)).map_err(|e| {
            ConfigError::WriteFailed {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                restored: true,
            }
        })?;

        if let Err(source) = self.write_atomic(rendered.as_bytes()) {
            let restored = std::fs::write(&self.path, &original).is_ok();
            return Err(ConfigError::WriteFailed { source, restored });
        }

        EnhancedDebugLogger::new().config_update(true, &old_proxy, new_proxy);

        Ok(ConfigUpdateResult {
            updated: true,
            old_proxy,
            new_proxy: new_proxy.to_string(),
            backup_file: Some(backup_file),
            message: MSG_UPDATED.to_string(),
        })
    }

    /// Read and parse the document, keeping the raw bytes for backup/rollback
    fn read_document(&self) -> Result<(Vec<u8>, Map<String, Value>), ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }

        let metadata = std::fs::metadata(&self.path).map_err(ConfigError::ReadFailed)?;
        if metadata.permissions().readonly() {
            return Err(ConfigError::NotWritable(self.path.clone()));
        }

        let original = std::fs::read(&self.path).map_err(ConfigError::ReadFailed)?;
        let document: Value =
            serde_json::from_slice(&original).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        match document {
            Value::Object(map) => Ok((original, map)),
            _ => Err(ConfigError::Malformed("top-level value is not an object".to_string())),
        }
    }

    fn backup_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".backup.{}", stamp));
        PathBuf::from(name)
    }

    /// Write via temp file + rename
    fn write_atomic(&self, content: &[u8]) -> std::io::Result<()> {
        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        std::fs::write(&temp_path, content)?;
        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(())
    }
}

/// Pretty JSON with a 4-space indent
pub fn render_pretty(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
