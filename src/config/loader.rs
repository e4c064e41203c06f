use super::types::Settings;
use crate::core::network::proxy_health::url::validate_candidate_url;
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = ".proxyopt";
const SETTINGS_FILE: &str = "settings.toml";

pub const ENV_WECOM_CORP_ID: &str = "PROXYOPT_WECOM_CORP_ID";
pub const ENV_WECOM_AGENT_ID: &str = "PROXYOPT_WECOM_AGENT_ID";
pub const ENV_WECOM_SECRET: &str = "PROXYOPT_WECOM_SECRET";
pub const ENV_WECOM_TO_USER: &str = "PROXYOPT_WECOM_TO_USER";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Settings file {0} not found")]
    NotFound(PathBuf),
    #[error("Settings file {0} already exists")]
    AlreadyExists(PathBuf),
    #[error("Settings IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Settings serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

impl Settings {
    /// Default settings location: `~/.proxyopt/settings.toml`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::HomeDirNotFound)?;
        Ok(home.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Load settings and apply environment overrides
    ///
    /// An explicit path must exist. Without one, a missing default file
    /// yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(SettingsError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => {
                let default_path = Self::default_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the default settings file, refusing to overwrite an existing one
    pub fn init(path: Option<&Path>) -> Result<PathBuf, SettingsError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            return Err(SettingsError::AlreadyExists(path));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::default().to_toml()?)?;
        Ok(path)
    }

    /// Effective settings as TOML with the WeCom secret masked
    pub fn to_display_toml(&self) -> Result<String, SettingsError> {
        let display = Settings {
            wecom: self.wecom.masked(),
            ..self.clone()
        };
        display.to_toml()
    }

    /// Print effective settings as TOML
    pub fn print(&self) -> Result<(), SettingsError> {
        println!("{}", self.to_display_toml()?);
        Ok(())
    }

    /// Validate settings before any probing
    pub fn check(&self) -> Result<(), SettingsError> {
        if self.candidates.is_empty() {
            return Err(SettingsError::Invalid("candidate list is empty".to_string()));
        }

        for candidate in &self.candidates {
            validate_candidate_url(candidate).map_err(|e| {
                SettingsError::Invalid(format!("candidate {}: {}", candidate, e))
            })?;
        }

        let probe = &self.probe;
        if probe.business_endpoints.is_empty() {
            return Err(SettingsError::Invalid("business endpoint list is empty".to_string()));
        }
        if probe.basic_marker.trim().is_empty() {
            return Err(SettingsError::Invalid("basic marker is empty".to_string()));
        }
        if probe.error_markers.iter().any(|m| m.is_empty()) {
            return Err(SettingsError::Invalid("error markers must not be empty strings".to_string()));
        }
        if probe.basic_timeout_secs == 0
            || probe.business_timeout_secs == 0
            || probe.business_connect_timeout_secs == 0
        {
            return Err(SettingsError::Invalid("probe timeouts must be non-zero".to_string()));
        }

        let diagnostic = &self.diagnostic;
        if diagnostic.timeout_secs == 0
            || diagnostic.connect_timeout_secs == 0
            || diagnostic.dns_timeout_secs == 0
        {
            return Err(SettingsError::Invalid("diagnostic timeouts must be non-zero".to_string()));
        }

        if self.run_timeout_secs == 0 {
            return Err(SettingsError::Invalid("run timeout must be non-zero".to_string()));
        }

        if self.target.config_file.as_os_str().is_empty() {
            return Err(SettingsError::Invalid("target config file is empty".to_string()));
        }
        if self.target.proxy_field.trim().is_empty() {
            return Err(SettingsError::Invalid("target proxy field is empty".to_string()));
        }

        Ok(())
    }

    /// Environment variables take precedence over file values for secrets
    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            (ENV_WECOM_CORP_ID, &mut self.wecom.corp_id),
            (ENV_WECOM_AGENT_ID, &mut self.wecom.agent_id),
            (ENV_WECOM_SECRET, &mut self.wecom.secret),
            (ENV_WECOM_TO_USER, &mut self.wecom.to_user),
        ];

        for (name, field) in overrides {
            if let Ok(value) = std::env::var(name) {
                if !value.trim().is_empty() {
                    *field = value.trim().to_string();
                }
            }
        }
    }
}
