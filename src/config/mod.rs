pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::SettingsError;
pub use types::{
    DiagnosticSettings, DiagnosticTarget, ProbeSettings, Settings, TargetSettings, WeComSettings,
};
