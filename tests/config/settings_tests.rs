use crate::common::create_temp_dir;
use proxyopt::config::loader::{
    ENV_WECOM_AGENT_ID, ENV_WECOM_CORP_ID, ENV_WECOM_SECRET, ENV_WECOM_TO_USER,
};
use proxyopt::config::types::SECRET_MASK;
use proxyopt::config::{Settings, SettingsError};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn clear_wecom_env() {
    for name in [ENV_WECOM_CORP_ID, ENV_WECOM_AGENT_ID, ENV_WECOM_SECRET, ENV_WECOM_TO_USER] {
        env::remove_var(name);
    }
}

#[test]
fn test_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.candidates.len(), 6);
    assert_eq!(settings.candidates[0], "https://129888.xyz");
    assert_eq!(settings.probe.basic_timeout(), Duration::from_secs(5));
    assert_eq!(settings.probe.business_timeout(), Duration::from_secs(10));
    assert_eq!(settings.probe.business_connect_timeout(), Duration::from_secs(5));
    assert_eq!(settings.probe.basic_marker, "pong");
    assert_eq!(settings.probe.test_endpoint, "");
    assert_eq!(settings.probe.business_endpoints.last().unwrap(), "/");
    assert_eq!(settings.probe.max_redirects, 3);
    assert_eq!(settings.probe.pacing(), Duration::from_millis(1000));
    assert_eq!(settings.diagnostic.targets.len(), 4);
    assert_eq!(settings.diagnostic.dns_domains.len(), 3);
    assert_eq!(
        settings.target.config_file,
        PathBuf::from("/www/wwwroot/dmmmmd/pro/Config/Config.json")
    );
    assert_eq!(settings.target.proxy_field, "ServerProxy");
    assert_eq!(settings.wecom.to_user, "@all");
    assert!(!settings.wecom.is_complete());
    assert_eq!(settings.run_timeout(), Duration::from_secs(90));
    assert!(settings.check().is_ok());
}

#[test]
fn test_toml_round_trip_and_partial_files() {
    let settings = Settings::default();
    let parsed = Settings::from_toml(&settings.to_toml().unwrap()).unwrap();
    assert_eq!(parsed, settings);

    let partial = Settings::from_toml(
        r#"
candidates = ["https://only.test"]

[probe]
pacing_ms = 0

[target]
config_file = "/tmp/Config.json"
"#,
    )
    .unwrap();

    assert_eq!(partial.candidates, vec!["https://only.test"]);
    assert_eq!(partial.probe.pacing_ms, 0);
    assert_eq!(partial.probe.basic_marker, "pong");
    assert_eq!(partial.target.config_file, PathBuf::from("/tmp/Config.json"));
    assert_eq!(partial.target.proxy_field, "ServerProxy");
}

#[test]
fn test_parse_error() {
    assert!(matches!(
        Settings::from_toml("candidates = ["),
        Err(SettingsError::Parse(_))
    ));
}

#[test]
fn test_check_rejects_invalid_values() {
    let mut empty = Settings::default();
    empty.candidates.clear();
    assert!(matches!(empty.check(), Err(SettingsError::Invalid(_))));

    let mut bad_scheme = Settings::default();
    bad_scheme.candidates.push("ftp://proxy.test".to_string());
    assert!(bad_scheme.check().is_err());

    let mut no_endpoints = Settings::default();
    no_endpoints.probe.business_endpoints.clear();
    assert!(no_endpoints.check().is_err());

    let mut zero_timeout = Settings::default();
    zero_timeout.probe.basic_timeout_secs = 0;
    assert!(zero_timeout.check().is_err());

    let mut empty_marker = Settings::default();
    empty_marker.probe.error_markers.push(String::new());
    assert!(empty_marker.check().is_err());

    let mut no_field = Settings::default();
    no_field.target.proxy_field = " ".to_string();
    assert!(no_field.check().is_err());
}

#[test]
#[serial]
fn test_load_explicit_path() {
    clear_wecom_env();
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(&path, "run_timeout_secs = 30\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).unwrap();
    assert_eq!(settings.run_timeout_secs, 30);
    assert_eq!(settings.candidates.len(), 6);

    let missing = temp_dir.path().join("missing.toml");
    assert!(matches!(
        Settings::load(Some(missing.as_path())),
        Err(SettingsError::NotFound(_))
    ));
}

#[test]
#[serial]
fn test_env_overrides_credentials() {
    clear_wecom_env();
    env::set_var(ENV_WECOM_CORP_ID, "ww123");
    env::set_var(ENV_WECOM_AGENT_ID, " 1000002 ");
    env::set_var(ENV_WECOM_SECRET, "s3cret");
    env::set_var(ENV_WECOM_TO_USER, "");

    let mut settings = Settings::default();
    settings.apply_env_overrides();
    clear_wecom_env();

    assert_eq!(settings.wecom.corp_id, "ww123");
    assert_eq!(settings.wecom.agent_id, "1000002");
    assert_eq!(settings.wecom.secret, "s3cret");
    // Empty values do not override
    assert_eq!(settings.wecom.to_user, "@all");
    assert!(settings.wecom.is_complete());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = create_temp_dir();
    let path = temp_dir.path().join("nested").join("settings.toml");

    let created = Settings::init(Some(path.as_path())).unwrap();
    assert_eq!(created, path);
    let written = Settings::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, Settings::default());

    assert!(matches!(
        Settings::init(Some(path.as_path())),
        Err(SettingsError::AlreadyExists(_))
    ));
}

#[test]
fn test_display_toml_masks_wecom_secret() {
    let mut settings = Settings::default();
    settings.wecom.corp_id = "ww123".to_string();
    settings.wecom.secret = "s3cret-value".to_string();

    let shown = settings.to_display_toml().unwrap();
    assert!(!shown.contains("s3cret-value"));
    assert!(shown.contains(SECRET_MASK));
    assert!(shown.contains("ww123"));
    // The settings themselves keep the real secret
    assert_eq!(settings.wecom.secret, "s3cret-value");

    // Nothing to hide when the secret is unset
    let shown = Settings::default().to_display_toml().unwrap();
    assert!(!shown.contains(SECRET_MASK));
}
