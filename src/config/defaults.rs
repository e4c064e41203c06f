// Built-in defaults. Literals are kept as deployed; change them through
// the settings file rather than here.

use super::types::{
    DiagnosticSettings, DiagnosticTarget, ProbeSettings, Settings, TargetSettings, WeComSettings,
};
use std::path::PathBuf;

pub const DEFAULT_CANDIDATES: [&str; 6] = [
    "https://129888.xyz",
    "https://naizi.lolkda.top",
    "http://ark.yanyuwangluo.cn:1200",
    "http://ark.jdddns.tk",
    "https://cap.lolkda.cf",
    "https://newpro.03vps.cn",
];

pub const DEFAULT_BUSINESS_ENDPOINTS: [&str; 6] = [
    "/api/license/verify",
    "/license/verify",
    "/api/status",
    "/status",
    "/health",
    "/",
];

pub const DEFAULT_ERROR_MARKERS: [&str; 6] = [
    "error",
    "exception",
    "nullreference",
    "object reference",
    "failed",
    "invalid",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_DNS_DOMAINS: [&str; 3] = ["qyapi.weixin.qq.com", "api.weixin.qq.com", "www.qq.com"];

pub const DEFAULT_CONFIG_FILE: &str = "/www/wwwroot/dmmmmd/pro/Config/Config.json";
pub const DEFAULT_PROXY_FIELD: &str = "ServerProxy";
pub const DEFAULT_WECOM_API_BASE: &str = "https://qyapi.weixin.qq.com";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            candidates: strings(&DEFAULT_CANDIDATES),
            run_timeout_secs: 90,
            probe: ProbeSettings::default(),
            diagnostic: DiagnosticSettings::default(),
            target: TargetSettings::default(),
            wecom: WeComSettings::default(),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            basic_timeout_secs: 5,
            test_endpoint: String::new(),
            basic_marker: "pong".to_string(),
            business_endpoints: strings(&DEFAULT_BUSINESS_ENDPOINTS),
            business_timeout_secs: 10,
            business_connect_timeout_secs: 5,
            error_markers: strings(&DEFAULT_ERROR_MARKERS),
            max_redirects: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pacing_ms: 1000,
        }
    }
}

impl Default for DiagnosticSettings {
    fn default() -> Self {
        let target = |description: &str, url: &str| DiagnosticTarget {
            description: description.to_string(),
            url: url.to_string(),
        };

        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            dns_timeout_secs: 5,
            dns_domains: strings(&DEFAULT_DNS_DOMAINS),
            targets: vec![
                target("Baidu (basic web reachability)", "https://www.baidu.com"),
                target("HTTPBin (IP echo service)", "https://httpbin.org/ip"),
                target("WeCom API domain", "https://qyapi.weixin.qq.com"),
                target("WeCom token endpoint", "https://qyapi.weixin.qq.com/cgi-bin/gettoken"),
            ],
        }
    }
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            proxy_field: DEFAULT_PROXY_FIELD.to_string(),
        }
    }
}

impl Default for WeComSettings {
    fn default() -> Self {
        Self {
            corp_id: String::new(),
            agent_id: String::new(),
            secret: String::new(),
            to_user: "@all".to_string(),
            api_base: DEFAULT_WECOM_API_BASE.to_string(),
        }
    }
}
