//! WeCom (enterprise WeChat) application message delivery

use super::message::{build_message, MessageContent};
use super::{NotificationContext, Notifier, NotifyError, NotifyOutcome};
use crate::config::WeComSettings;
use crate::core::network::debug_logger::EnhancedDebugLogger;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub picurl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsBody {
    pub articles: Vec<NewsArticle>,
}

/// `message/send` payload of type `news`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsMessage {
    pub touser: String,
    pub msgtype: String,
    pub agentid: Value,
    pub news: NewsBody,
}

impl NewsMessage {
    /// Wrap a composed message into a single-article news payload
    ///
    /// Numeric agent ids are sent as JSON numbers, anything else verbatim.
    pub fn new(settings: &WeComSettings, content: MessageContent) -> Self {
        let agentid = settings
            .agent_id
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(settings.agent_id.clone()));

        Self {
            touser: settings.to_user.clone(),
            msgtype: "news".to_string(),
            agentid,
            news: NewsBody {
                articles: vec![NewsArticle {
                    title: content.title,
                    description: content.description,
                    url: String::new(),
                    picurl: String::new(),
                }],
            },
        }
    }
}

/// Delivers run reports as WeCom application messages
pub struct WeComNotifier {
    settings: WeComSettings,
    agent: ureq::Agent,
}

impl WeComNotifier {
    pub fn new(settings: WeComSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build();

        Self {
            settings,
            agent: config.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn fetch_access_token(&self) -> Result<String, NotifyError> {
        let mut response = self
            .agent
            .get(&self.api_url("/cgi-bin/gettoken"))
            .query("corpid", &self.settings.corp_id)
            .query("corpsecret", &self.settings.secret)
            .call()
            .map_err(|e| NotifyError::TokenFailed(e.to_string()))?;

        if response.status().as_u16() != 200 {
            return Err(NotifyError::TokenFailed(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| NotifyError::TokenFailed(e.to_string()))?;

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(access_token),
            _ => Err(NotifyError::TokenFailed(format!(
                "{} (code: {})",
                token.errmsg, token.errcode
            ))),
        }
    }

    fn send(&self, access_token: &str, message: &NewsMessage) -> Result<(), NotifyError> {
        let mut response = self
            .agent
            .post(&self.api_url("/cgi-bin/message/send"))
            .query("access_token", access_token)
            .header("Content-Type", "application/json; charset=utf-8")
            .send_json(message)
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        if response.status().as_u16() != 200 {
            return Err(NotifyError::Http(format!("HTTP {}", response.status().as_u16())));
        }

        let result: SendResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        if result.errcode != 0 {
            return Err(NotifyError::Api {
                code: result.errcode,
                message: result.errmsg,
            });
        }
        Ok(())
    }
}

impl Notifier for WeComNotifier {
    fn notify(&self, context: &NotificationContext<'_>) -> Result<NotifyOutcome, NotifyError> {
        let logger = EnhancedDebugLogger::new();

        if !self.settings.is_complete() {
            logger.notification("skipped", "WeCom credentials incomplete");
            return Ok(NotifyOutcome::Skipped(
                "WeCom credentials incomplete".to_string(),
            ));
        }

        let access_token = self.fetch_access_token()?;
        let message = NewsMessage::new(&self.settings, build_message(context));
        self.send(&access_token, &message)?;

        logger.notification("sent", &message.touser);
        Ok(NotifyOutcome::Sent)
    }
}
