use proxyopt::config::WeComSettings;
use proxyopt::core::config_store::{ConfigUpdateResult, MSG_ALREADY_OPTIMAL};
use proxyopt::core::network::types::DiagnosticSummary;
use proxyopt::notify::message::MessageContent;
use proxyopt::notify::wecom::NewsMessage;
use proxyopt::notify::{NotificationContext, Notifier, NotifyOutcome, WeComNotifier};
use serde_json::json;

fn credentials(agent_id: &str) -> WeComSettings {
    WeComSettings {
        corp_id: "ww123".to_string(),
        agent_id: agent_id.to_string(),
        secret: "s3cret".to_string(),
        ..WeComSettings::default()
    }
}

fn content() -> MessageContent {
    MessageContent {
        title: "title".to_string(),
        description: "body".to_string(),
    }
}

#[test]
fn test_news_payload_shape() {
    let message = NewsMessage::new(&credentials("1000002"), content());

    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "touser": "@all",
            "msgtype": "news",
            "agentid": 1000002,
            "news": {
                "articles": [
                    {"title": "title", "description": "body", "url": "", "picurl": ""}
                ]
            }
        })
    );
}

#[test]
fn test_non_numeric_agent_id_sent_verbatim() {
    let message = NewsMessage::new(&credentials("agent-x"), content());
    assert_eq!(message.agentid, json!("agent-x"));
}

#[test]
fn test_incomplete_credentials_skip_delivery() {
    let settings = WeComSettings {
        secret: String::new(),
        ..credentials("1000002")
    };
    let notifier = WeComNotifier::new(settings);

    let diagnostic = DiagnosticSummary::default();
    let update = ConfigUpdateResult::unchanged("", "", MSG_ALREADY_OPTIMAL);
    let context = NotificationContext {
        diagnostic: &diagnostic,
        outcomes: &[],
        config_update: &update,
        current_proxy: "",
        all_failed: false,
        checked_at: String::new(),
    };

    match notifier.notify(&context).unwrap() {
        NotifyOutcome::Skipped(reason) => assert!(reason.contains("incomplete")),
        other => panic!("unexpected outcome {:?}", other),
    }
}
