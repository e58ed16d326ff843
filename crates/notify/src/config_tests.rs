// SPDX-License-Identifier: MIT

use super::*;

fn webhook(name: &str) -> ChannelConfig {
    ChannelConfig {
        channel_type: ChannelType::Webhook,
        name: name.to_string(),
        url: Some("https://example.test/hook".to_string()),
        ..Default::default()
    }
}

#[test]
fn validate_accepts_a_well_formed_config() {
    let config = NotificationConfig {
        enabled: true,
        channels: vec![webhook("primary")],
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_duplicate_channel_names() {
    let config = NotificationConfig {
        channels: vec![webhook("dup"), webhook("dup")],
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_a_webhook_channel_missing_a_url() {
    let config = NotificationConfig {
        channels: vec![ChannelConfig { channel_type: ChannelType::Webhook, name: "bare".to_string(), ..Default::default() }],
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_a_telegram_channel_missing_bot_token_or_chat_id() {
    let config = NotificationConfig {
        channels: vec![ChannelConfig {
            channel_type: ChannelType::Telegram,
            name: "tg".to_string(),
            bot_token: Some("token".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_an_event_rule_referencing_an_unknown_channel() {
    let mut events = HashMap::new();
    events.insert(EventType::AgentError, EventRule { channels: vec!["missing".to_string()], ..Default::default() });
    let config = NotificationConfig { channels: vec![webhook("primary")], events, ..Default::default() };
    assert!(config.validate().is_err());
}

#[test]
fn from_toml_str_parses_a_minimal_document() {
    let raw = r#"
        enabled = true

        [[channels]]
        type = "webhook"
        name = "primary"
        url = "https://example.test/hook"
    "#;
    let config = NotificationConfig::from_toml_str(raw).unwrap();
    assert!(config.enabled);
    assert_eq!(config.channels.len(), 1);
    assert_eq!(config.channels[0].name, "primary");
}

#[test]
fn from_toml_str_interpolates_environment_variables() {
    std::env::set_var("MC_NOTIFY_TEST_TOKEN", "secret-token");
    let raw = r#"
        [[channels]]
        type = "telegram"
        name = "tg"
        bot_token = "${MC_NOTIFY_TEST_TOKEN}"
        chat_id = "${MC_NOTIFY_TEST_CHAT:-12345}"
    "#;
    let config = NotificationConfig::from_toml_str(raw).unwrap();
    assert_eq!(config.channels[0].bot_token.as_deref(), Some("secret-token"));
    assert_eq!(config.channels[0].chat_id.as_deref(), Some("12345"));
    std::env::remove_var("MC_NOTIFY_TEST_TOKEN");
}

#[test]
fn quiet_hours_config_defaults_to_disabled_with_a_utc_window() {
    let config = QuietHoursConfig::default();
    assert!(!config.enabled);
    assert_eq!(config.timezone, "+00:00");
}
