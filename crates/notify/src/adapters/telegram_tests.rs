// SPDX-License-Identifier: MIT

use super::*;

fn config() -> ChannelConfig {
    ChannelConfig {
        channel_type: ChannelType::Telegram,
        name: "tg".to_string(),
        bot_token: Some("token123".to_string()),
        chat_id: Some("42".to_string()),
        ..Default::default()
    }
}

#[test]
fn url_targets_the_configured_bot_token() {
    let adapter = TelegramAdapter::new(&config()).unwrap();
    assert_eq!(adapter.url(), "https://api.telegram.org/bottoken123/sendMessage");
}

#[test]
fn new_rejects_a_channel_without_a_bot_token() {
    let channel = ChannelConfig { channel_type: ChannelType::Telegram, name: "bare".to_string(), chat_id: Some("1".to_string()), ..Default::default() };
    assert!(TelegramAdapter::new(&channel).is_err());
}

#[test]
fn new_rejects_a_channel_without_a_chat_id() {
    let channel = ChannelConfig { channel_type: ChannelType::Telegram, name: "bare".to_string(), bot_token: Some("t".to_string()), ..Default::default() };
    assert!(TelegramAdapter::new(&channel).is_err());
}
