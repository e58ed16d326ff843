// SPDX-License-Identifier: MIT

use super::*;
use mc_core::EventType;

#[tokio::test]
async fn records_sent_events() {
    let adapter = FakeNotifyAdapter::new("fake");
    let event = Event::new("repo", EventType::AgentError, "t", "m");
    adapter.send(&event).await.unwrap();
    assert_eq!(adapter.sent().len(), 1);
}

#[tokio::test]
async fn fail_next_send_forces_a_single_error() {
    let adapter = FakeNotifyAdapter::new("fake");
    adapter.fail_next_send();
    let event = Event::new("repo", EventType::AgentError, "t", "m");
    assert!(adapter.send(&event).await.is_err());
    assert!(adapter.send(&event).await.is_ok());
}

#[tokio::test]
async fn close_marks_the_adapter_closed() {
    let adapter = FakeNotifyAdapter::new("fake");
    adapter.close().await.unwrap();
    assert!(adapter.is_closed());
}

#[tokio::test]
async fn interactive_adapter_forwards_delivered_responses() {
    let adapter = FakeInteractiveAdapter::new("fake");
    let received = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&received);
    adapter.set_response_handler(Arc::new(move |response| {
        *sink.lock() = Some(response);
    }));

    let response = mc_core::Response {
        event_id: None,
        response_id: mc_core::ReplyId::new(),
        message: Some("ok".to_string()),
        action: None,
        source: "fake".to_string(),
        user_id: None,
        timestamp: chrono::Utc::now(),
    };
    adapter.deliver_response(response.clone());

    assert_eq!(received.lock().as_ref().unwrap().response_id, response.response_id);
}
