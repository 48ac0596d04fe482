use std::time::Duration;

use lockrelay::error::ErrorKind;
use lockrelay::messaging::{CommandSource, Messenger, OutboundMessage};
use lockrelay::types::Destination;
use lockrelay_config::shared::TelegramConfig;
use lockrelay_service::telegram::{TelegramClient, TelegramUpdates};
use lockrelay_telemetry::tracing::init_test_tracing;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:secret-token";

fn client(server: &MockServer) -> TelegramClient {
    let config = TelegramConfig {
        api_url: server.uri(),
        token: SecretString::new(TOKEN.to_string()),
        poll_timeout_secs: 1,
        request_timeout_secs: 5,
    };

    TelegramClient::new(&config).unwrap()
}

fn command_update(update_id: i64, chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 0,
            "chat": {"id": chat_id, "type": "private"},
            "from": {"id": 1, "is_bot": false, "first_name": "Alice", "username": "alice"},
            "text": text
        }
    })
}

#[tokio::test]
async fn send_message_posts_markdown_to_the_chat() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_json(json!({
            "chat_id": "-100",
            "text": "`db1` was *closed*",
            "parse_mode": "MarkdownV2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send(OutboundMessage::markdown(
            Destination::new("-100"),
            "`db1` was *closed*",
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn plain_messages_have_no_parse_mode() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_json(json!({"chat_id": "7", "text": "Subscribed to db1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send(OutboundMessage::plain(Destination::new("7"), "Subscribed to db1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_message_is_a_delivery_failure() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .send(OutboundMessage::plain(Destination::new("1"), "hi"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DeliveryFailed);
    let detail = err.detail().unwrap();
    assert!(detail.contains("chat not found"));
    assert!(!detail.contains(TOKEN));
}

#[tokio::test]
async fn updates_yield_commands_and_advance_the_offset() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(body_partial_json(json!({"offset": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                command_update(10, 42, "/status db1"),
                command_update(11, 42, "just chatting"),
                command_update(12, 43, "/subscribe@lock_bot db2"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(body_partial_json(json!({"offset": 13})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [command_update(13, 42, "/help")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut updates = TelegramUpdates::new(client(&server), Duration::from_secs(1));

    let first = updates.next_command().await.unwrap().unwrap();
    assert_eq!(first.word, "status");
    assert_eq!(first.argument, "db1");
    assert_eq!(first.actor, "alice");
    assert_eq!(first.reply_to, Destination::new("42"));

    let second = updates.next_command().await.unwrap().unwrap();
    assert_eq!(second.word, "subscribe");
    assert_eq!(second.argument, "db2");
    assert_eq!(second.reply_to, Destination::new("43"));

    let third = updates.next_command().await.unwrap().unwrap();
    assert_eq!(third.word, "help");
}

#[tokio::test]
async fn failed_poll_is_a_command_source_failure() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let mut updates = TelegramUpdates::new(client(&server), Duration::from_secs(1));
    let err = updates.next_command().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CommandSourceFailed);
}
