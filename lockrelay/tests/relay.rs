mod common;

use std::time::Duration;

use lockrelay::error::{Component, ErrorKind};
use lockrelay::messaging::ParseMode;
use lockrelay::store::StatusStore;
use lockrelay::test_utils::{command, push_event};
use lockrelay::types::Destination;
use lockrelay_config::shared::DeliveryFailurePolicy;
use lockrelay_telemetry::tracing::init_test_tracing;

use crate::common::spawn_relay;

const CHAT: &str = "-100200";

#[tokio::test(flavor = "multi_thread")]
async fn lock_lifecycle_is_relayed_to_subscriber_test() {
    init_test_tracing();
    let relay = spawn_relay(&["db1"], DeliveryFailurePolicy::Fatal);

    relay.commands.send(command("subscribe", "db1", CHAT)).unwrap();
    let sent = relay.messenger.wait_for_sent(1).await;
    assert_eq!(sent[0].text, "Subscribed to db1");

    let acquired = relay
        .ingestor
        .ingest(&push_event("db1", "alice", &["x", "Acquiring lock"]))
        .await
        .unwrap();
    assert!(acquired.is_open);

    let status = relay.store.read("db1").await.unwrap().unwrap();
    assert!(status.is_open);
    assert_eq!(status.lock_holder.as_deref(), Some("alice"));

    let sent = relay.messenger.wait_for_sent(2).await;
    assert_eq!(sent[1].destination, Destination::new(CHAT));
    assert_eq!(sent[1].text, "`db1` was *started* by _alice_");
    assert_eq!(sent[1].parse_mode, ParseMode::MarkdownV2);

    relay
        .ingestor
        .ingest(&push_event("db1", "bob", &["Releasing"]))
        .await
        .unwrap();

    let status = relay.store.read("db1").await.unwrap().unwrap();
    assert!(!status.is_open);
    assert_eq!(status.lock_holder, None);

    let sent = relay.messenger.wait_for_sent(3).await;
    assert_eq!(sent[2].text, "`db1` was *closed*");

    relay.commands.send(command("status", "db1", CHAT)).unwrap();
    let sent = relay.messenger.wait_for_sent(4).await;
    assert_eq!(sent[3].text, "`db1` is currently *closed*");
    assert_eq!(sent.len(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_release_is_idempotent_test() {
    init_test_tracing();
    let relay = spawn_relay(&["db1"], DeliveryFailurePolicy::Fatal);

    for _ in 0..2 {
        relay
            .ingestor
            .ingest(&push_event("db1", "bob", &["Releasing"]))
            .await
            .unwrap();

        let status = relay.store.read("db1").await.unwrap().unwrap();
        assert!(!status.is_open);
        assert_eq!(status.lock_holder, None);
    }

    // Without a subscriber nothing is delivered.
    assert!(relay.messenger.sent().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn status_of_unknown_server_gets_no_reply_test() {
    init_test_tracing();
    let relay = spawn_relay(&["db1"], DeliveryFailurePolicy::Fatal);

    relay.commands.send(command("status", "nope", CHAT)).unwrap();
    relay.commands.send(command("status", "db1", CHAT)).unwrap();

    // Commands are handled in order, so once the second reply is out the first was skipped.
    let sent = relay.messenger.wait_for_sent(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "`db1` is currently *closed*");
}

#[tokio::test(flavor = "multi_thread")]
async fn delivery_failure_stops_the_relay_test() {
    init_test_tracing();
    let mut relay = spawn_relay(&["db1"], DeliveryFailurePolicy::Fatal);

    relay
        .store
        .set_subscriber("db1", &Destination::new(CHAT))
        .await
        .unwrap();
    relay.messenger.fail_next_sends(1).await;

    relay
        .ingestor
        .ingest(&push_event("db1", "alice", &["Acquiring lock"]))
        .await
        .unwrap();

    let fatal = tokio::time::timeout(Duration::from_secs(5), relay.supervisor.wait())
        .await
        .expect("supervisor reports the failure");
    assert_eq!(fatal.component, Component::Dispatcher);
    assert_eq!(fatal.kind(), ErrorKind::DeliveryFailed);

    // With the dispatcher gone, further events cannot be handed off.
    let err = relay
        .ingestor
        .ingest(&push_event("db1", "alice", &["Releasing"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DispatcherUnavailable);
    assert!(relay.messenger.sent().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn delivery_failure_is_survived_under_log_policy_test() {
    init_test_tracing();
    let relay = spawn_relay(&["db1"], DeliveryFailurePolicy::Log);

    relay
        .store
        .set_subscriber("db1", &Destination::new(CHAT))
        .await
        .unwrap();
    relay.messenger.fail_next_sends(1).await;

    for messages in [["Acquiring lock"], ["Releasing"]] {
        relay
            .ingestor
            .ingest(&push_event("db1", "alice", &messages))
            .await
            .unwrap();
    }

    let sent = relay.messenger.wait_for_sent(1).await;
    assert_eq!(sent[0].text, "`db1` was *closed*");
}
