use serde_json::json;
use tokio::time::{timeout, Duration};

use shared_realtime::{ConnectionRegistry, Delivery};

#[tokio::test]
async fn test_registry_starts_empty() {
    let registry = ConnectionRegistry::default();
    assert_eq!(registry.active_connections().await, 0);
    assert!(registry.connection_for("nobody").await.is_none());
}

#[tokio::test]
async fn test_notify_delivers_to_registered_user() {
    let registry = ConnectionRegistry::new(8);
    let (_connection_id, mut receiver) = registry.register("user-1").await;

    let delivery = registry.notify("user-1", &json!({"type": "new_message"})).await;
    assert_eq!(delivery, Delivery::Sent);

    let raw = timeout(Duration::from_secs(1), receiver.recv())
        .await
        .expect("notification should arrive")
        .expect("channel should be open");
    let payload: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(payload["type"], "new_message");
}

#[tokio::test]
async fn test_notify_unknown_user_is_silent() {
    let registry = ConnectionRegistry::new(8);
    let delivery = registry.notify("ghost", &json!({"type": "new_message"})).await;
    assert_eq!(delivery, Delivery::NotConnected);
}

#[tokio::test]
async fn test_full_buffer_drops_instead_of_blocking() {
    let registry = ConnectionRegistry::new(1);
    let (_connection_id, _receiver) = registry.register("slow").await;

    assert_eq!(registry.notify("slow", &json!(1)).await, Delivery::Sent);

    let second = timeout(Duration::from_millis(200), registry.notify("slow", &json!(2)))
        .await
        .expect("notify must not block on a full buffer");
    assert_eq!(second, Delivery::Dropped);
}

#[tokio::test]
async fn test_closed_receiver_drops() {
    let registry = ConnectionRegistry::new(4);
    let (_connection_id, receiver) = registry.register("gone").await;
    drop(receiver);

    assert_eq!(registry.notify("gone", &json!({})).await, Delivery::Dropped);
}

#[tokio::test]
async fn test_reconnect_replaces_user_mapping() {
    let registry = ConnectionRegistry::new(4);
    let (first, mut first_rx) = registry.register("user-1").await;
    let (second, mut second_rx) = registry.register("user-1").await;

    assert_ne!(first, second);
    assert_eq!(registry.connection_for("user-1").await, Some(second));
    // The old connection is not closed, only bypassed.
    assert_eq!(registry.active_connections().await, 2);

    registry.notify("user-1", &json!({"n": 1})).await;
    assert!(second_rx.try_recv().is_ok());
    assert!(first_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unregister_stale_connection_keeps_newer_mapping() {
    let registry = ConnectionRegistry::new(4);
    let (first, _first_rx) = registry.register("user-1").await;
    let (second, _second_rx) = registry.register("user-1").await;

    registry.unregister(first, "user-1").await;

    assert_eq!(registry.connection_for("user-1").await, Some(second));
    assert_eq!(registry.active_connections().await, 1);
}

#[tokio::test]
async fn test_unregister_removes_both_mappings_and_is_idempotent() {
    let registry = ConnectionRegistry::new(4);
    let (connection_id, _rx) = registry.register("user-1").await;

    registry.unregister(connection_id, "user-1").await;
    registry.unregister(connection_id, "user-1").await;

    assert_eq!(registry.active_connections().await, 0);
    assert!(registry.connection_for("user-1").await.is_none());
    assert_eq!(registry.notify("user-1", &json!({})).await, Delivery::NotConnected);
}

#[tokio::test]
async fn test_clones_share_state() {
    let registry = ConnectionRegistry::new(4);
    let cloned = registry.clone();
    let (connection_id, _rx) = registry.register("user-1").await;

    assert_eq!(cloned.connection_for("user-1").await, Some(connection_id));
}
