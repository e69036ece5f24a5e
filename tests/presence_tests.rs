use quickchat_backend::dto::message_dto::MessageView;
use quickchat_backend::realtime::presence::{PresenceRegistry, ServerEvent};

fn sample_message() -> MessageView {
    MessageView {
        id: None,
        sender_id: "64f0aa5c9d3b2a0001a1b2c3".to_string(),
        receiver_id: "64f0aa5c9d3b2a0001a1b2c4".to_string(),
        text: Some("hello".to_string()),
        image_url: None,
        seen: false,
        created_at: Some("2025-01-01T00:00:00+00:00".to_string()),
    }
}

#[tokio::test]
async fn test_connect_marks_user_online() {
    let registry = PresenceRegistry::new();
    assert!(registry.online_users().await.is_empty());

    let (_conn, _rx) = registry.connect("alice").await;
    assert!(registry.is_online("alice").await);
    assert_eq!(registry.online_users().await, vec!["alice".to_string()]);
}

#[tokio::test]
async fn test_disconnect_marks_user_offline() {
    let registry = PresenceRegistry::new();
    let (conn, _rx) = registry.connect("alice").await;

    registry.disconnect("alice", conn).await;
    assert!(!registry.is_online("alice").await);
    assert!(registry.online_users().await.is_empty());
}

#[tokio::test]
async fn test_user_stays_online_while_one_connection_remains() {
    let registry = PresenceRegistry::new();
    let (first, _rx1) = registry.connect("alice").await;
    let (_second, _rx2) = registry.connect("alice").await;

    registry.disconnect("alice", first).await;
    assert!(registry.is_online("alice").await);
    assert_eq!(registry.online_users().await.len(), 1);
}

#[tokio::test]
async fn test_connect_pushes_online_users_event() {
    let registry = PresenceRegistry::new();
    let (_conn, mut rx) = registry.connect("alice").await;

    // The connection hears about the online set it just joined
    match rx.recv().await {
        Some(ServerEvent::OnlineUsers { users }) => {
            assert_eq!(users, vec!["alice".to_string()]);
        }
        other => panic!("Expected OnlineUsers event, got {:?}", other),
    }

    let (_conn_b, _rx_b) = registry.connect("bob").await;
    match rx.recv().await {
        Some(ServerEvent::OnlineUsers { users }) => {
            assert_eq!(users, vec!["alice".to_string(), "bob".to_string()]);
        }
        other => panic!("Expected OnlineUsers event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_to_delivers_to_all_connections() {
    let registry = PresenceRegistry::new();
    let (_c1, mut rx1) = registry.connect("bob").await;
    let (_c2, mut rx2) = registry.connect("bob").await;

    // Drain the presence events from connect
    while let Ok(event) = rx1.try_recv() {
        assert!(matches!(event, ServerEvent::OnlineUsers { .. }));
    }
    while let Ok(event) = rx2.try_recv() {
        assert!(matches!(event, ServerEvent::OnlineUsers { .. }));
    }

    let delivered = registry
        .send_to(
            "bob",
            ServerEvent::NewMessage {
                message: sample_message(),
            },
        )
        .await;
    assert_eq!(delivered, 2);

    assert!(matches!(
        rx1.recv().await,
        Some(ServerEvent::NewMessage { .. })
    ));
    assert!(matches!(
        rx2.recv().await,
        Some(ServerEvent::NewMessage { .. })
    ));
}

#[tokio::test]
async fn test_send_to_offline_user_is_noop() {
    let registry = PresenceRegistry::new();
    let delivered = registry
        .send_to(
            "nobody",
            ServerEvent::NewMessage {
                message: sample_message(),
            },
        )
        .await;
    assert_eq!(delivered, 0);
}

#[test]
fn test_server_event_wire_format() {
    let event = ServerEvent::OnlineUsers {
        users: vec!["alice".to_string()],
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "online_users");
    assert_eq!(json["users"][0], "alice");

    let event = ServerEvent::NewMessage {
        message: sample_message(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "new_message");
    assert_eq!(json["message"]["text"], "hello");
}
