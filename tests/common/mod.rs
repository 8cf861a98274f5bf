//! Shared helpers for integration tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use ridelink::egui_app::{ApiClient, Config, Session};
use ridelink::shared::config::AppConfig;
use ridelink::shared::messaging::{Role, UserInfo};

/// Build a Config pointing at a test server, optionally with broadcaster
/// settings so the realtime layer considers itself configured.
pub fn test_config(server_url: &str, with_broadcaster: bool) -> Config {
    let mut builder = AppConfig::builder().server_url(server_url);
    if with_broadcaster {
        builder = builder.broadcaster_key("test-key").broadcaster_cluster("test");
    }
    Config::with_builder(builder).unwrap()
}

/// A session persisted into a temp dir; the dir guard must stay alive for
/// the duration of the test.
pub fn test_session() -> (Arc<Session>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let session = Arc::new(Session::load_from(dir.path().join("session.json")));
    (session, dir)
}

pub fn test_user(id: u64) -> UserInfo {
    UserInfo {
        id,
        name: format!("user-{}", id),
        email: format!("user{}@example.com", id),
        avatar: None,
        role: Role::Client,
    }
}

/// Authenticated ApiClient against a test server
pub fn authenticated_client(
    server_url: &str,
    with_broadcaster: bool,
) -> (ApiClient, tempfile::TempDir) {
    let (session, dir) = test_session();
    session.set("test-token".to_string(), test_user(1));
    let api = ApiClient::new(test_config(server_url, with_broadcaster), session);
    (api, dir)
}

/// Poll a condition until it holds or the deadline passes
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..150 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for: {}", what);
}

/// Message entity JSON as the backend serializes it
pub fn message_json(id: u64, conversation_id: u64, sender_id: u64, body: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "conversation_id": conversation_id,
        "sender_id": sender_id,
        "body": body,
        "attachment_url": null,
        "read_at": null,
        "created_at": "2026-02-01T09:00:00Z",
    })
}

/// In-process stand-in for the pub/sub broadcaster. Accepts any number of
/// websocket connections; each gets the handshake, and every subscribe is
/// acknowledged and followed by one `message.new` event on that channel so
/// tests can observe dispatch.
pub async fn spawn_fake_broadcaster() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut connection_seq = 0u64;
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            connection_seq += 1;
            let socket_id = format!("81.{}", connection_seq);
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                    return;
                };
                let established = serde_json::json!({
                    "event": "pusher:connection_established",
                    "data": serde_json::json!({
                        "socket_id": socket_id,
                        "activity_timeout": 120,
                    })
                    .to_string(),
                });
                if ws.send(Message::text(established.to_string())).await.is_err() {
                    return;
                }

                while let Some(Ok(frame)) = ws.next().await {
                    let Message::Text(text) = frame else {
                        continue;
                    };
                    let Ok(value) = serde_json::from_str::<serde_json::Value>(text.as_str()) else {
                        continue;
                    };
                    if value["event"] == "pusher:subscribe" {
                        let channel = value["data"]["channel"].as_str().unwrap_or("").to_string();
                        let ack = serde_json::json!({
                            "event": "pusher_internal:subscription_succeeded",
                            "channel": channel,
                            "data": "{}",
                        });
                        if ws.send(Message::text(ack.to_string())).await.is_err() {
                            return;
                        }
                        let event = serde_json::json!({
                            "event": "message.new",
                            "channel": channel,
                            "data": message_json(99, 7, 2, "push delivery").to_string(),
                        });
                        if ws.send(Message::text(event.to_string())).await.is_err() {
                            return;
                        }
                    }
                }
            });
        }
    });
    addr
}
