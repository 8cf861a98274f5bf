//! Synchronizer flows against a mock backend: optimistic sends, the unread
//! scenario, and the notification poll loop.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{authenticated_client, message_json, wait_until};
use ridelink::egui_app::sync::cache::CacheEvent;
use ridelink::egui_app::sync::notifications::NotificationSync;
use ridelink::egui_app::sync::outbox::Outbox;
use ridelink::egui_app::sync::{self, apply_shared, new_shared_cache};
use ridelink::egui_app::RealtimeClient;
use ridelink::shared::error::ClientError;
use ridelink::shared::messaging::DeliveryState;

#[tokio::test]
async fn offline_send_shows_immediately_then_fails_and_is_retained() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations/7/messages"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_string("service unavailable")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let cache = new_shared_cache();
    apply_shared(&cache, CacheEvent::SessionStarted { user_id: 1 });
    let outbox = Outbox::new(Arc::clone(&cache), api);

    let send = {
        let outbox = outbox.clone();
        tokio::spawn(async move { outbox.send_text(7, "are you there?".to_string()).await })
    };

    // the optimistic entry appears while the backend call is still in flight
    {
        let cache = Arc::clone(&cache);
        wait_until("optimistic entry to appear", move || {
            let state = cache.lock().unwrap();
            state
                .conversation_messages(7)
                .iter()
                .any(|m| m.delivery == DeliveryState::Pending)
        })
        .await;
    }

    // the backend rejects; the caller gets the toastable error
    let result = send.await.unwrap();
    assert!(matches!(result, Err(ClientError::Api { status: 503, .. })));

    // the entry is retained, tagged failed
    let state = cache.lock().unwrap();
    let messages = state.conversation_messages(7);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].delivery, DeliveryState::Failed);
    assert_eq!(messages[0].body.as_deref(), Some("are you there?"));
}

#[tokio::test]
async fn successful_send_replaces_the_pending_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations/7/messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(message_json(42, 7, 1, "hello")))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let cache = new_shared_cache();
    apply_shared(&cache, CacheEvent::SessionStarted { user_id: 1 });
    let outbox = Outbox::new(Arc::clone(&cache), api);

    outbox.send_text(7, "hello".to_string()).await.unwrap();

    let state = cache.lock().unwrap();
    let messages = state.conversation_messages(7);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, Some(42));
    assert_eq!(messages[0].delivery, DeliveryState::Sent);
    // own message never bumps the unread count
    assert_eq!(state.unread_count, 0);
}

#[tokio::test]
async fn unread_scenario_count_drops_after_marking_read() {
    // user 1, conversation 7, one unread message from user 2
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages/unread/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 1})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages/unread/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 0})))
        .mount(&server)
        .await;
    let mut read_message = message_json(10, 7, 2, "is the car free?");
    read_message["read_at"] = serde_json::json!("2026-02-01T10:00:00Z");
    Mock::given(method("PUT"))
        .and(path("/messages/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(read_message))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let cache = new_shared_cache();
    apply_shared(&cache, CacheEvent::SessionStarted { user_id: 1 });
    apply_shared(
        &cache,
        CacheEvent::MessagePushed(serde_json::from_value(message_json(10, 7, 2, "is the car free?")).unwrap()),
    );

    // first poll: one unread
    let count = api.unread_count().await.unwrap();
    apply_shared(&cache, CacheEvent::UnreadCountFetched { count });
    assert_eq!(cache.lock().unwrap().unread_count, 1);

    // mark it read through the backend
    sync::mark_message_read(&cache, &api, 10).await.unwrap();
    assert_eq!(cache.lock().unwrap().unread_count, 0);

    // the subsequent poll agrees
    let count = api.unread_count().await.unwrap();
    apply_shared(&cache, CacheEvent::UnreadCountFetched { count });
    let state = cache.lock().unwrap();
    assert_eq!(state.unread_count, 0);
    assert_eq!(state.derived_unread(), 0);
}

#[tokio::test]
async fn notification_sync_fetches_the_count_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages/unread/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 3})))
        .mount(&server)
        .await;

    // no broadcaster configured: push listeners are silent no-ops and the
    // poll is the only update path
    let (api, _dir) = authenticated_client(&server.uri(), false);
    let cache = new_shared_cache();
    let realtime = Arc::new(RealtimeClient::new(api.clone()));
    let notifications = NotificationSync::new(Arc::clone(&cache), api, Arc::clone(&realtime));

    notifications.start(1).await;
    assert!(notifications.is_running());
    assert!(realtime.registry().is_empty());

    {
        let cache = Arc::clone(&cache);
        wait_until("unread count to arrive", move || {
            cache.lock().unwrap().unread_count == 3
        })
        .await;
    }

    notifications.stop().await;
    assert!(!notifications.is_running());
}

#[tokio::test]
async fn backend_failure_leaves_cache_state_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/messages/10"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let cache = new_shared_cache();
    apply_shared(&cache, CacheEvent::SessionStarted { user_id: 1 });
    apply_shared(
        &cache,
        CacheEvent::MessagePushed(serde_json::from_value(message_json(10, 7, 2, "hi")).unwrap()),
    );

    assert!(sync::mark_message_read(&cache, &api, 10).await.is_err());

    // no partial mutation: the message is still unread
    let state = cache.lock().unwrap();
    assert_eq!(state.unread_count, 1);
    assert!(state.conversation_messages(7)[0].read_at.is_none());
}
