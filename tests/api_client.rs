//! Backend API client tests against a mock HTTP server

mod common;

use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{authenticated_client, message_json, test_config, test_session};
use ridelink::egui_app::ApiClient;
use ridelink::shared::error::ClientError;

#[tokio::test]
async fn login_installs_the_session_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(serde_json::json!({
            "email": "ada@example.com",
            "password": "secret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "fresh-token",
            "user": {
                "id": 1,
                "name": "Ada",
                "email": "ada@example.com",
                "avatar": null,
                "role": "client",
            },
        })))
        .mount(&server)
        .await;

    let (session, _dir) = test_session();
    let api = ApiClient::new(test_config(&server.uri(), false), session.clone());

    let auth = api
        .login("ada@example.com".to_string(), "secret".to_string())
        .await
        .unwrap();
    assert_eq!(auth.user.id, 1);
    assert_eq!(session.token().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages/unread/count"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 1})))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    assert_eq!(api.unread_count().await.unwrap(), 1);
}

#[tokio::test]
async fn missing_credential_is_unauthorized_without_a_request() {
    let server = MockServer::start().await;
    let (session, _dir) = test_session();
    let api = ApiClient::new(test_config(&server.uri(), false), session);

    let result = api.unread_count().await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn rejected_credential_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    assert!(matches!(
        api.list_conversations().await,
        Err(ClientError::Unauthorized)
    ));
}

#[tokio::test]
async fn backend_failure_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations/7/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    match api.send_message(7, "hello".to_string()).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn send_message_posts_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations/7/messages"))
        .and(body_json(serde_json::json!({"body": "is the car free?"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(message_json(42, 7, 1, "is the car free?")),
        )
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let message = api.send_message(7, "is the car free?".to_string()).await.unwrap();
    assert_eq!(message.id, Some(42));
    assert_eq!(message.conversation_id, 7);
}

#[tokio::test]
async fn mark_read_puts_the_read_flag() {
    let server = MockServer::start().await;
    let mut updated = message_json(42, 7, 2, "hello");
    updated["read_at"] = serde_json::json!("2026-02-01T10:00:00Z");
    Mock::given(method("PUT"))
        .and(path("/messages/42"))
        .and(body_json(serde_json::json!({"read": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let message = api.mark_read(42).await.unwrap();
    assert_eq!(message.read_at.as_deref(), Some("2026-02-01T10:00:00Z"));
}

#[tokio::test]
async fn search_users_sends_the_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("query", "bo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": [{
                "id": 2,
                "name": "Bo",
                "email": "bo@example.com",
                "avatar": null,
                "role": "owner",
            }],
        })))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let users = api.search_users("bo").await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 2);
}

#[tokio::test]
async fn delete_message_hits_the_message_resource() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/messages/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    api.delete_message(42).await.unwrap();
}

#[tokio::test]
async fn send_attachment_uses_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations/7/messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(message_json(43, 7, 1, "see photo")))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let message = api
        .send_attachment(7, Some("see photo".to_string()), "car.jpg".to_string(), vec![0xFF, 0xD8])
        .await
        .unwrap();
    assert_eq!(message.id, Some(43));
}

#[tokio::test]
async fn logout_clears_the_credential_even_when_the_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    assert!(api.logout().await.is_err());
    assert!(api.session().token().is_none());
}

#[tokio::test]
async fn broadcast_auth_returns_the_signature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/broadcasting/auth"))
        .and(body_json(serde_json::json!({
            "socket_id": "81.1",
            "channel_name": "private-App.Models.User.1",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"auth": "test-key:signature"})),
        )
        .mount(&server)
        .await;

    let (api, _dir) = authenticated_client(&server.uri(), false);
    let auth = api
        .broadcast_auth("81.1", "private-App.Models.User.1")
        .await
        .unwrap();
    assert_eq!(auth, "test-key:signature");
}
