//! Optimistic Outbox
//!
//! Sending a message is an optimistic local append followed by the backend
//! call: the entry shows up in the conversation immediately, tagged
//! `Pending`. On confirmation it is replaced by the server copy; on failure
//! it is tagged `Failed` and retained so the user can retry or dismiss it -
//! the typed text is never silently lost.

use uuid::Uuid;

use super::cache::CacheEvent;
use super::{apply_shared, SharedCache};
use crate::egui_app::api::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::messaging::ChatMessage;

/// Sends messages with optimistic local appends
#[derive(Debug, Clone)]
pub struct Outbox {
    cache: SharedCache,
    api: ApiClient,
}

impl Outbox {
    pub fn new(cache: SharedCache, api: ApiClient) -> Self {
        Self { cache, api }
    }

    /// Send a text message. The optimistic entry is queued before the
    /// backend call; the returned error (if any) is what the UI shows as a
    /// toast while the `Failed` entry stays in the conversation.
    pub async fn send_text(&self, conversation_id: u64, body: String) -> Result<(), ClientError> {
        let Some(user) = self.api.session().user() else {
            return Err(ClientError::Unauthorized);
        };

        let pending = ChatMessage::new_pending(conversation_id, user.id, body.clone());
        let local_id = pending.local_id;
        apply_shared(&self.cache, CacheEvent::MessageQueued(pending));

        self.resolve(conversation_id, local_id, self.api.send_message(conversation_id, body).await)
    }

    /// Send a message with an attachment through the multipart endpoint.
    pub async fn send_attachment(
        &self,
        conversation_id: u64,
        body: Option<String>,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<(), ClientError> {
        let Some(user) = self.api.session().user() else {
            return Err(ClientError::Unauthorized);
        };

        let mut pending =
            ChatMessage::new_pending(conversation_id, user.id, body.clone().unwrap_or_default());
        pending.body = body.clone();
        pending.attachment_url = Some(file_name.clone());
        let local_id = pending.local_id;
        apply_shared(&self.cache, CacheEvent::MessageQueued(pending));

        let result = self
            .api
            .send_attachment(conversation_id, body, file_name, bytes)
            .await;
        self.resolve(conversation_id, local_id, result)
    }

    /// Retry a failed entry: the old entry is dismissed and its body is
    /// re-sent as a fresh optimistic append.
    pub async fn retry(&self, conversation_id: u64, local_id: Uuid) -> Result<(), ClientError> {
        let body = {
            let state = self.cache.lock().expect("cache lock poisoned");
            state
                .conversation_messages(conversation_id)
                .iter()
                .find(|m| m.local_id == local_id)
                .and_then(|m| m.body.clone())
        };
        let Some(body) = body else {
            tracing::warn!("[sync] retry for unknown local message {}", local_id);
            return Ok(());
        };
        apply_shared(
            &self.cache,
            CacheEvent::MessageDismissed {
                conversation_id,
                local_id,
            },
        );
        self.send_text(conversation_id, body).await
    }

    /// Drop a failed entry without resending
    pub fn dismiss(&self, conversation_id: u64, local_id: Uuid) {
        apply_shared(
            &self.cache,
            CacheEvent::MessageDismissed {
                conversation_id,
                local_id,
            },
        );
    }

    /// Resolve a queued entry from the backend call's outcome
    fn resolve(
        &self,
        conversation_id: u64,
        local_id: Uuid,
        result: Result<ChatMessage, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(message) => {
                apply_shared(
                    &self.cache,
                    CacheEvent::MessageAcked {
                        conversation_id,
                        local_id,
                        message,
                    },
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[sync] send to conversation {} failed: {}", conversation_id, e);
                apply_shared(
                    &self.cache,
                    CacheEvent::MessageFailed {
                        conversation_id,
                        local_id,
                    },
                );
                Err(e)
            }
        }
    }
}
