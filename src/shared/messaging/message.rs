//! Chat Message Data Structure
//!
//! Represents a message in a conversation. Messages are append-only from the
//! client's perspective: once created they are never mutated except to set
//! the read timestamp.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-side delivery state of a message.
///
/// Messages deserialized from the backend are always `Sent`. `Pending` and
/// `Failed` only exist for optimistic local appends that have not been (or
/// could not be) confirmed by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Optimistically appended, backend call in flight
    Pending,
    /// Confirmed by the backend
    Sent,
    /// Backend call failed; retained for retry or dismissal
    Failed,
}

impl Default for DeliveryState {
    fn default() -> Self {
        DeliveryState::Sent
    }
}

/// Represents a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Backend-assigned ID; `None` while the message is only local
    pub id: Option<u64>,
    /// Client-side identity, generated at append time. Used to match an
    /// optimistic entry with its backend acknowledgement.
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    /// Conversation this message belongs to
    pub conversation_id: u64,
    /// User who sent the message
    pub sender_id: u64,
    /// Text body; may be absent for attachment-only messages
    pub body: Option<String>,
    /// Attachment path, resolved against the public API URL
    pub attachment_url: Option<String>,
    /// When the recipient read the message (RFC3339), if ever
    pub read_at: Option<String>,
    /// When the message was created (RFC3339)
    pub created_at: String,
    /// Client-side delivery state
    #[serde(default)]
    pub delivery: DeliveryState,
}

impl ChatMessage {
    /// Create an optimistic local text message, pending backend confirmation
    pub fn new_pending(conversation_id: u64, sender_id: u64, body: String) -> Self {
        Self {
            id: None,
            local_id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            body: Some(body),
            attachment_url: None,
            read_at: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            delivery: DeliveryState::Pending,
        }
    }

    /// Whether this message counts as unread for `user_id`
    pub fn is_unread_for(&self, user_id: u64) -> bool {
        self.read_at.is_none() && self.sender_id != user_id
    }

    /// Ordering key: backend ordering is chronological by timestamp, with
    /// the id as tie-breaker.
    pub fn sort_key(&self) -> (String, u64) {
        (self.created_at.clone(), self.id.unwrap_or(u64::MAX))
    }

    /// Get a preview of the message (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        let body = match &self.body {
            Some(body) => body.as_str(),
            None if self.attachment_url.is_some() => return "[attachment]".to_string(),
            None => "",
        };
        if body.chars().count() <= max_len {
            body.to_string()
        } else {
            let mut preview: String = body.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// Request to send a message (JSON variant; attachments go via multipart)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

/// Request body for `PUT /messages/{id}` - sets the read timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    pub read: bool,
}

/// Response for listing a conversation's messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<ChatMessage>,
}

/// Response for `GET /messages/unread/count`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCountResponse {
    pub count: u64,
}
