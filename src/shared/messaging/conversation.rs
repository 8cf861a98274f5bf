//! Conversation Data Structure
//!
//! Represents a conversation between two or more users.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// A user participating in a conversation, with their unread marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub user_id: u64,
    pub name: String,
    /// Avatar image path, resolved against the public API URL
    pub avatar: Option<String>,
    /// Whether this participant has unread messages in the conversation
    #[serde(default)]
    pub unread: bool,
}

/// Represents a conversation between users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: u64,
    /// Display name; null for 1:1 chats (the other participant's name is
    /// shown instead)
    pub name: Option<String>,
    /// Whether this is a group conversation
    #[serde(default)]
    pub is_group: bool,
    /// Group image path, if any
    pub image: Option<String>,
    /// Ordered list of participants
    pub participants: Vec<Participant>,
    /// Latest message, for list previews
    pub latest_message: Option<ChatMessage>,
    /// When the conversation was created (RFC3339)
    pub created_at: String,
}

impl Conversation {
    /// Display name as shown in the conversation list: the explicit name for
    /// groups, otherwise the other participant's name.
    pub fn display_name(&self, current_user_id: u64) -> String {
        if let Some(ref name) = self.name {
            return name.clone();
        }
        self.participants
            .iter()
            .find(|p| p.user_id != current_user_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Conversation {}", self.id))
    }

    /// Check if a user is a participant
    pub fn has_participant(&self, user_id: u64) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Update the latest-message pointer
    pub fn update_latest_message(&mut self, message: &ChatMessage) {
        self.latest_message = Some(message.clone());
    }
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<Conversation>,
}

/// Request to create a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    pub participant_ids: Vec<u64>,
    pub name: Option<String>,
    #[serde(default)]
    pub is_group: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(name: Option<&str>) -> Conversation {
        Conversation {
            id: 7,
            name: name.map(|n| n.to_string()),
            is_group: name.is_some(),
            image: None,
            participants: vec![
                Participant {
                    user_id: 1,
                    name: "Ada".to_string(),
                    avatar: None,
                    unread: false,
                },
                Participant {
                    user_id: 2,
                    name: "Bo".to_string(),
                    avatar: None,
                    unread: true,
                },
            ],
            latest_message: None,
            created_at: "2026-01-15T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_display_name_direct() {
        let conv = conversation(None);
        assert_eq!(conv.display_name(1), "Bo");
        assert_eq!(conv.display_name(2), "Ada");
    }

    #[test]
    fn test_display_name_group() {
        let conv = conversation(Some("Weekend trip"));
        assert_eq!(conv.display_name(1), "Weekend trip");
    }

    #[test]
    fn test_has_participant() {
        let conv = conversation(None);
        assert!(conv.has_participant(1));
        assert!(!conv.has_participant(9));
    }

    #[test]
    fn test_nullable_name_roundtrip() {
        let json = r#"{
            "id": 7,
            "name": null,
            "is_group": false,
            "image": null,
            "participants": [],
            "latest_message": null,
            "created_at": "2026-01-15T08:00:00Z"
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert!(conv.name.is_none());
        assert!(!conv.is_group);
    }
}
