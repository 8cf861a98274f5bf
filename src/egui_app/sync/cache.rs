//! Conversation / Message Cache
//!
//! The shared, UI-visible cache of conversations, messages and the aggregate
//! unread count, updated exclusively through a reducer: `apply` takes the
//! cached state and one `CacheEvent` and deterministically produces the next
//! state, so the interleaving of push events, poll results and sends cannot
//! corrupt it.
//!
//! Reconciliation policy: push events append optimistically; the periodic
//! poll is the source of truth and overwrites on conflict (last full fetch
//! wins). Message identity is the backend id, so duplicate delivery (push
//! then poll) dedupes naturally. Locally queued `Pending`/`Failed` entries
//! survive a poll overwrite until they are acked or dismissed.

use std::collections::HashMap;

use uuid::Uuid;

use crate::shared::messaging::{ChatMessage, Conversation, DeliveryState};

/// The cached client-side view of the messaging state
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    /// Authenticated user the unread predicate is evaluated against
    pub current_user_id: Option<u64>,
    /// Conversations by id
    pub conversations: HashMap<u64, Conversation>,
    /// Messages per conversation, in chronological order
    pub messages: HashMap<u64, Vec<ChatMessage>>,
    /// Aggregate unread count: bumped by push events, overwritten by polls
    pub unread_count: u64,
}

/// Events the reducer understands
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A session began for a user; resets the cache
    SessionStarted { user_id: u64 },
    /// Full conversation list fetched from the backend (poll wins)
    ConversationsFetched(Vec<Conversation>),
    /// Full message list of one conversation fetched (poll wins)
    MessagesFetched {
        conversation_id: u64,
        messages: Vec<ChatMessage>,
    },
    /// Aggregate unread count fetched (poll wins)
    UnreadCountFetched { count: u64 },
    /// A message arrived over the push channel
    MessagePushed(ChatMessage),
    /// An optimistic local append, pending backend confirmation
    MessageQueued(ChatMessage),
    /// The backend confirmed a queued message
    MessageAcked {
        conversation_id: u64,
        local_id: Uuid,
        message: ChatMessage,
    },
    /// The backend rejected a queued message; the entry is retained, tagged
    /// `Failed`, for retry or dismissal
    MessageFailed { conversation_id: u64, local_id: Uuid },
    /// The user dismissed a failed entry
    MessageDismissed { conversation_id: u64, local_id: Uuid },
    /// A message's read timestamp was set
    MessageRead {
        conversation_id: u64,
        message_id: u64,
        read_at: String,
    },
    /// A message was deleted
    MessageDeleted {
        conversation_id: u64,
        message_id: u64,
    },
    /// Logout; drops everything
    SessionCleared,
}

impl CacheState {
    /// Messages of a conversation, chronological
    pub fn conversation_messages(&self, conversation_id: u64) -> &[ChatMessage] {
        self.messages
            .get(&conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Conversations ordered by most recent activity
    pub fn conversations_by_recency(&self) -> Vec<&Conversation> {
        let mut conversations: Vec<&Conversation> = self.conversations.values().collect();
        conversations.sort_by(|a, b| {
            let a_key = a.latest_message.as_ref().map(|m| m.created_at.clone());
            let b_key = b.latest_message.as_ref().map(|m| m.created_at.clone());
            b_key.cmp(&a_key)
        });
        conversations
    }

    /// Recompute the unread count from the cached messages. The stored
    /// `unread_count` tracks this value for every state reachable via
    /// push-append or poll-overwrite; the stored value additionally lets a
    /// poll reflect unread messages in conversations that are not cached.
    pub fn derived_unread(&self) -> u64 {
        let Some(user_id) = self.current_user_id else {
            return 0;
        };
        self.messages
            .values()
            .flatten()
            .filter(|m| m.is_unread_for(user_id))
            .count() as u64
    }
}

/// Apply one event to the cache. Deterministic: the same state and event
/// always produce the same next state.
pub fn apply(state: &mut CacheState, event: CacheEvent) {
    match event {
        CacheEvent::SessionStarted { user_id } => {
            *state = CacheState {
                current_user_id: Some(user_id),
                ..CacheState::default()
            };
        }

        CacheEvent::ConversationsFetched(conversations) => {
            state.conversations = conversations.into_iter().map(|c| (c.id, c)).collect();
        }

        CacheEvent::MessagesFetched {
            conversation_id,
            messages,
        } => {
            let locals: Vec<ChatMessage> = state
                .conversation_messages(conversation_id)
                .iter()
                .filter(|m| m.delivery != DeliveryState::Sent)
                .cloned()
                .collect();

            let mut fetched = messages;
            fetched.sort_by_key(|m| m.sort_key());
            fetched.extend(locals);
            state.messages.insert(conversation_id, fetched);
        }

        CacheEvent::UnreadCountFetched { count } => {
            if state.unread_count != count {
                tracing::debug!(
                    "[sync] unread count reconciled {} -> {}",
                    state.unread_count,
                    count
                );
            }
            state.unread_count = count;
        }

        CacheEvent::MessagePushed(message) => {
            let conversation_id = message.conversation_id;
            let list = state.messages.entry(conversation_id).or_default();
            if message.id.is_some() && list.iter().any(|m| m.id == message.id) {
                // duplicate delivery (poll already had it); ignore
                return;
            }
            if let Some(user_id) = state.current_user_id {
                if message.is_unread_for(user_id) {
                    state.unread_count += 1;
                }
            }
            if let Some(conversation) = state.conversations.get_mut(&conversation_id) {
                conversation.update_latest_message(&message);
            }
            insert_sorted(list, message);
        }

        CacheEvent::MessageQueued(message) => {
            state
                .messages
                .entry(message.conversation_id)
                .or_default()
                .push(message);
        }

        CacheEvent::MessageAcked {
            conversation_id,
            local_id,
            message,
        } => {
            let list = state.messages.entry(conversation_id).or_default();
            list.retain(|m| m.local_id != local_id);
            if let Some(conversation) = state.conversations.get_mut(&conversation_id) {
                conversation.update_latest_message(&message);
            }
            if message.id.is_none() || !list.iter().any(|m| m.id == message.id) {
                insert_sorted(list, message);
            }
        }

        CacheEvent::MessageFailed {
            conversation_id,
            local_id,
        } => {
            if let Some(list) = state.messages.get_mut(&conversation_id) {
                if let Some(message) = list.iter_mut().find(|m| m.local_id == local_id) {
                    message.delivery = DeliveryState::Failed;
                }
            }
        }

        CacheEvent::MessageDismissed {
            conversation_id,
            local_id,
        } => {
            if let Some(list) = state.messages.get_mut(&conversation_id) {
                list.retain(|m| m.local_id != local_id);
            }
        }

        CacheEvent::MessageRead {
            conversation_id,
            message_id,
            read_at,
        } => {
            let Some(list) = state.messages.get_mut(&conversation_id) else {
                return;
            };
            let Some(message) = list.iter_mut().find(|m| m.id == Some(message_id)) else {
                return;
            };
            let was_unread = state
                .current_user_id
                .map(|user_id| message.is_unread_for(user_id))
                .unwrap_or(false);
            message.read_at = Some(read_at);
            if was_unread {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
        }

        CacheEvent::MessageDeleted {
            conversation_id,
            message_id,
        } => {
            let Some(list) = state.messages.get_mut(&conversation_id) else {
                return;
            };
            let Some(pos) = list.iter().position(|m| m.id == Some(message_id)) else {
                return;
            };
            let removed = list.remove(pos);
            let was_unread = state
                .current_user_id
                .map(|user_id| removed.is_unread_for(user_id))
                .unwrap_or(false);
            if was_unread {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
            if let Some(conversation) = state.conversations.get_mut(&conversation_id) {
                if conversation
                    .latest_message
                    .as_ref()
                    .is_some_and(|m| m.id == Some(message_id))
                {
                    conversation.latest_message = list.last().cloned();
                }
            }
        }

        CacheEvent::SessionCleared => {
            *state = CacheState::default();
        }
    }
}

/// Insert keeping the chronological (created_at, id) order
fn insert_sorted(list: &mut Vec<ChatMessage>, message: ChatMessage) {
    let key = message.sort_key();
    let pos = list
        .iter()
        .position(|m| m.sort_key() > key)
        .unwrap_or(list.len());
    list.insert(pos, message);
}
