//! Cache Synchronizer
//!
//! Keeps the shared conversation/message cache and the aggregate unread
//! count current. Push events from the realtime layer are the primary
//! update path; timed polling is the deliberate consistency backstop
//! against missed push events:
//!
//! - `notifications` - per-user channel listeners + 30 s unread-count poll
//! - `conversation` - 10 s message poll for the open conversation view
//! - `outbox` - optimistic sends with explicit pending/failed tagging
//! - `cache` - the reducer every update funnels through

pub mod cache;
pub mod conversation;
pub mod notifications;
pub mod outbox;

use std::sync::{Arc, Mutex};

use cache::{CacheEvent, CacheState};

use crate::egui_app::api::ApiClient;
use crate::shared::error::ClientError;

/// Handle to the cache shared between the sync tasks and the UI
pub type SharedCache = Arc<Mutex<CacheState>>;

/// Create an empty shared cache
pub fn new_shared_cache() -> SharedCache {
    Arc::new(Mutex::new(CacheState::default()))
}

/// Run one event through the reducer under the cache lock
pub fn apply_shared(cache: &SharedCache, event: CacheEvent) {
    let mut state = cache.lock().expect("cache lock poisoned");
    cache::apply(&mut state, event);
}

/// Fetch the conversation list and reconcile it into the cache
pub async fn refresh_conversations(cache: &SharedCache, api: &ApiClient) -> Result<(), ClientError> {
    let conversations = api.list_conversations().await?;
    apply_shared(cache, CacheEvent::ConversationsFetched(conversations));
    Ok(())
}

/// Set a message's read timestamp on the backend, then in the cache. The
/// cache is only touched after the backend confirms, so a failure leaves
/// local state unchanged.
pub async fn mark_message_read(
    cache: &SharedCache,
    api: &ApiClient,
    message_id: u64,
) -> Result<(), ClientError> {
    let updated = api.mark_read(message_id).await?;
    if let (Some(id), Some(read_at)) = (updated.id, updated.read_at.clone()) {
        apply_shared(
            cache,
            CacheEvent::MessageRead {
                conversation_id: updated.conversation_id,
                message_id: id,
                read_at,
            },
        );
    }
    Ok(())
}

/// Delete a message on the backend, then drop it from the cache
pub async fn delete_message(
    cache: &SharedCache,
    api: &ApiClient,
    conversation_id: u64,
    message_id: u64,
) -> Result<(), ClientError> {
    api.delete_message(message_id).await?;
    apply_shared(
        cache,
        CacheEvent::MessageDeleted {
            conversation_id,
            message_id,
        },
    );
    Ok(())
}
