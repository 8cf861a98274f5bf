//! Unread-Count Synchronizer
//!
//! On session start this subscribes to the user's private notification
//! channel and starts the unread-count poll. Push events bump the count
//! optimistically; the 30 s poll re-fetches from the backend and overwrites,
//! so a missed push event is corrected within one interval.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::cache::CacheEvent;
use super::{apply_shared, SharedCache};
use crate::egui_app::api::ApiClient;
use crate::egui_app::realtime::RealtimeClient;
use crate::shared::event::{user_channel, EVENT_MESSAGE_CREATED, EVENT_MESSAGE_READ};
use crate::shared::messaging::ChatMessage;

/// Backstop poll interval for the aggregate unread count
pub const UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Keeps the unread count and pushed messages flowing into the cache
pub struct NotificationSync {
    cache: SharedCache,
    api: ApiClient,
    realtime: Arc<RealtimeClient>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationSync {
    pub fn new(cache: SharedCache, api: ApiClient, realtime: Arc<RealtimeClient>) -> Self {
        Self {
            cache,
            api,
            realtime,
            poll_task: Mutex::new(None),
        }
    }

    /// Start synchronizing for a user: reset the cache, attach the push
    /// listeners (silent no-ops when the broadcaster is not configured) and
    /// spawn the poll loop. The poll's first tick fires immediately, which
    /// is the session-start unread fetch.
    pub async fn start(&self, user_id: u64) {
        apply_shared(&self.cache, CacheEvent::SessionStarted { user_id });
        tracing::info!("[sync] notification sync starting for user {}", user_id);

        let channel = user_channel(user_id);
        {
            let cache = Arc::clone(&self.cache);
            self.realtime
                .listen(&channel, EVENT_MESSAGE_CREATED, move |payload| {
                    match serde_json::from_value::<ChatMessage>(payload.clone()) {
                        Ok(message) => {
                            apply_shared(&cache, CacheEvent::MessagePushed(message));
                        }
                        Err(e) => {
                            tracing::warn!("[sync] malformed {} payload: {}", EVENT_MESSAGE_CREATED, e);
                        }
                    }
                })
                .await;
        }
        {
            let cache = Arc::clone(&self.cache);
            self.realtime
                .listen(&channel, EVENT_MESSAGE_READ, move |payload| {
                    match serde_json::from_value::<ChatMessage>(payload.clone()) {
                        Ok(message) => {
                            if let (Some(id), Some(read_at)) = (message.id, message.read_at) {
                                apply_shared(
                                    &cache,
                                    CacheEvent::MessageRead {
                                        conversation_id: message.conversation_id,
                                        message_id: id,
                                        read_at,
                                    },
                                );
                            }
                        }
                        Err(e) => {
                            tracing::warn!("[sync] malformed {} payload: {}", EVENT_MESSAGE_READ, e);
                        }
                    }
                })
                .await;
        }

        let cache = Arc::clone(&self.cache);
        let api = self.api.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(UNREAD_POLL_INTERVAL);
            loop {
                interval.tick().await;
                match api.unread_count().await {
                    Ok(count) => {
                        apply_shared(&cache, CacheEvent::UnreadCountFetched { count });
                    }
                    Err(e) => {
                        // backstop only; push keeps working and the next
                        // tick retries
                        tracing::warn!("[sync] unread poll failed: {}", e);
                    }
                }
            }
        });

        let previous = self
            .poll_task
            .lock()
            .expect("poll task lock poisoned")
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Stop polling and tear down the realtime connection (logout or app
    /// shutdown). Safe to call when not started.
    pub async fn stop(&self) {
        if let Some(handle) = self
            .poll_task
            .lock()
            .expect("poll task lock poisoned")
            .take()
        {
            handle.abort();
        }
        self.realtime.cleanup().await;
        tracing::info!("[sync] notification sync stopped");
    }

    /// Whether the poll loop is running
    pub fn is_running(&self) -> bool {
        self.poll_task
            .lock()
            .expect("poll task lock poisoned")
            .is_some()
    }
}

impl std::fmt::Debug for NotificationSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSync")
            .field("running", &self.is_running())
            .finish()
    }
}
