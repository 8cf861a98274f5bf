//! Open-Conversation Poller
//!
//! The open conversation view polls its own message list every 10 s,
//! independently of the unread-count poll. Opening a different conversation
//! replaces the poller; closing the view stops it. In-flight requests are
//! not aborted - a returning stale response only updates state until the
//! next poll corrects it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::cache::CacheEvent;
use super::{apply_shared, SharedCache};
use crate::egui_app::api::ApiClient;

/// Poll interval for the open conversation's message list
pub const MESSAGE_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polls the message list of whichever conversation is open
pub struct ConversationPoller {
    cache: SharedCache,
    api: ApiClient,
    runtime: Handle,
    active: Mutex<Option<(u64, JoinHandle<()>)>>,
}

impl ConversationPoller {
    pub fn new(cache: SharedCache, api: ApiClient, runtime: Handle) -> Self {
        Self {
            cache,
            api,
            runtime,
            active: Mutex::new(None),
        }
    }

    /// Start polling a conversation. No-op when it is already the open one;
    /// otherwise the previous poller is stopped first. The first fetch fires
    /// immediately.
    pub fn open(&self, conversation_id: u64) {
        let mut active = self.active.lock().expect("poller lock poisoned");
        if let Some((open_id, _)) = active.as_ref() {
            if *open_id == conversation_id {
                return;
            }
        }
        if let Some((_, handle)) = active.take() {
            handle.abort();
        }

        tracing::info!("[sync] polling conversation {}", conversation_id);
        let cache = Arc::clone(&self.cache);
        let api = self.api.clone();
        let handle = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(MESSAGE_POLL_INTERVAL);
            loop {
                interval.tick().await;
                match api.list_messages(conversation_id).await {
                    Ok(messages) => {
                        apply_shared(
                            &cache,
                            CacheEvent::MessagesFetched {
                                conversation_id,
                                messages,
                            },
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            "[sync] message poll for conversation {} failed: {}",
                            conversation_id,
                            e
                        );
                    }
                }
            }
        });
        *active = Some((conversation_id, handle));
    }

    /// Stop polling (view closed or unmounted). Idempotent.
    pub fn close(&self) {
        let mut active = self.active.lock().expect("poller lock poisoned");
        if let Some((conversation_id, handle)) = active.take() {
            handle.abort();
            tracing::info!("[sync] stopped polling conversation {}", conversation_id);
        }
    }

    /// The conversation currently being polled, if any
    pub fn open_conversation(&self) -> Option<u64> {
        self.active
            .lock()
            .expect("poller lock poisoned")
            .as_ref()
            .map(|(id, _)| *id)
    }
}

impl std::fmt::Debug for ConversationPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationPoller")
            .field("open", &self.open_conversation())
            .finish()
    }
}
