//! Realtime Layer
//!
//! Push delivery from the marketplace's pub/sub broadcaster. Three pieces
//! cooperate here:
//!
//! - **`connection`** - zero-or-one live websocket connection keyed by the
//!   session credential
//! - **`registry`** - idempotent (channel, event) listener registry
//! - **`protocol`** - the broadcaster's wire format
//!
//! `RealtimeClient` is the facade over all three. It is an explicitly
//! constructed object owned by the application and injected into whatever
//! needs it; callers must route all transport access through it so the
//! zero-or-one connection invariant holds.

pub mod connection;
pub mod protocol;
pub mod registry;

use std::sync::Arc;

use serde_json::Value;

use connection::ConnectionManager;
use registry::SubscriptionRegistry;

use crate::egui_app::api::ApiClient;

/// Facade over the broadcaster connection and the subscription registry
#[derive(Debug)]
pub struct RealtimeClient {
    manager: ConnectionManager,
    registry: Arc<SubscriptionRegistry>,
}

impl RealtimeClient {
    pub fn new(api: ApiClient) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let manager = ConnectionManager::new(api, Arc::clone(&registry));
        Self { manager, registry }
    }

    /// Construct against an explicit broadcaster endpoint (self-hosted
    /// broadcaster or tests)
    pub fn with_endpoint(api: ApiClient, url: impl Into<String>) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let manager = ConnectionManager::new(api, Arc::clone(&registry)).with_endpoint(url);
        Self { manager, registry }
    }

    /// See [`ConnectionManager::initialize`]
    pub async fn initialize(&self) -> bool {
        self.manager.initialize().await
    }

    /// See [`ConnectionManager::get_or_reinitialize`]
    pub async fn get_or_reinitialize(&self) -> bool {
        self.manager.get_or_reinitialize().await
    }

    /// Tear everything down so a subsequent `initialize` starts fresh
    pub async fn cleanup(&self) {
        self.manager.cleanup().await;
    }

    /// Whether a transport connection is live
    pub async fn is_connected(&self) -> bool {
        self.manager.is_connected().await
    }

    /// Credential embedded in the live connection (empty when disconnected)
    pub async fn connection_credential(&self) -> Option<String> {
        self.manager.credential().await
    }

    /// Subscribe a callback to an event on a channel. Ensures the transport
    /// is connected and subscribed to the channel, then registers the
    /// listener; at most one listener per (channel, event) pair survives.
    ///
    /// A silent no-op when realtime is unavailable (no broadcaster
    /// configuration, no credential, or the connection cannot be opened) -
    /// the polling backstop covers those cases.
    pub async fn listen<F>(&self, channel: &str, event: &str, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if !self.manager.get_or_reinitialize().await {
            tracing::debug!(
                "[realtime] not connected; listen for {} on {} ignored",
                event,
                channel
            );
            return;
        }
        if !self.manager.ensure_channel(channel).await {
            tracing::warn!(
                "[realtime] could not subscribe {}; degrading to poll-only",
                channel
            );
            return;
        }
        self.registry.listen(channel, event, handler);
    }

    /// Remove a listener; unsubscribes the channel from the transport when
    /// its last event listener goes away. No-op when the pair is inactive.
    pub async fn stop_listening(&self, channel: &str, event: &str) {
        let removed = self.registry.stop_listening(channel, event);
        if removed && !self.registry.channel_has_listeners(channel) {
            self.manager.unsubscribe_channel(channel).await;
        }
    }

    /// The shared listener registry
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }
}
