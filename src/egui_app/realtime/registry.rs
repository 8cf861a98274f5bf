//! Channel Subscription Registry
//!
//! Tracks which (channel, event) pairs currently have a live listener, so
//! subscribe/unsubscribe stay idempotent and no pair ever ends up with
//! duplicate handlers. Invariant: after any sequence of `listen` calls for
//! the same pair, exactly one handler is registered for it.
//!
//! Dispatch logs receipt and isolates handler panics - one bad callback
//! cannot break the channel or take down the connection.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use serde_json::Value;

/// Callback invoked with the decoded event payload
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

type SubscriptionKey = (String, String);

/// Registry of active (channel, event) listeners
#[derive(Default)]
pub struct SubscriptionRegistry {
    handlers: Mutex<HashMap<SubscriptionKey, Handler>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for a (channel, event) pair. If the pair is
    /// already active the existing listener is dropped first (defensive
    /// re-subscription). Returns `true` when a previous listener was
    /// replaced.
    pub fn listen<F>(&self, channel: &str, event: &str, handler: F) -> bool
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let key = (channel.to_string(), event.to_string());
        let mut handlers = self.handlers.lock().expect("registry lock poisoned");
        let replaced = handlers.remove(&key).is_some();
        if replaced {
            tracing::debug!("[realtime] re-subscribing {} on {}", event, channel);
        }
        handlers.insert(key, Arc::new(handler));
        tracing::info!("[realtime] listening for {} on {}", event, channel);
        replaced
    }

    /// Remove a listener. No-op when the pair is not active; returns whether
    /// a listener was removed.
    pub fn stop_listening(&self, channel: &str, event: &str) -> bool {
        let key = (channel.to_string(), event.to_string());
        let removed = self
            .handlers
            .lock()
            .expect("registry lock poisoned")
            .remove(&key)
            .is_some();
        if removed {
            tracing::info!("[realtime] stopped listening for {} on {}", event, channel);
        }
        removed
    }

    /// Whether a (channel, event) pair has an active listener
    pub fn is_active(&self, channel: &str, event: &str) -> bool {
        self.handlers
            .lock()
            .expect("registry lock poisoned")
            .contains_key(&(channel.to_string(), event.to_string()))
    }

    /// Whether any event on the channel still has a listener
    pub fn channel_has_listeners(&self, channel: &str) -> bool {
        self.handlers
            .lock()
            .expect("registry lock poisoned")
            .keys()
            .any(|(c, _)| c == channel)
    }

    /// All currently active pairs
    pub fn active_pairs(&self) -> Vec<(String, String)> {
        self.handlers
            .lock()
            .expect("registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Number of active listeners
    pub fn len(&self) -> usize {
        self.handlers.lock().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener (connection teardown)
    pub fn clear(&self) {
        let mut handlers = self.handlers.lock().expect("registry lock poisoned");
        if !handlers.is_empty() {
            tracing::info!("[realtime] clearing {} active listeners", handlers.len());
        }
        handlers.clear();
    }

    /// Deliver an event to the matching listener, if any. Returns whether a
    /// listener handled it.
    pub fn dispatch(&self, channel: &str, event: &str, payload: &Value) -> bool {
        let handler = {
            let handlers = self.handlers.lock().expect("registry lock poisoned");
            handlers
                .get(&(channel.to_string(), event.to_string()))
                .cloned()
        };
        let Some(handler) = handler else {
            tracing::debug!("[realtime] no listener for {} on {}", event, channel);
            return false;
        };

        tracing::debug!("[realtime] received {} on {}", event, channel);
        if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
            tracing::error!(
                "[realtime] listener for {} on {} panicked; other listeners unaffected",
                event,
                channel
            );
        }
        true
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("active", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_listen_registers_one_handler() {
        let registry = SubscriptionRegistry::new();
        registry.listen("private-App.Models.User.1", "message.new", |_| {});
        assert!(registry.is_active("private-App.Models.User.1", "message.new"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_double_listen_keeps_single_listener() {
        let registry = SubscriptionRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let replaced = registry.listen("private-App.Models.User.1", "message.new", move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
            let _ = replaced;
        }
        assert_eq!(registry.len(), 1);

        registry.dispatch(
            "private-App.Models.User.1",
            "message.new",
            &serde_json::json!({"id": 1}),
        );
        // exactly one invocation per incoming event, not two
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_listening_noop_when_inactive() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.stop_listening("ch", "ev"));

        registry.listen("ch", "ev", |_| {});
        assert!(registry.stop_listening("ch", "ev"));
        assert!(!registry.is_active("ch", "ev"));
    }

    #[test]
    fn test_dispatch_unmatched_returns_false() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.dispatch("ch", "ev", &Value::Null));
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let registry = SubscriptionRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        registry.listen("ch", "bad", |_| panic!("listener bug"));
        {
            let calls = Arc::clone(&calls);
            registry.listen("ch", "good", move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        // the panic is swallowed...
        assert!(registry.dispatch("ch", "bad", &Value::Null));
        // ...and other listeners keep working
        assert!(registry.dispatch("ch", "good", &Value::Null));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_channel_has_listeners() {
        let registry = SubscriptionRegistry::new();
        registry.listen("ch", "a", |_| {});
        registry.listen("ch", "b", |_| {});
        registry.stop_listening("ch", "a");
        assert!(registry.channel_has_listeners("ch"));
        registry.stop_listening("ch", "b");
        assert!(!registry.channel_has_listeners("ch"));
    }

    #[test]
    fn test_clear() {
        let registry = SubscriptionRegistry::new();
        registry.listen("a", "x", |_| {});
        registry.listen("b", "y", |_| {});
        registry.clear();
        assert!(registry.is_empty());
    }
}
