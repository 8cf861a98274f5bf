//! Broadcaster Connection Manager
//!
//! Maintains zero-or-one live websocket connection to the broadcaster, tied
//! to the current session credential. The connection is never created
//! without a valid credential, and it is always torn down before a new one
//! is opened for a different credential.
//!
//! Failure semantics: connection problems are surfaced only through logging.
//! Realtime delivery is strictly an enhancement over the polling backstop,
//! so the UI is never blocked or shown a fatal error from this module.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::protocol::{self, ClientFrame, ConnectionEstablished, ServerFrame};
use super::registry::SubscriptionRegistry;
use crate::egui_app::api::ApiClient;

/// How long to wait for the broadcaster handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// A live transport connection
struct Connection {
    /// Credential the connection was authenticated with
    credential: String,
    /// Socket id assigned by the broadcaster, needed for channel auth
    socket_id: String,
    /// Outbound frame queue, drained by the writer task
    outbound: mpsc::UnboundedSender<Message>,
    /// Channels currently subscribed on the transport
    channels: HashSet<String>,
    reader: tokio::task::JoinHandle<()>,
    #[allow(dead_code)]
    writer: tokio::task::JoinHandle<()>,
}

/// Owns the zero-or-one live broadcaster connection
pub struct ConnectionManager {
    api: ApiClient,
    registry: Arc<SubscriptionRegistry>,
    /// Endpoint override for self-hosted broadcasters and tests; defaults to
    /// the hosted endpoint derived from key + cluster
    endpoint: Option<String>,
    active: Mutex<Option<Connection>>,
}

impl ConnectionManager {
    pub fn new(api: ApiClient, registry: Arc<SubscriptionRegistry>) -> Self {
        Self {
            api,
            registry,
            endpoint: None,
            active: Mutex::new(None),
        }
    }

    /// Override the broadcaster endpoint (self-hosted broadcaster or tests)
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Open a connection if none exists. No-op when a connection is already
    /// live for the current credential. Returns whether a connection is live
    /// afterwards; missing broadcaster configuration or credential yields a
    /// null connection (false) without raising an error.
    pub async fn initialize(&self) -> bool {
        let mut active = self.active.lock().await;
        let current = self.api.session().token();
        if let Some(conn) = active.as_ref() {
            if Some(conn.credential.as_str()) == current.as_deref() {
                return true;
            }
        }
        self.open_locked(&mut active, current).await
    }

    /// Compare the live connection's credential against the current session
    /// credential on every access; reconnect when they differ (e.g. token
    /// refresh) and connect when nothing is live yet.
    pub async fn get_or_reinitialize(&self) -> bool {
        let mut active = self.active.lock().await;
        let current = self.api.session().token();
        if let Some(conn) = active.as_ref() {
            match current.as_deref() {
                Some(token) if conn.credential == token => return true,
                _ => {
                    tracing::info!("[realtime] session credential changed, reconnecting");
                }
            }
        }
        self.open_locked(&mut active, current).await
    }

    /// Tear down the live connection: unsubscribe every active channel
    /// (best-effort, continue on error), disconnect the transport and clear
    /// the slot. Safe to call when nothing is live.
    pub async fn cleanup(&self) {
        let mut active = self.active.lock().await;
        self.teardown_locked(&mut active);
    }

    /// Whether a connection is currently live
    pub async fn is_connected(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Credential embedded in the live connection, if any
    pub async fn credential(&self) -> Option<String> {
        self.active.lock().await.as_ref().map(|c| c.credential.clone())
    }

    /// Channels subscribed on the transport
    pub async fn subscribed_channels(&self) -> Vec<String> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|c| c.channels.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Make sure the transport is subscribed to a channel, authenticating
    /// private channels through the backend. Returns false when no
    /// connection is live or the subscription could not be established.
    pub async fn ensure_channel(&self, channel: &str) -> bool {
        let mut active = self.active.lock().await;
        let Some(conn) = active.as_mut() else {
            return false;
        };
        if conn.channels.contains(channel) {
            return true;
        }

        let auth = if protocol::is_private_channel(channel) {
            match self.api.broadcast_auth(&conn.socket_id, channel).await {
                Ok(auth) => Some(auth),
                Err(e) => {
                    tracing::error!("[realtime] channel auth failed for {}: {}", channel, e);
                    return false;
                }
            }
        } else {
            None
        };

        let frame = ClientFrame::Subscribe {
            channel: channel.to_string(),
            auth,
        };
        if conn.outbound.send(Message::text(frame.to_json())).is_err() {
            tracing::warn!("[realtime] connection gone while subscribing {}", channel);
            return false;
        }
        conn.channels.insert(channel.to_string());
        tracing::info!("[realtime] subscribed channel {}", channel);
        true
    }

    /// Unsubscribe a channel from the transport (when its last event
    /// listener is removed)
    pub async fn unsubscribe_channel(&self, channel: &str) {
        let mut active = self.active.lock().await;
        let Some(conn) = active.as_mut() else {
            return;
        };
        if !conn.channels.remove(channel) {
            return;
        }
        let frame = ClientFrame::Unsubscribe {
            channel: channel.to_string(),
        };
        if conn.outbound.send(Message::text(frame.to_json())).is_err() {
            tracing::warn!("[realtime] connection gone while unsubscribing {}", channel);
        }
        tracing::info!("[realtime] unsubscribed channel {}", channel);
    }

    /// Tear down whatever is in the slot, exactly once per connection.
    fn teardown_locked(&self, active: &mut Option<Connection>) {
        let Some(mut conn) = active.take() else {
            // idempotent no-op
            return;
        };
        for channel in conn.channels.drain() {
            // best-effort: one failed unsubscribe must not abort the rest
            let frame = ClientFrame::Unsubscribe {
                channel: channel.clone(),
            };
            if conn.outbound.send(Message::text(frame.to_json())).is_err() {
                tracing::warn!("[realtime] failed to unsubscribe {} during teardown", channel);
            }
        }
        self.registry.clear();
        let _ = conn.outbound.send(Message::Close(None));
        conn.reader.abort();
        tracing::info!("[realtime] connection disconnected");
    }

    /// Tear down any existing connection and open a fresh one for the given
    /// credential. Holds the slot lock for the duration so the zero-or-one
    /// invariant cannot be violated by concurrent callers.
    async fn open_locked(
        &self,
        active: &mut Option<Connection>,
        credential: Option<String>,
    ) -> bool {
        self.teardown_locked(active);

        let config = self.api.config();
        let (Some(key), Some(cluster)) = (config.broadcaster_key(), config.broadcaster_cluster())
        else {
            tracing::error!(
                "[realtime] broadcaster key/cluster not configured; realtime disabled"
            );
            return false;
        };
        let Some(credential) = credential else {
            tracing::warn!("[realtime] no session credential; realtime disabled");
            return false;
        };

        let url = self
            .endpoint
            .clone()
            .unwrap_or_else(|| protocol::endpoint_url(key, cluster));
        tracing::info!("[realtime] connecting to {}", url);

        let mut ws = match connect_async(url.as_str()).await {
            Ok((ws, _)) => ws,
            Err(e) => {
                tracing::error!("[realtime] connection failed: {}", e);
                return false;
            }
        };

        // Handshake: wait for the connection_established frame carrying the
        // socket id we need for private-channel auth.
        let established = tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
            while let Some(item) = ws.next().await {
                let Ok(Message::Text(text)) = item else {
                    continue;
                };
                let Ok(frame) = protocol::parse_frame(text.as_str()) else {
                    continue;
                };
                match frame.event.as_str() {
                    protocol::EVENT_CONNECTION_ESTABLISHED => {
                        return serde_json::from_value::<ConnectionEstablished>(frame.data).ok();
                    }
                    protocol::EVENT_ERROR => {
                        tracing::error!("[realtime] broadcaster rejected connection: {}", frame.data);
                        return None;
                    }
                    _ => {}
                }
            }
            None
        })
        .await;

        let Ok(Some(established)) = established else {
            tracing::error!("[realtime] handshake failed or timed out");
            return false;
        };
        tracing::info!("[realtime] connected, socket_id={}", established.socket_id);

        let (mut sink, mut stream) = ws.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        let writer = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if let Err(e) = sink.send(msg).await {
                    tracing::warn!("[realtime] send failed: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let registry = Arc::clone(&self.registry);
        let pong_tx = outbound_tx.clone();
        let reader = tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    Ok(Message::Text(text)) => match protocol::parse_frame(text.as_str()) {
                        Ok(frame) => handle_frame(frame, &pong_tx, &registry),
                        Err(e) => tracing::warn!("[realtime] unparseable frame: {}", e),
                    },
                    Ok(Message::Ping(payload)) => {
                        let _ = pong_tx.send(Message::Pong(payload));
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("[realtime] broadcaster closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("[realtime] transport error: {}", e);
                        break;
                    }
                }
            }
            // No auto-reconnect: the polling backstop covers missed events
            // and the next get_or_reinitialize() re-establishes push.
            tracing::info!("[realtime] reader finished; degrading to poll-only");
        });

        *active = Some(Connection {
            credential,
            socket_id: established.socket_id,
            outbound: outbound_tx,
            channels: HashSet::new(),
            reader,
            writer,
        });
        true
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Route one parsed frame: protocol events are handled here, application
/// events go through the subscription registry.
fn handle_frame(
    frame: ServerFrame,
    outbound: &mpsc::UnboundedSender<Message>,
    registry: &SubscriptionRegistry,
) {
    match frame.event.as_str() {
        protocol::EVENT_PING => {
            let _ = outbound.send(Message::text(ClientFrame::Pong.to_json()));
        }
        protocol::EVENT_ERROR => {
            tracing::warn!("[realtime] broadcaster error: {}", frame.data);
        }
        protocol::EVENT_SUBSCRIPTION_SUCCEEDED => {
            tracing::debug!(
                "[realtime] subscription confirmed on {}",
                frame.channel.as_deref().unwrap_or("?")
            );
        }
        _ => match frame.channel {
            Some(channel) => {
                registry.dispatch(&channel, &frame.event, &frame.data);
            }
            None => {
                tracing::debug!("[realtime] connection-level event {}", frame.event);
            }
        },
    }
}
