//! Broadcaster Wire Protocol
//!
//! Frame building and parsing for the pub/sub broadcaster's websocket
//! protocol. The broadcaster is an external service consumed only through
//! this interface: a handshake frame carrying the socket id, subscribe /
//! unsubscribe control frames (private channels carry an auth signature
//! obtained from the backend), ping/pong keepalives, and event frames whose
//! `data` field is a JSON-encoded string.

use serde::Deserialize;
use serde_json::Value;

use crate::shared::error::ClientError;

/// Handshake event sent by the broadcaster after connecting
pub const EVENT_CONNECTION_ESTABLISHED: &str = "pusher:connection_established";
/// Keepalive probe from the broadcaster; answered with a pong
pub const EVENT_PING: &str = "pusher:ping";
/// Protocol-level error event
pub const EVENT_ERROR: &str = "pusher:error";
/// Per-channel acknowledgement of a successful subscription
pub const EVENT_SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";

/// Protocol version sent in the connection URL
const PROTOCOL_VERSION: u8 = 7;

/// Websocket endpoint for an application key in a cluster
pub fn endpoint_url(key: &str, cluster: &str) -> String {
    format!(
        "wss://ws-{}.pusher.com/app/{}?protocol={}&client=ridelink&version={}",
        cluster,
        key,
        PROTOCOL_VERSION,
        env!("CARGO_PKG_VERSION")
    )
}

/// Whether a channel requires backend authentication to subscribe
pub fn is_private_channel(channel: &str) -> bool {
    channel.starts_with("private-") || channel.starts_with("presence-")
}

/// Frames the client sends to the broadcaster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Subscribe to a channel; private channels carry the auth signature
    Subscribe {
        channel: String,
        auth: Option<String>,
    },
    /// Unsubscribe from a channel
    Unsubscribe { channel: String },
    /// Keepalive answer
    Pong,
}

impl ClientFrame {
    /// Serialize to the broadcaster's wire format
    pub fn to_json(&self) -> String {
        let value = match self {
            ClientFrame::Subscribe { channel, auth } => {
                let mut data = serde_json::json!({ "channel": channel });
                if let Some(auth) = auth {
                    data["auth"] = Value::String(auth.clone());
                }
                serde_json::json!({ "event": "pusher:subscribe", "data": data })
            }
            ClientFrame::Unsubscribe { channel } => serde_json::json!({
                "event": "pusher:unsubscribe",
                "data": { "channel": channel }
            }),
            ClientFrame::Pong => serde_json::json!({ "event": "pusher:pong", "data": {} }),
        };
        value.to_string()
    }
}

/// A frame received from the broadcaster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFrame {
    /// Event name (protocol event or application event)
    pub event: String,
    /// Channel the event arrived on; absent for connection-level events
    pub channel: Option<String>,
    /// Decoded payload
    pub data: Value,
}

/// Raw wire shape before the `data` field is decoded
#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    channel: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Parse a text frame. The broadcaster wraps event payloads in a
/// JSON-encoded string, so a string `data` is decoded a second time.
pub fn parse_frame(text: &str) -> Result<ServerFrame, ClientError> {
    let raw: RawFrame = serde_json::from_str(text)?;
    let data = match raw.data {
        Value::String(inner) => serde_json::from_str(&inner).unwrap_or(Value::String(inner)),
        other => other,
    };
    Ok(ServerFrame {
        event: raw.event,
        channel: raw.channel,
        data,
    })
}

/// Payload of the `pusher:connection_established` handshake
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ConnectionEstablished {
    pub socket_id: String,
    #[serde(default)]
    pub activity_timeout: Option<u64>,
}
