//! Wire model and transport seam
//!
//! The engine never performs I/O itself. Hosts bring their own channel
//! (WebSocket, pub/sub presence, in-memory for tests) behind the
//! `Connection` trait and shuttle `PeerEvent` payloads through it. The
//! payloads form a tagged union so the session dispatcher can match
//! exhaustively instead of inspecting loosely-shaped objects.

use crate::Result;
use serde::{Deserialize, Serialize};
use slipstream_core::{Millis, Vec3};

/// Cosmetic identity metadata supplied by the identity layer
///
/// Opaque to the engine: echoed through to peers, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerMeta {
    pub username: String,
    pub avatar: String,
}

/// One entity's state on the wire
///
/// Sent by each client for its own entity. On receipt, `sequence` is read
/// as "last processed input" when the update pertains to the local entity,
/// and ignored for remote samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityUpdate {
    pub id: String,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing angle in radians
    pub direction: f64,
    pub is_moving: bool,
    pub sequence: u64,
    pub timestamp_ms: Millis,
}

/// Discriminated union of everything that crosses the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerEvent {
    /// Position/state sample for some entity (local ack or remote sample,
    /// decided by id at dispatch time)
    Update(EntityUpdate),
    /// A peer entered the room
    Join { id: String, meta: PeerMeta },
    /// A peer left the room
    Leave { id: String },
}

/// Encode an event as its JSON wire form
pub fn encode(event: &PeerEvent) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(event)?)
}

/// Decode an event from its JSON wire form
pub fn decode(bytes: &[u8]) -> Result<PeerEvent> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Bidirectional, ordered-within-peer, possibly-lossy channel
///
/// Implemented by the host for its chosen network stack. All methods are
/// non-blocking; the engine is fire-and-forget about delivery.
pub trait Connection {
    /// Error type for this connection
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a payload (best effort)
    fn send(&self, data: &[u8]) -> std::result::Result<(), Self::Error>;

    /// Receive a payload if one is available
    fn recv(&self) -> std::result::Result<Option<Vec<u8>>, Self::Error>;

    /// Whether the channel is still usable
    fn is_connected(&self) -> bool;

    /// Close the channel gracefully
    fn close(&self) -> std::result::Result<(), Self::Error>;
}
