//! Error types for slipstream-netcode
//!
//! The simulation itself never fails; errors exist only at the boundary
//! where untrusted values enter (caller inputs, wire payloads).

use thiserror::Error;

/// Netcode error type
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate entering the simulation was NaN or infinite
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    /// Pending-input log overflow
    #[error("input buffer full, cannot queue more inputs")]
    InputBufferFull,

    /// Wire payload could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Transport error reported by the host's channel implementation
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
