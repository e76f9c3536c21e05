//! Slipstream Netcode - Real-time position synchronization
//!
//! Keeps many independently-simulated game clients visually consistent
//! over an unreliable, latent transport:
//!
//! - **Prediction**: the local player's input is applied immediately, no
//!   round-trip wait (`LocalPredictor`)
//! - **Reconciliation**: authoritative updates snap the simulation and
//!   replay unacknowledged inputs, with an eased visual correction
//! - **Interpolation**: remote entities are rendered slightly in the past,
//!   blended between real samples, extrapolated (capped) when samples run
//!   dry (`RemoteInterpolator`)
//! - **Session**: one `RoomSession` per connection owns the predictor and
//!   a per-peer map of interpolators, with exhaustive event dispatch
//!
//! # Architecture
//!
//! ```text
//! input ──▶ LocalPredictor ──▶ outbound update ──▶ transport
//!                ▲                                     │
//!                │ reconcile (own id)                  ▼
//!           RoomSession ◀── inbound PeerEvent ◀── transport
//!                │ sample (other id)
//!                ▼
//!         RemoteInterpolator ──▶ render_position(now)
//! ```
//!
//! The engine performs no I/O and never blocks; hosts drive it from a
//! per-frame callback (tick + render sampling) and a message-arrival
//! callback (event dispatch). Each entity's state has exactly one owner.
//!
//! # Example
//!
//! ```rust
//! use slipstream_core::Vec3;
//! use slipstream_netcode::{PeerMeta, RoomSession, SessionConfig};
//!
//! let mut session = RoomSession::new(
//!     "player-1",
//!     PeerMeta::default(),
//!     SessionConfig::default(),
//!     Vec3::ZERO,
//! );
//!
//! // Frame loop: command, step, sample
//! let input = session.command(Some(Vec3::new(4.0, 0.0, 2.0)), 0.0).unwrap();
//! assert_eq!(input.sequence, 1);
//! session.tick(1.0 / 60.0);
//! let _draw_at = session.local_render_position(16.0);
//! ```

mod error;
mod input_buffer;
mod interpolation;
mod prediction;
mod reconciliation;
mod session;
mod transport;

pub use error::{Error, Result};
pub use input_buffer::{InputBuffer, PlayerInput};
pub use interpolation::{InterpolatorConfig, PositionSample, RemoteInterpolator};
pub use prediction::{LocalPredictor, PredictorConfig};
pub use reconciliation::AuthoritativeUpdate;
pub use session::{RemotePeer, RoomSession, SessionConfig};
pub use transport::{decode, encode, Connection, EntityUpdate, PeerEvent, PeerMeta};
