//! Per-connection room orchestration
//!
//! One `RoomSession` per connection, owning the local predictor and one
//! interpolator per remote peer. There is no ambient global state; whoever
//! needs the session holds a handle to it. Inbound events are dispatched
//! exhaustively: an update for the local id feeds reconciliation, any
//! other id feeds that peer's interpolator, join/leave manage the peer map.

use crate::interpolation::{InterpolatorConfig, RemoteInterpolator};
use crate::prediction::{LocalPredictor, PredictorConfig};
use crate::reconciliation::AuthoritativeUpdate;
use crate::transport::{EntityUpdate, PeerEvent, PeerMeta};
use crate::{PlayerInput, Result};
use indexmap::IndexMap;
use slipstream_core::{Millis, Vec3};

/// Configuration for a room session
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub predictor: PredictorConfig,
    pub interpolator: InterpolatorConfig,
}

/// One remote peer: cosmetic metadata plus its interpolator
#[derive(Debug)]
pub struct RemotePeer {
    meta: PeerMeta,
    interpolator: RemoteInterpolator,
}

impl RemotePeer {
    /// Cosmetic metadata as last announced
    pub fn meta(&self) -> &PeerMeta {
        &self.meta
    }

    /// Position to draw this peer at the given render instant
    pub fn render_position(&self, now_ms: Millis) -> Vec3 {
        self.interpolator.render_position(now_ms)
    }

    /// Facing angle in radians
    pub fn direction(&self) -> f64 {
        self.interpolator.direction()
    }

    /// Whether this peer has delivered enough samples to interpolate
    pub fn is_warm(&self) -> bool {
        self.interpolator.is_warm()
    }
}

/// Orchestrator wiring transport events to the prediction and
/// interpolation engines
#[derive(Debug)]
pub struct RoomSession {
    local_id: String,
    meta: PeerMeta,
    config: SessionConfig,
    predictor: LocalPredictor,
    peers: IndexMap<String, RemotePeer>,
}

impl RoomSession {
    /// Create a session for the local player at the given spawn point
    pub fn new(local_id: impl Into<String>, meta: PeerMeta, config: SessionConfig, spawn: Vec3) -> Self {
        Self {
            local_id: local_id.into(),
            meta,
            config,
            predictor: LocalPredictor::new(config.predictor, spawn),
            peers: IndexMap::new(),
        }
    }

    /// Identifier assigned by the identity layer
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// The join announcement for this session, sent once on connect
    pub fn join_event(&self) -> PeerEvent {
        PeerEvent::Join {
            id: self.local_id.clone(),
            meta: self.meta.clone(),
        }
    }

    /// The leave announcement for this session, sent on disconnect
    pub fn leave_event(&self) -> PeerEvent {
        PeerEvent::Leave {
            id: self.local_id.clone(),
        }
    }

    /// Issue a movement command and return the input for transmission
    pub fn command(&mut self, target: Option<Vec3>, now_ms: Millis) -> Result<PlayerInput> {
        self.predictor.process_input(target, now_ms)
    }

    /// Advance the local simulation by one frame
    pub fn tick(&mut self, dt_secs: f64) {
        self.predictor.update(dt_secs);
    }

    /// Snapshot of the local entity for broadcast
    pub fn outbound_update(&self, now_ms: Millis) -> PeerEvent {
        PeerEvent::Update(EntityUpdate {
            id: self.local_id.clone(),
            position: self.predictor.position(),
            velocity: self.predictor.velocity(),
            direction: self.predictor.direction(),
            is_moving: self.predictor.is_moving(),
            sequence: self.predictor.last_sequence(),
            timestamp_ms: now_ms,
        })
    }

    /// Dispatch one inbound event
    pub fn handle_event(&mut self, event: PeerEvent, now_ms: Millis) {
        match event {
            PeerEvent::Update(update) if update.id == self.local_id => {
                let ack = AuthoritativeUpdate {
                    position: update.position,
                    velocity: update.velocity,
                    direction: update.direction,
                    last_processed_input: update.sequence,
                    timestamp_ms: update.timestamp_ms,
                };
                self.predictor.receive_server_update(&ack, now_ms);
            }
            PeerEvent::Update(update) => {
                let interpolator_config = self.config.interpolator;
                let peer = self
                    .peers
                    .entry(update.id)
                    .or_insert_with(|| RemotePeer {
                        meta: PeerMeta::default(),
                        interpolator: RemoteInterpolator::new(interpolator_config),
                    });
                peer.interpolator.receive_update(
                    update.position,
                    update.direction,
                    update.velocity,
                    update.timestamp_ms,
                );
            }
            PeerEvent::Join { id, meta } => {
                if id == self.local_id {
                    return;
                }
                tracing::info!(peer = %id, username = %meta.username, "peer joined");
                let interpolator_config = self.config.interpolator;
                let peer = self.peers.entry(id).or_insert_with(|| RemotePeer {
                    meta: PeerMeta::default(),
                    interpolator: RemoteInterpolator::new(interpolator_config),
                });
                peer.meta = meta;
            }
            PeerEvent::Leave { id } => {
                if self.peers.shift_remove(&id).is_some() {
                    tracing::info!(peer = %id, "peer left");
                }
            }
        }
    }

    /// Position to draw the local entity this frame
    pub fn local_render_position(&mut self, now_ms: Millis) -> Vec3 {
        self.predictor.render_position(now_ms)
    }

    /// The local prediction engine
    pub fn local(&self) -> &LocalPredictor {
        &self.predictor
    }

    /// Look up one remote peer
    pub fn peer(&self, id: &str) -> Option<&RemotePeer> {
        self.peers.get(id)
    }

    /// Iterate over remote peers in join order
    pub fn peers(&self) -> impl Iterator<Item = (&str, &RemotePeer)> {
        self.peers.iter().map(|(id, peer)| (id.as_str(), peer))
    }

    /// Number of remote peers currently tracked
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> RoomSession {
        RoomSession::new(
            "me",
            PeerMeta {
                username: "local".into(),
                avatar: "wolf".into(),
            },
            SessionConfig::default(),
            Vec3::ZERO,
        )
    }

    fn update_for(id: &str, x: f64, sequence: u64, timestamp_ms: f64) -> PeerEvent {
        PeerEvent::Update(EntityUpdate {
            id: id.into(),
            position: Vec3::new(x, 0.0, 0.0),
            velocity: Vec3::ZERO,
            direction: 0.0,
            is_moving: false,
            sequence,
            timestamp_ms,
        })
    }

    #[test]
    fn test_join_and_leave_lifecycle() {
        let mut session = session();
        assert_eq!(session.peer_count(), 0);

        session.handle_event(
            PeerEvent::Join {
                id: "other".into(),
                meta: PeerMeta {
                    username: "remote".into(),
                    avatar: "owl".into(),
                },
            },
            0.0,
        );
        assert_eq!(session.peer_count(), 1);
        assert_eq!(session.peer("other").unwrap().meta().username, "remote");

        session.handle_event(PeerEvent::Leave { id: "other".into() }, 0.0);
        assert_eq!(session.peer_count(), 0);

        // Leaving twice is harmless
        session.handle_event(PeerEvent::Leave { id: "other".into() }, 0.0);
        assert_eq!(session.peer_count(), 0);
    }

    #[test]
    fn test_first_update_creates_the_peer() {
        let mut session = session();
        session.handle_event(update_for("other", 5.0, 0, 1000.0), 1000.0);

        let peer = session.peer("other").unwrap();
        assert!(!peer.is_warm());
        assert_eq!(peer.render_position(2000.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_own_update_feeds_reconciliation() {
        let mut session = session();
        for i in 1..=4u64 {
            session
                .command(Some(Vec3::new(10.0, 0.0, 0.0)), i as f64 * 16.0)
                .unwrap();
        }
        assert_eq!(session.local().pending_inputs(), 4);

        session.handle_event(update_for("me", 1.0, 3, 100.0), 100.0);

        // Acknowledged inputs dropped, no peer entry created for ourselves
        assert_eq!(session.local().pending_inputs(), 1);
        assert_eq!(session.peer_count(), 0);
    }

    #[test]
    fn test_own_join_is_ignored() {
        let mut session = session();
        session.handle_event(
            PeerEvent::Join {
                id: "me".into(),
                meta: PeerMeta::default(),
            },
            0.0,
        );
        assert_eq!(session.peer_count(), 0);
    }

    #[test]
    fn test_join_after_update_fills_in_meta() {
        let mut session = session();
        session.handle_event(update_for("other", 5.0, 0, 1000.0), 1000.0);
        assert_eq!(session.peer("other").unwrap().meta().username, "");

        session.handle_event(
            PeerEvent::Join {
                id: "other".into(),
                meta: PeerMeta {
                    username: "remote".into(),
                    avatar: "owl".into(),
                },
            },
            1010.0,
        );
        assert_eq!(session.peer("other").unwrap().meta().username, "remote");
        // The interpolator's history survived the meta update
        assert_eq!(
            session.peer("other").unwrap().render_position(2000.0),
            Vec3::new(5.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_outbound_update_reflects_local_state() {
        let mut session = session();
        session
            .command(Some(Vec3::new(10.0, 0.0, 0.0)), 0.0)
            .unwrap();
        session.tick(1.0 / 60.0);

        let PeerEvent::Update(update) = session.outbound_update(16.0) else {
            panic!("outbound update must be an Update event");
        };
        assert_eq!(update.id, "me");
        assert!(update.is_moving);
        assert_eq!(update.sequence, 1);
        assert_eq!(update.position, session.local().position());
    }

    #[test]
    fn test_peers_iterate_in_join_order() {
        let mut session = session();
        for name in ["a", "b", "c"] {
            session.handle_event(
                PeerEvent::Join {
                    id: name.into(),
                    meta: PeerMeta::default(),
                },
                0.0,
            );
        }
        let ids: Vec<&str> = session.peers().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
