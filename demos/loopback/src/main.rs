//! Loopback Demo
//!
//! Two room sessions wired through an in-memory queue with artificial
//! latency. Alice walks toward a target while Bob watches her through his
//! remote interpolator; meanwhile Alice's own updates echo back as
//! (trivially agreeing) acknowledgments, exercising the reconciliation
//! path end to end.

use slipstream_core::Vec3;
use slipstream_netcode::{decode, encode, PeerMeta, RoomSession, SessionConfig};
use std::collections::VecDeque;

const FRAME_SECS: f64 = 1.0 / 60.0;
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Artificial one-way latency, in frames
const LATENCY_FRAMES: usize = 6;

/// In-memory stand-in for the network: byte payloads delivered after a
/// fixed number of frames
struct DelayQueue {
    queue: VecDeque<(usize, Vec<u8>)>,
}

impl DelayQueue {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    fn send(&mut self, frame: usize, payload: Vec<u8>) {
        self.queue.push_back((frame + LATENCY_FRAMES, payload));
    }

    fn deliver(&mut self, frame: usize) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Some((due, _)) = self.queue.front() {
            if *due > frame {
                break;
            }
            let (_, payload) = self.queue.pop_front().unwrap();
            out.push(payload);
        }
        out
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Slipstream Loopback Demo ===\n");

    let mut alice = RoomSession::new(
        "alice",
        PeerMeta {
            username: "Alice".into(),
            avatar: "fox".into(),
        },
        SessionConfig::default(),
        Vec3::ZERO,
    );
    let mut bob = RoomSession::new(
        "bob",
        PeerMeta {
            username: "Bob".into(),
            avatar: "owl".into(),
        },
        SessionConfig::default(),
        Vec3::new(12.0, 0.0, 0.0),
    );

    let mut alice_to_bob = DelayQueue::new();

    // Announce presence
    let join = encode(&alice.join_event()).expect("encode join");
    alice_to_bob.send(0, join);

    // Alice heads for a point off the platform
    let target = Vec3::new(10.0, 0.0, 6.0);
    alice
        .command(Some(target), 0.0)
        .expect("finite target accepted");
    println!("alice -> moving to ({}, {})\n", target.x, target.z);

    for frame in 0..240usize {
        let now_ms = frame as f64 * FRAME_MS;

        // Alice simulates and broadcasts
        alice.tick(FRAME_SECS);
        let update = alice.outbound_update(now_ms);
        alice_to_bob.send(frame, encode(&update).expect("encode update"));

        // Alice's own update loops straight back as an acknowledgment
        alice.handle_event(update, now_ms);

        // Bob receives whatever the wire delivers this frame
        for payload in alice_to_bob.deliver(frame) {
            let event = decode(&payload).expect("decode payload");
            bob.handle_event(event, now_ms);
        }

        if frame % 30 == 0 {
            let truth = alice.local_render_position(now_ms);
            let seen = bob
                .peer("alice")
                .map(|p| p.render_position(now_ms))
                .unwrap_or(Vec3::ZERO);
            println!(
                "frame {frame:>3}  alice at ({:6.2}, {:6.2})  bob sees ({:6.2}, {:6.2})  error {:5.2}",
                truth.x,
                truth.z,
                seen.x,
                seen.z,
                truth.distance(&seen)
            );
        }
    }

    println!(
        "\nalice arrived: {}  bob tracked {} peer(s)",
        !alice.local().is_moving(),
        bob.peer_count()
    );
}
