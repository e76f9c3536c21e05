//! Server reconciliation
//!
//! When an authoritative update arrives for the local entity, the
//! simulation snaps to the authoritative state, acknowledged inputs are
//! dropped, and the remaining pending inputs are replayed so local control
//! does not rubber-band. The snap itself is hidden behind a short eased
//! correction blend on the render path.

use crate::prediction::LocalPredictor;
use serde::{Deserialize, Serialize};
use slipstream_core::{ease_out_cubic, Millis, Vec3};

/// Nominal step used when fast-forwarding replayed inputs
const REPLAY_STEP_SECS: f64 = 1.0 / 60.0;

/// Authoritative state for the local entity, as confirmed by the server
/// or relay peer
///
/// Transient: consumed immediately by `receive_server_update`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeUpdate {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing angle in radians
    pub direction: f64,
    /// Highest input sequence number the authority has applied
    pub last_processed_input: u64,
    pub timestamp_ms: Millis,
}

impl AuthoritativeUpdate {
    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.direction.is_finite()
    }
}

/// Visual smoothing for a reconciliation snap
///
/// Eases the rendered position from where the entity was drawn before the
/// correction to the authoritative position, over a short fixed duration.
/// Distinct from remote-entity interpolation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Correction {
    from: Vec3,
    to: Vec3,
    started_at_ms: Millis,
    duration_ms: f64,
}

impl Correction {
    pub(crate) fn new(from: Vec3, to: Vec3, started_at_ms: Millis, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            started_at_ms,
            duration_ms,
        }
    }

    /// Blended position at `now_ms`, and whether the blend has finished
    pub(crate) fn sample(&self, now_ms: Millis) -> (Vec3, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = (now_ms - self.started_at_ms) / self.duration_ms;
        if t >= 1.0 {
            (self.to, true)
        } else {
            (self.from.lerp(&self.to, ease_out_cubic(t)), false)
        }
    }
}

impl LocalPredictor {
    /// Reconcile the local simulation with an authoritative update
    ///
    /// Snaps position/velocity/direction to the authoritative values,
    /// drops every pending input the authority already processed, then
    /// replays the rest one nominal step each. Returns the correction
    /// distance; corrections are normal protocol behavior, never an error.
    pub fn receive_server_update(&mut self, update: &AuthoritativeUpdate, now_ms: Millis) -> f64 {
        if !update.is_finite() {
            tracing::warn!("ignoring authoritative update with non-finite values");
            return 0.0;
        }

        let rendered = self.render_position(now_ms);

        // Rewind to the authoritative state
        self.position = update.position;
        self.velocity = update.velocity;
        self.direction = update.direction;

        self.inputs.acknowledge(update.last_processed_input);

        // Fast-forward through the not-yet-acknowledged commands
        let pending: Vec<_> = self.inputs.iter().copied().collect();
        for input in pending {
            self.target = input.target;
            self.apply_step(REPLAY_STEP_SECS);
        }

        let distance = rendered.distance(&update.position);
        if distance > self.config.correction_warn_distance {
            tracing::warn!(
                distance,
                last_processed = update.last_processed_input,
                "large reconciliation correction"
            );
        } else {
            tracing::debug!(
                distance,
                last_processed = update.last_processed_input,
                "reconciled with authoritative state"
            );
        }

        self.correction = Some(Correction::new(
            rendered,
            update.position,
            now_ms,
            self.config.correction_duration_ms,
        ));

        distance
    }
}
