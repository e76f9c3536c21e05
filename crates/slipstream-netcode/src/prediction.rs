//! Client-side prediction
//!
//! The local player's movement is applied immediately, without waiting for
//! a network round-trip, so control feels instant. Every command is tagged
//! with a sequence number and retained in the pending-input log until the
//! authority acknowledges it (see `reconciliation`).

use crate::input_buffer::{InputBuffer, PlayerInput};
use crate::reconciliation::Correction;
use crate::Result;
use slipstream_core::{FloorMap, Millis, SimRng, Vec3, WorldBounds};

/// Tunables for the local predictor
#[derive(Debug, Clone, Copy)]
pub struct PredictorConfig {
    /// Distance covered per simulation step
    ///
    /// Deliberately NOT scaled by frame delta: the stepping is
    /// frame-synchronous to match the legacy single-player feel. Changing
    /// this to time-based stepping changes perceived movement speed.
    pub move_speed: f64,
    /// Distance below which the target counts as reached
    pub stop_threshold: f64,
    /// Rectangular walkable area
    pub bounds: WorldBounds,
    /// Floor-height lookup applied after every position change
    pub floor: FloorMap,
    /// Displacement below which the entity counts as not moving
    pub stuck_distance: f64,
    /// Seconds of no displacement (with a target set) before nudging
    pub stuck_timeout_secs: f64,
    /// Lateral distance of the anti-stall nudge
    pub nudge_magnitude: f64,
    /// Duration of the visual correction blend after reconciliation
    pub correction_duration_ms: f64,
    /// Correction distance above which a warning is logged
    pub correction_warn_distance: f64,
    /// Capacity of the pending-input log
    pub input_capacity: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.25,
            stop_threshold: 0.15,
            bounds: WorldBounds::default(),
            floor: FloorMap::default(),
            stuck_distance: 0.01,
            stuck_timeout_secs: 0.2,
            nudge_magnitude: 0.6,
            correction_duration_ms: 80.0,
            correction_warn_distance: 2.0,
            input_capacity: 256,
        }
    }
}

/// Locally simulated player state with immediate input response
///
/// Owns the only writable copy of the local entity's position. Mutated by
/// `process_input` / `update` on the frame path and by
/// `receive_server_update` on the network path; both run on the same
/// owner, never concurrently.
#[derive(Debug)]
pub struct LocalPredictor {
    pub(crate) config: PredictorConfig,
    pub(crate) position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) direction: f64,
    pub(crate) target: Option<Vec3>,
    pub(crate) inputs: InputBuffer,
    pub(crate) correction: Option<Correction>,
    next_sequence: u64,
    rng: SimRng,
    stuck_anchor: Vec3,
    stuck_timer: f64,
}

impl LocalPredictor {
    /// Create a predictor at the given spawn point
    pub fn new(config: PredictorConfig, spawn: Vec3) -> Self {
        Self::with_seed(config, spawn, 0x5eed)
    }

    /// Create a predictor with an explicit RNG seed (for reproducible runs)
    pub fn with_seed(config: PredictorConfig, spawn: Vec3, seed: u64) -> Self {
        let position = config.floor.settle(spawn);
        Self {
            config,
            position,
            velocity: Vec3::ZERO,
            direction: 0.0,
            target: None,
            inputs: InputBuffer::new(config.input_capacity),
            correction: None,
            next_sequence: 0,
            rng: SimRng::new(seed),
            stuck_anchor: position,
            stuck_timer: 0.0,
        }
    }

    /// Record a movement command and apply it to the simulation
    ///
    /// The returned input carries the sequence number the authority will
    /// echo back; the caller transmits it. `None` means "stop".
    pub fn process_input(&mut self, target: Option<Vec3>, now_ms: Millis) -> Result<PlayerInput> {
        if let Some(t) = &target {
            if !t.is_finite() {
                return Err(crate::Error::NonFinite("input target"));
            }
        }

        self.next_sequence += 1;
        let input = PlayerInput {
            sequence: self.next_sequence,
            target,
            timestamp_ms: now_ms,
        };
        self.inputs.push(input)?;

        // Movement itself happens in update()
        self.target = target;
        Ok(input)
    }

    /// Advance the simulation by one step
    ///
    /// `dt_secs` feeds the anti-stall timer and the velocity estimate; the
    /// step distance itself is fixed (see `PredictorConfig::move_speed`).
    pub fn update(&mut self, dt_secs: f64) {
        self.apply_step(dt_secs);

        if self.target.is_none() {
            self.stuck_anchor = self.position;
            self.stuck_timer = 0.0;
            return;
        }

        if self.position.horizontal_distance(&self.stuck_anchor) < self.config.stuck_distance {
            self.stuck_timer += dt_secs;
            if self.stuck_timer > self.config.stuck_timeout_secs {
                self.nudge();
                self.stuck_anchor = self.position;
                self.stuck_timer = 0.0;
            }
        } else {
            self.stuck_anchor = self.position;
            self.stuck_timer = 0.0;
        }
    }

    /// One discrete movement step toward the current target
    pub(crate) fn apply_step(&mut self, dt_secs: f64) {
        let Some(target) = self.target else {
            self.velocity = Vec3::ZERO;
            return;
        };

        let to_target = Vec3::new(target.x - self.position.x, 0.0, target.z - self.position.z);
        let remaining = to_target.horizontal_length();

        if remaining < self.config.stop_threshold {
            // Arrival: snap exactly onto the target and rest on the floor
            self.position = self
                .config
                .floor
                .settle(Vec3::new(target.x, 0.0, target.z));
            self.velocity = Vec3::ZERO;
            self.target = None;
            return;
        }

        let step = to_target.normalized() * self.config.move_speed;
        let (clamped, hit_boundary) = self.config.bounds.clamp(self.position + step);
        self.position = self.config.floor.settle(clamped);
        self.direction = step.x.atan2(step.z);
        self.velocity = if dt_secs > 1e-9 {
            step * (1.0 / dt_secs)
        } else {
            Vec3::ZERO
        };

        if hit_boundary {
            // Pinned against the wall counts as arrival
            self.velocity = Vec3::ZERO;
            self.target = None;
        }
    }

    /// Lateral kick applied when a set target produces no displacement
    ///
    /// Guards against numerically unreachable targets freezing the entity.
    fn nudge(&mut self) {
        let forward = if self.velocity.horizontal_length() > 1e-6 {
            self.velocity.normalized()
        } else {
            Vec3::new(self.direction.sin(), 0.0, self.direction.cos())
        };
        let lateral = Vec3::new(-forward.z, 0.0, forward.x)
            * (self.rng.next_sign() * self.config.nudge_magnitude);

        let (clamped, _) = self.config.bounds.clamp(self.position + lateral);
        self.position = self.config.floor.settle(clamped);

        tracing::debug!(
            x = self.position.x,
            z = self.position.z,
            "anti-stall nudge applied"
        );
    }

    /// Position to draw this frame
    ///
    /// While a reconciliation correction is active this eases from the
    /// pre-correction render position toward the authoritative one; the
    /// correction is discarded once fully blended.
    pub fn render_position(&mut self, now_ms: Millis) -> Vec3 {
        if let Some(correction) = &self.correction {
            let (blended, finished) = correction.sample(now_ms);
            if finished {
                self.correction = None;
            } else {
                return blended;
            }
        }
        self.position
    }

    /// Current simulated position (not the render position)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity estimate in units per second
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Facing angle in radians
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Destination of the current move, if any
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Whether a move is in progress
    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    /// Sequence number of the most recently issued input
    pub fn last_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Number of inputs awaiting acknowledgment
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// The predictor's configuration
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }
}
