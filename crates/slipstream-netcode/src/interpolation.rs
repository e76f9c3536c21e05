//! Remote-entity interpolation and extrapolation
//!
//! A peer's true position is only known at discrete, network-delayed
//! instants. Rendering happens a fixed delay in the past so two real
//! samples usually bracket the render instant; when they don't, the
//! position is projected forward from the latest sample's velocity, capped
//! so a silent peer freezes instead of drifting away.

use serde::{Deserialize, Serialize};
use slipstream_core::{smoothstep, Millis, Vec3};
use std::collections::VecDeque;

/// Tunables trading latency for smoothness
#[derive(Debug, Clone, Copy)]
pub struct InterpolatorConfig {
    /// How far in the past remote entities are rendered
    pub delay_ms: f64,
    /// Capacity of the sample ring (FIFO, oldest evicted)
    pub buffer_size: usize,
    /// Maximum time to project forward past the newest sample
    pub extrapolation_limit_ms: f64,
}

impl Default for InterpolatorConfig {
    fn default() -> Self {
        Self {
            delay_ms: 100.0,
            buffer_size: 3,
            extrapolation_limit_ms: 250.0,
        }
    }
}

/// One timestamped position received from the network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub position: Vec3,
    pub timestamp_ms: Millis,
}

/// Smooth, lag-compensated view of one remote entity
///
/// Samples are kept in arrival order. Out-of-order packets are accepted
/// positionally rather than re-sorted; the bracketing search degrades to a
/// less smooth blend under reordering but never fails.
#[derive(Debug)]
pub struct RemoteInterpolator {
    config: InterpolatorConfig,
    samples: VecDeque<PositionSample>,
    current_position: Vec3,
    direction: f64,
    velocity: Vec3,
}

impl RemoteInterpolator {
    /// Create an interpolator in the cold (passthrough) state
    pub fn new(config: InterpolatorConfig) -> Self {
        Self {
            config,
            samples: VecDeque::with_capacity(config.buffer_size),
            current_position: Vec3::ZERO,
            direction: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    /// Record a network update for this entity
    ///
    /// The just-received values become the extrapolation seeds
    /// immediately; the sample joins the FIFO ring.
    pub fn receive_update(
        &mut self,
        position: Vec3,
        direction: f64,
        velocity: Vec3,
        timestamp_ms: Millis,
    ) {
        if !position.is_finite()
            || !velocity.is_finite()
            || !direction.is_finite()
            || !timestamp_ms.is_finite()
        {
            tracing::warn!("ignoring remote sample with non-finite values");
            return;
        }

        if self.samples.len() >= self.config.buffer_size {
            self.samples.pop_front();
        }
        self.samples.push_back(PositionSample {
            position,
            timestamp_ms,
        });

        self.current_position = position;
        self.direction = direction;
        self.velocity = velocity;
    }

    /// Position to draw at the given render instant
    pub fn render_position(&self, render_time_ms: Millis) -> Vec3 {
        if self.samples.len() < 2 {
            // Cold: nothing to interpolate between yet
            return self.current_position;
        }

        // Render slightly in the past so real samples bracket the instant
        let target = render_time_ms - self.config.delay_ms;

        let newest = self.samples[self.samples.len() - 1];
        if target >= newest.timestamp_ms {
            // No newer sample yet: project forward, capped
            let ahead = (target - newest.timestamp_ms).min(self.config.extrapolation_limit_ms);
            return newest.position + self.velocity * (ahead / 1000.0);
        }

        for i in 0..self.samples.len() - 1 {
            let from = self.samples[i];
            let to = self.samples[i + 1];
            if from.timestamp_ms <= target && target <= to.timestamp_ms {
                if to.timestamp_ms == from.timestamp_ms {
                    return from.position;
                }
                let t = (target - from.timestamp_ms) / (to.timestamp_ms - from.timestamp_ms);
                return from.position.lerp(&to.position, smoothstep(t));
            }
        }

        // Older than everything buffered (or no bracketing pair after
        // reordering): hold the oldest known position
        self.samples[0].position
    }

    /// Last received facing angle, un-interpolated
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Last received velocity in units per second
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Last received position, bypassing interpolation
    pub fn current_position(&self) -> Vec3 {
        self.current_position
    }

    /// Whether enough samples exist to interpolate
    pub fn is_warm(&self) -> bool {
        self.samples.len() >= 2
    }

    /// Timestamp of the newest buffered sample
    pub fn newest_timestamp(&self) -> Option<Millis> {
        self.samples.back().map(|s| s.timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpolator() -> RemoteInterpolator {
        RemoteInterpolator::new(InterpolatorConfig::default())
    }

    #[test]
    fn test_cold_passthrough() {
        let mut interp = interpolator();
        assert_eq!(interp.render_position(0.0), Vec3::ZERO);

        interp.receive_update(Vec3::new(5.0, 0.0, 1.0), 0.3, Vec3::ZERO, 1000.0);
        // One sample: still passthrough
        assert!(!interp.is_warm());
        assert_eq!(interp.render_position(2000.0), Vec3::new(5.0, 0.0, 1.0));
        assert_eq!(interp.direction(), 0.3);
    }

    #[test]
    fn test_interpolation_is_convex() {
        let mut interp = interpolator();
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 0.0, 4.0);
        interp.receive_update(a, 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(b, 0.0, Vec3::ZERO, 1100.0);

        let delay = interp.config.delay_ms;
        for i in 1..10 {
            let render_time = 1000.0 + delay + i as f64 * 10.0;
            let p = interp.render_position(render_time);
            // Strictly inside the segment endpoints, no overshoot
            assert!(p.x >= a.x && p.x <= b.x, "x out of range: {}", p.x);
            assert!(p.z >= a.z && p.z <= b.z, "z out of range: {}", p.z);
            assert_eq!(p.y, 0.0);
        }

        // Endpoints map exactly
        assert_eq!(interp.render_position(1000.0 + delay), a);
        assert_eq!(interp.render_position(1100.0 + delay), b);
    }

    #[test]
    fn test_interpolation_is_monotone_along_segment() {
        let mut interp = interpolator();
        interp.receive_update(Vec3::ZERO, 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(Vec3::new(10.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1100.0);

        let delay = interp.config.delay_ms;
        let mut prev = -1.0;
        for i in 0..=20 {
            let p = interp.render_position(1000.0 + delay + i as f64 * 5.0);
            assert!(p.x >= prev);
            prev = p.x;
        }
    }

    #[test]
    fn test_extrapolation_uses_velocity() {
        let mut interp = interpolator();
        interp.receive_update(Vec3::ZERO, 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(
            Vec3::new(10.0, 0.0, 0.0),
            0.0,
            Vec3::new(5.0, 0.0, 0.0),
            1100.0,
        );

        // 100 ms past the newest sample (after the delay offset)
        let delay = interp.config.delay_ms;
        let p = interp.render_position(1100.0 + delay + 100.0);
        assert!((p.x - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_extrapolation_cap_freezes_position() {
        let mut interp = interpolator();
        interp.receive_update(Vec3::ZERO, 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(
            Vec3::new(10.0, 0.0, 0.0),
            0.0,
            Vec3::new(5.0, 0.0, 0.0),
            1100.0,
        );

        let delay = interp.config.delay_ms;
        let cap = interp.config.extrapolation_limit_ms;
        let at_cap = interp.render_position(1100.0 + delay + cap);
        let far_beyond = interp.render_position(1100.0 + delay + cap + 10_000.0);
        // No further drift past the cap
        assert_eq!(at_cap, far_beyond);
        assert!((at_cap.x - (10.0 + 5.0 * cap / 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fifo_eviction_keeps_newest() {
        let mut interp = interpolator();
        for i in 0..5 {
            interp.receive_update(
                Vec3::new(i as f64, 0.0, 0.0),
                0.0,
                Vec3::ZERO,
                1000.0 + i as f64 * 100.0,
            );
        }

        // Capacity 3: oldest two evicted, newest survives
        assert_eq!(interp.newest_timestamp(), Some(1400.0));
        assert_eq!(interp.current_position(), Vec3::new(4.0, 0.0, 0.0));

        // A render instant older than the whole buffer holds the oldest
        // retained sample
        let p = interp.render_position(0.0);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_identical_timestamps_do_not_divide_by_zero() {
        let mut interp = interpolator();
        interp.receive_update(Vec3::new(1.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(Vec3::new(2.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1000.0);

        let p = interp.render_position(1000.0 + interp.config.delay_ms);
        assert!(p.is_finite());
        assert_eq!(p, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_order_sample_never_panics() {
        let mut interp = interpolator();
        interp.receive_update(Vec3::new(0.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(Vec3::new(10.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1200.0);
        // Late packet, accepted positionally
        interp.receive_update(Vec3::new(5.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1100.0);

        for i in 0..40 {
            let p = interp.render_position(1000.0 + i as f64 * 20.0);
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_non_finite_sample_is_ignored() {
        let mut interp = interpolator();
        interp.receive_update(Vec3::new(1.0, 0.0, 0.0), 0.0, Vec3::ZERO, 1000.0);
        interp.receive_update(Vec3::new(f64::NAN, 0.0, 0.0), 0.0, Vec3::ZERO, 1100.0);

        assert!(!interp.is_warm());
        assert_eq!(interp.current_position(), Vec3::new(1.0, 0.0, 0.0));
    }
}
