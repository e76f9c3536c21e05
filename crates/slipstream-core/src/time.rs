//! Timestamp unit and wall clock
//!
//! Every timestamp in the engine is milliseconds since the Unix epoch as
//! an `f64`, which keeps interpolation math fractional without unit
//! conversions. Components take timestamps as parameters rather than
//! reading the clock themselves, so tests can drive time explicitly;
//! `now_millis` exists for hosts that want the real clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub type Millis = f64;

/// Current wall-clock time in milliseconds
pub fn now_millis() -> Millis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
