//! Slipstream Core - Shared math and world helpers
//!
//! This crate provides the building blocks the synchronization engine is
//! written against:
//!
//! - `Vec3` - Real-valued 3D coordinates with the small set of operations
//!   the engine needs (length, distance, normalize, lerp)
//! - `WorldBounds` - Rectangular x/z clamp with clamp reporting
//! - `FloorMap` - Pure two-level floor-height lookup keyed on (x, z)
//! - Easing helpers - `lerp`, `ease_out_cubic`, `smoothstep`
//! - `SimRng` - Deterministic xorshift64 RNG for simulation decisions
//! - `Millis` - The timestamp unit used across the engine

mod ease;
mod rng;
mod time;
mod vec;
mod world;

pub use ease::{ease_out_cubic, lerp, smoothstep};
pub use rng::SimRng;
pub use time::{now_millis, Millis};
pub use vec::Vec3;
pub use world::{FloorMap, WorldBounds};
