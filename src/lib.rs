//! Twindash - a server-authoritative two-actor dash combination skill engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, skill state)
//! - `tuning`: Data-driven skill balance (JSON parameter profiles)
//!
//! Everything in `sim` must replay bit-identically under rollback: the same
//! tick sequence with the same inputs always produces the same state.

pub mod sim;
pub mod tuning;

pub use sim::{
    ActorId, DashEngine, EndReason, EnemyId, SkillEvent, SkillState, TickInput, TickTimer, World,
};
pub use tuning::DashTuning;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz authoritative tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Velocity magnitude below this counts as "not moving"
    pub const MOVE_EPSILON: f32 = 0.05;

    /// Extra slack added to the attack radius when re-validating the
    /// broad-phase overlap result against true distance
    pub const OVERLAP_TOLERANCE: f32 = 0.1;
}

/// Normalize a vector, returning the fallback when it is (near) zero
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.length_squared() > 1e-8 {
        v.normalize()
    } else {
        fallback
    }
}

/// Rotate a vector counterclockwise by `angle` radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Convert a duration in seconds to whole simulation ticks, rounding up so
/// short windows never quantize to zero
#[inline]
pub fn secs_to_ticks(secs: f32, dt: f32) -> u64 {
    if secs <= 0.0 {
        return 0;
    }
    (secs / dt).ceil() as u64
}
