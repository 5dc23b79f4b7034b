//! Deterministic simulation module
//!
//! All skill logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, no wall-clock reads
//! - Tick-seeded RNG only (draws derive from seed + tick + entity id)
//! - Stable iteration order (ordered maps keyed by entity ID)
//! - No rendering or platform dependencies
//!
//! The same tick may be re-executed during rollback, so every operation is a
//! function of (state, per-tick input, tuning profile) and nothing else.

pub mod collision;
pub mod enhance;
pub mod movement;
pub mod recoil;
pub mod state;
pub mod termination;
pub mod tick;
pub mod timer;
pub mod world;

pub use state::{ActorId, EndReason, EnemyId, SkillEvent, SkillState};
pub use tick::{DashEngine, TickInput};
pub use timer::TickTimer;
pub use world::{Actor, EffectKind, Enemy, World};
