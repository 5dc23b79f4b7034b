//! Skill state and core simulation types
//!
//! One `SkillState` per activated actor, owned by the engine, alive from
//! activation to termination. Everything here serializes so the authoritative
//! host can snapshot and restore around rollback.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::timer::TickTimer;
use crate::consts::MOVE_EPSILON;

/// Stable id of a player-controlled actor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ActorId(pub u32);

/// Stable id of a hostile non-player entity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EnemyId(pub u32);

/// Why an activation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Skill timer ran out
    Timeout,
    /// Owner sat still past the post-stun grace window
    Stillness,
    /// Wrong-angle collision between the two participants
    WrongCollision,
    /// Owner was despawned externally
    OwnerGone,
}

/// Events emitted by one engine tick, consumed by the activation layer
/// (deactivation notifications) and by non-authoritative observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SkillEvent {
    /// The activation for `actor` ended; its back-reference must be cleared
    Ended { actor: ActorId, reason: EndReason },
    /// An enemy took dash damage
    EnemyHit { actor: ActorId, enemy: EnemyId, damage: f32 },
    /// Owner rammed an enemy still on cooldown and hurt itself
    SelfPunish { actor: ActorId, enemy: EnemyId, damage: f32 },
    /// The two participants met head-on; both now hold `count`
    FrontCollision { initiator: ActorId, partner: ActorId, count: u32 },
    /// The final-enhancement latch engaged for `actor`
    FinalEnhancement { actor: ActorId },
}

/// Per-activation skill state for one actor.
///
/// Mutated only during the owner's turn within a tick; cross-actor effects
/// go through the engine's partner-propagation path, never from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillState {
    pub owner: ActorId,
    pub active: bool,
    /// Remaining skill duration
    pub skill_timer: TickTimer,
    /// Remaining stun (initial cast lock, or front-collision freeze)
    pub stun_timer: TickTimer,
    /// Front collisions banked so far, bounded [0, cap]
    pub enhancement_count: u32,
    /// One-way latch; never reverts within an activation
    pub is_final_enhancement: bool,
    pub is_moving: bool,
    pub velocity: Vec2,
    /// Last nonzero normalized input intent
    pub last_input_dir: Vec2,
    /// Frozen after a front collision, waiting for the recoil launch
    pub is_waiting_to_recoil: bool,
    pub pending_recoil_dir: Vec2,
    /// Collider is off during stun/freeze; no collision processing runs
    pub attack_collider_enabled: bool,
    /// Whether any nonzero intent has arrived since activation
    pub has_input: bool,
    /// Absolute tick ending the post-stun grace window (stillness gate)
    pub stun_grace_until: u64,
    /// Per-enemy re-hit suppression windows
    pub enemy_cooldowns: BTreeMap<EnemyId, TickTimer>,
    /// Actor pairs suppressed from re-triggering a collision consequence
    pub recently_hit_actors: BTreeMap<ActorId, TickTimer>,
}

impl SkillState {
    /// Fresh state at activation tick `now`; the initial stun and base skill
    /// duration are started by the engine right after construction.
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            active: true,
            skill_timer: TickTimer::default(),
            stun_timer: TickTimer::default(),
            enhancement_count: 0,
            is_final_enhancement: false,
            is_moving: false,
            velocity: Vec2::ZERO,
            last_input_dir: Vec2::ZERO,
            is_waiting_to_recoil: false,
            pending_recoil_dir: Vec2::ZERO,
            attack_collider_enabled: false,
            has_input: false,
            stun_grace_until: 0,
            enemy_cooldowns: BTreeMap::new(),
            recently_hit_actors: BTreeMap::new(),
        }
    }

    /// Single write path for velocity, keeping `is_moving` consistent.
    /// Sub-epsilon magnitudes snap to exact zero so drift never accumulates.
    pub fn set_velocity(&mut self, v: Vec2) {
        if v.length() < MOVE_EPSILON {
            self.velocity = Vec2::ZERO;
            self.is_moving = false;
        } else {
            self.velocity = v;
            self.is_moving = true;
            // Moving and waiting-to-recoil are mutually exclusive
            self.is_waiting_to_recoil = false;
        }
    }

    /// True while an unexpired cooldown exists for this enemy
    pub fn enemy_on_cooldown(&self, enemy: EnemyId, now: u64) -> bool {
        self.enemy_cooldowns.get(&enemy).is_some_and(|t| !t.expired(now))
    }

    /// True while the pair (self.owner, actor) is inside the suppression window
    pub fn actor_suppressed(&self, actor: ActorId, now: u64) -> bool {
        self.recently_hit_actors.get(&actor).is_some_and(|t| !t.expired(now))
    }

    /// Drop ledger entries that can no longer matter: expired windows, and
    /// cooldowns for enemies the registry no longer resolves.
    pub fn prune_ledgers(&mut self, now: u64, enemy_resolvable: impl Fn(EnemyId) -> bool) {
        self.enemy_cooldowns.retain(|id, t| !t.expired(now) && enemy_resolvable(*id));
        self.recently_hit_actors.retain(|_, t| !t.expired(now));
    }
}
