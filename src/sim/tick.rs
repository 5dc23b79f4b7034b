//! Fixed timestep skill engine
//!
//! Composition root: owns one `SkillState` per activated pair member and
//! advances them in a fixed order each tick. This is the only entry point
//! external callers invoke; everything else in `sim` is orchestrated here.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, ResolveCtx};
use super::movement;
use super::recoil;
use super::state::{ActorId, EndReason, SkillEvent, SkillState};
use super::termination;
use super::world::World;
use crate::secs_to_ticks;
use crate::tuning::DashTuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Per-actor input intent vectors; absent means no input this tick.
    /// Ordered map so local multi-actor scenarios replay identically.
    pub intents: BTreeMap<ActorId, Vec2>,
}

impl TickInput {
    pub fn with_intent(mut self, actor: ActorId, intent: Vec2) -> Self {
        self.intents.insert(actor, intent);
        self
    }

    pub fn intent_for(&self, actor: ActorId) -> Vec2 {
        self.intents.get(&actor).copied().unwrap_or(Vec2::ZERO)
    }
}

/// The dash combination skill engine for one activated actor pair.
///
/// Created by the magic-combination layer when two actors' elements resolve
/// to the dash skill; destroyed implicitly once both activations have ended.
/// Serializable so the authoritative host can snapshot it around rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashEngine {
    seed: u64,
    tuning: DashTuning,
    time_ticks: u64,
    states: BTreeMap<ActorId, SkillState>,
}

impl DashEngine {
    pub fn new(seed: u64, tuning: DashTuning) -> Self {
        if !tuning.is_usable() {
            log::warn!("dash engine created with degenerate tuning; skill will be inert");
        }
        Self { seed, tuning, time_ticks: 0, states: BTreeMap::new() }
    }

    /// Activate the skill for one pair member. Returns false when that actor
    /// already holds an active instance.
    pub fn activate(&mut self, owner: ActorId) -> bool {
        if self.states.contains_key(&owner) {
            log::debug!("activate: {owner:?} already active, ignoring");
            return false;
        }

        let now = self.time_ticks;
        let dt = crate::consts::SIM_DT;
        let mut state = SkillState::new(owner);
        state.skill_timer.set(now, self.tuning.skill_duration, dt);
        state.stun_timer.set(now, self.tuning.stun_duration, dt);
        state.stun_grace_until = now
            + secs_to_ticks(self.tuning.stun_duration, dt)
            + secs_to_ticks(self.tuning.grace_period, dt);

        log::info!("dash activated for {owner:?} at tick {now}");
        self.states.insert(owner, state);
        true
    }

    /// Advance every active instance by one fixed timestep.
    ///
    /// Per-actor phase order: termination pre-check, freeze/recoil, movement,
    /// position integration, collision, termination post-check, ledger
    /// pruning. Actors run in ascending id order; both orders are fixed so
    /// rollback re-simulation cannot diverge.
    pub fn tick(&mut self, world: &mut World, input: &TickInput, dt: f32) -> Vec<SkillEvent> {
        let now = self.time_ticks;
        let mut events = Vec::new();

        world.expire_effects(now);

        let ids: Vec<ActorId> = self.states.keys().copied().collect();
        for id in ids {
            // May have been terminated as the partner of a wrong collision
            let Some(mut state) = self.states.remove(&id) else {
                continue;
            };

            // Termination pre-check
            if let Some(reason) = termination::check(&state, world, now) {
                self.finish(state, reason, world, &mut events);
                continue;
            }

            // Freeze -> recoil sub-state
            let frozen = recoil::tick_frozen(&mut state, &self.tuning, now, dt);

            // Initial cast lock: no movement or collision until it expires
            let cast_locked = !frozen && !state.stun_timer.expired(now);

            if !frozen && !cast_locked {
                state.attack_collider_enabled = true;
                movement::apply_movement(&mut state, &self.tuning, input.intent_for(id), dt);
            } else if cast_locked {
                state.set_velocity(Vec2::ZERO);
            }

            // The skill drives the owner while active
            if let Some(actor) = world.actor_mut(id) {
                actor.vel = state.velocity;
                actor.pos += state.velocity * dt;
            }

            let wrong_partner = if !frozen && !cast_locked {
                let ctx = ResolveCtx { tuning: &self.tuning, now, dt, seed: self.seed };
                collision::resolve(&mut state, &mut self.states, world, &ctx, &mut events)
            } else {
                None
            };

            if let Some(partner) = wrong_partner {
                // Forced path: both participants end within this tick
                self.finish(state, EndReason::WrongCollision, world, &mut events);
                if let Some(partner_state) = self.states.remove(&partner) {
                    self.finish(partner_state, EndReason::WrongCollision, world, &mut events);
                }
                continue;
            }

            // Termination post-check
            if let Some(reason) = termination::check(&state, world, now) {
                self.finish(state, reason, world, &mut events);
                continue;
            }

            state.prune_ledgers(now, |e| world.enemy_resolvable(e));
            self.states.insert(id, state);
        }

        self.time_ticks += 1;
        events
    }

    /// Tear down one instance: zero the owner's simulated velocity and emit
    /// the deactivation notification for the activation layer.
    fn finish(
        &mut self,
        state: SkillState,
        reason: EndReason,
        world: &mut World,
        events: &mut Vec<SkillEvent>,
    ) {
        if let Some(actor) = world.actor_mut(state.owner) {
            actor.vel = Vec2::ZERO;
        }
        log::info!("dash ended for {:?}: {reason:?}", state.owner);
        events.push(SkillEvent::Ended { actor: state.owner, reason });
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn is_active(&self, actor: ActorId) -> bool {
        self.states.contains_key(&actor)
    }

    /// Read-only state access for non-authoritative consumers (sprite and
    /// camera selection read `enhancement_count` / `is_final_enhancement`)
    pub fn state(&self, actor: ActorId) -> Option<&SkillState> {
        self.states.get(&actor)
    }

    pub fn tuning(&self) -> &DashTuning {
        &self.tuning
    }
}
