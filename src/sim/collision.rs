//! Per-tick collision resolution
//!
//! The tricky part of the dash skill: one spatial overlap query per tick
//! (never event-driven contacts), candidates classified as enemy / partner
//! actor / irrelevant, and all consequences applied from tick-stable state
//! so live simulation and rollback re-simulation agree bit for bit.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::enhance;
use super::recoil;
use super::state::{ActorId, EnemyId, SkillEvent, SkillState};
use super::timer::TickTimer;
use super::world::{Actor, EffectKind, OverlapHit, World};
use crate::consts::{MOVE_EPSILON, OVERLAP_TOLERANCE};
use crate::tuning::DashTuning;
use crate::{normalize_or, rotate_vec};

/// How an actor-vs-actor contact was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Head-on contact: rewarded with an enhancement and a recoil launch
    Front,
    /// Bad-angle contact: both skills end, both actors get the zero-speed debuff
    Wrong,
}

/// Per-tick context shared by one resolution pass
pub struct ResolveCtx<'a> {
    pub tuning: &'a DashTuning,
    pub now: u64,
    pub dt: f32,
    /// Engine seed; random draws mix this with the tick and the target id
    pub seed: u64,
}

/// Forward direction of one participant, via the fallback chain: world
/// velocity, then skill velocity, then last nonzero input, then the
/// sprite-facing flag.
pub fn forward_direction(actor: &Actor, state: &SkillState) -> Vec2 {
    if actor.vel.length() > MOVE_EPSILON {
        return actor.vel.normalize();
    }
    if state.velocity.length() > MOVE_EPSILON {
        return state.velocity.normalize();
    }
    if state.last_input_dir.length_squared() > 1e-6 {
        return state.last_input_dir;
    }
    actor.facing_dir()
}

/// Classify a contact between the acting instance and the other actor.
///
/// Front requires both the heading test (forward dot at or below the
/// threshold, i.e. converging or crossing, not chasing) and the
/// field-of-view test (other actor inside half the cone around the acting
/// instance's forward).
pub fn classify(
    acting_fwd: Vec2,
    other_fwd: Vec2,
    to_other: Vec2,
    tuning: &DashTuning,
) -> Pairing {
    if acting_fwd.dot(other_fwd) > tuning.heading_dot_threshold {
        return Pairing::Wrong;
    }

    let to_other = normalize_or(to_other, acting_fwd);
    let cos_half_cone = (tuning.fov_cone_angle / 2.0).cos();
    if acting_fwd.dot(to_other) < cos_half_cone {
        return Pairing::Wrong;
    }

    Pairing::Front
}

/// Recoil direction for one participant: away from the other actor, falling
/// back to the opposite of its last input, and finally straight up when the
/// two positions coincide.
pub fn recoil_direction(own_pos: Vec2, other_pos: Vec2, last_input: Vec2) -> Vec2 {
    let away = own_pos - other_pos;
    if away.length_squared() > 1e-6 {
        return away.normalize();
    }
    if last_input.length_squared() > 1e-6 {
        return -last_input;
    }
    Vec2::Y
}

/// Knockback direction for a damaged enemy: owner's motion, then last input,
/// then toward the target, then a fixed default.
fn knockback_direction(state: &SkillState, owner_pos: Vec2, target_pos: Vec2) -> Vec2 {
    if state.velocity.length() > MOVE_EPSILON {
        return state.velocity.normalize();
    }
    if state.last_input_dir.length_squared() > 1e-6 {
        return state.last_input_dir;
    }
    normalize_or(target_pos - owner_pos, Vec2::X)
}

/// Deterministic per-hit RNG: same seed, tick and target always draw the
/// same jitter, so rollback re-simulation reproduces every knockback.
fn hit_rng(seed: u64, now: u64, enemy: EnemyId) -> Pcg32 {
    let mixed = seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(now.wrapping_mul(2_654_435_761))
        .wrapping_add(enemy.0 as u64);
    Pcg32::seed_from_u64(mixed)
}

/// Run one collision pass for the acting instance.
///
/// `partners` holds the other pair member's state (the acting state is
/// temporarily detached by the engine, so both sides of a pair consequence
/// can be applied synchronously from here). Returns the partner id when a
/// wrong collision forces termination of both skills.
pub fn resolve(
    state: &mut SkillState,
    partners: &mut BTreeMap<ActorId, SkillState>,
    world: &mut World,
    ctx: &ResolveCtx,
    events: &mut Vec<SkillEvent>,
) -> Option<ActorId> {
    if !state.is_moving || !state.attack_collider_enabled {
        return None;
    }
    let Some(owner_pos) = world.actor(state.owner).map(|a| a.pos) else {
        log::debug!("collision: owner {:?} not resolvable, skipping pass", state.owner);
        return None;
    };

    let radius = ctx.tuning.attack_radius;
    for hit in world.overlap(owner_pos, radius) {
        match hit {
            OverlapHit::Enemy(id) => {
                resolve_enemy(state, world, ctx, owner_pos, id, events);
            }
            OverlapHit::Actor(id) => {
                if id == state.owner {
                    continue;
                }
                if let Some(partner) =
                    resolve_partner(state, partners, world, ctx, owner_pos, id, events)
                {
                    // Wrong collision ends the skill; drop remaining candidates
                    return Some(partner);
                }
            }
        }
    }

    None
}

fn resolve_enemy(
    state: &mut SkillState,
    world: &mut World,
    ctx: &ResolveCtx,
    owner_pos: Vec2,
    id: EnemyId,
    events: &mut Vec<SkillEvent>,
) {
    let tuning = ctx.tuning;
    let Some(enemy) = world.enemy(id) else {
        return;
    };
    if !enemy.alive {
        return;
    }
    // Broad phase may over-report; re-validate true distance
    if enemy.pos.distance(owner_pos) > tuning.attack_radius + OVERLAP_TOLERANCE {
        return;
    }

    if state.enemy_on_cooldown(id, ctx.now) {
        // Ramming the same target again hurts the owner instead
        world.damage_actor(state.owner, tuning.self_damage_on_cooldown);
        events.push(SkillEvent::SelfPunish {
            actor: state.owner,
            enemy: id,
            damage: tuning.self_damage_on_cooldown,
        });
        return;
    }

    let damage = tuning.hit_damage(state.enhancement_count, state.is_final_enhancement);
    let enemy_pos = enemy.pos;
    world.damage_enemy(id, damage);

    let base_dir = knockback_direction(state, owner_pos, enemy_pos);
    let jitter = tuning.knockback_angle_jitter;
    let offset = if jitter > 0.0 {
        hit_rng(ctx.seed, ctx.now, id).random_range(-jitter..=jitter)
    } else {
        0.0
    };
    world.knockback_enemy(id, rotate_vec(base_dir, offset) * tuning.knockback_force);

    state.skill_timer.reduce(tuning.duration_cost_per_hit, ctx.dt);
    state
        .enemy_cooldowns
        .insert(id, TickTimer::started(ctx.now, tuning.enemy_collision_cooldown, ctx.dt));

    events.push(SkillEvent::EnemyHit { actor: state.owner, enemy: id, damage });
}

/// Actor-vs-actor handling. Whichever side's query fires first applies BOTH
/// participants' consequences and both suppression entries, so the outcome
/// is applied exactly once regardless of detection order.
fn resolve_partner(
    state: &mut SkillState,
    partners: &mut BTreeMap<ActorId, SkillState>,
    world: &mut World,
    ctx: &ResolveCtx,
    owner_pos: Vec2,
    id: ActorId,
    events: &mut Vec<SkillEvent>,
) -> Option<ActorId> {
    let tuning = ctx.tuning;
    if state.actor_suppressed(id, ctx.now) {
        return None;
    }
    let Some(partner_state) = partners.get_mut(&id) else {
        // No active compatible skill on that actor
        return None;
    };
    if !partner_state.is_moving {
        return None;
    }
    let (Some(own_actor), Some(other_actor)) = (world.actor(state.owner), world.actor(id)) else {
        log::debug!("collision: pair member despawned mid-tick, skipping");
        return None;
    };
    if !other_actor.alive {
        return None;
    }
    let other_pos = other_actor.pos;
    if other_pos.distance(owner_pos) > tuning.attack_radius + OVERLAP_TOLERANCE {
        return None;
    }

    let acting_fwd = forward_direction(own_actor, state);
    let other_fwd = forward_direction(other_actor, partner_state);

    match classify(acting_fwd, other_fwd, other_pos - owner_pos, tuning) {
        Pairing::Front => {
            let count = enhance::next_count(state, tuning);
            if enhance::apply_enhancement(state, tuning, count, ctx.now, ctx.dt) {
                events.push(SkillEvent::FinalEnhancement { actor: state.owner });
            }
            if enhance::apply_enhancement(partner_state, tuning, count, ctx.now, ctx.dt) {
                events.push(SkillEvent::FinalEnhancement { actor: id });
            }

            let own_recoil = recoil_direction(owner_pos, other_pos, state.last_input_dir);
            let other_recoil = recoil_direction(other_pos, owner_pos, partner_state.last_input_dir);
            recoil::begin_freeze(state, tuning, own_recoil, ctx.now, ctx.dt);
            recoil::begin_freeze(partner_state, tuning, other_recoil, ctx.now, ctx.dt);

            suppress_pair(state, partner_state, id, ctx);
            events.push(SkillEvent::FrontCollision {
                initiator: state.owner,
                partner: id,
                count: state.enhancement_count,
            });
            None
        }
        Pairing::Wrong => {
            let duration = tuning.wrong_collision_stun_duration;
            world.apply_effect(state.owner, EffectKind::MoveSpeed, 0.0, duration, ctx.now, ctx.dt);
            world.apply_effect(id, EffectKind::MoveSpeed, 0.0, duration, ctx.now, ctx.dt);
            suppress_pair(state, partner_state, id, ctx);
            Some(id)
        }
    }
}

/// Register the pair in each other's suppression set, so the partner's own
/// query cannot re-trigger the outcome from the same contact. The window
/// covers the whole freeze phase plus the post-launch grace: the recoil
/// launch still overlaps the partner for a few ticks, and that separation
/// must never re-classify.
fn suppress_pair(
    state: &mut SkillState,
    partner_state: &mut SkillState,
    partner_id: ActorId,
    ctx: &ResolveCtx,
) {
    let window = ctx.tuning.front_freeze_duration + 2.0 * ctx.tuning.grace_period;
    let timer = TickTimer::started(ctx.now, window, ctx.dt);
    state.recently_hit_actors.insert(partner_id, timer);
    partner_state.recently_hit_actors.insert(state.owner, timer);
}
