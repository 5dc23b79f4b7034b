//! Typed entity registry and the collaborator primitives the skill consumes
//!
//! Replaces component-lookup chains with a single registry keyed by stable
//! entity ids. The overlap query is a pure function of tick-stable state and
//! always reports candidates in ascending id order.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ActorId, EnemyId};
use super::timer::TickTimer;

/// Timed debuff kinds applied through the effect primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Movement speed forced to `magnitude` (zero for the wrong-collision stun)
    MoveSpeed,
}

/// One applied timed effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub magnitude: f32,
    pub until: TickTimer,
}

/// Gameplay-relevant facet of a player actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sprite-facing flag, last resort of the forward-direction fallback chain
    pub facing_left: bool,
    pub alive: bool,
    pub hp: f32,
    #[serde(default)]
    pub effects: Vec<ActiveEffect>,
}

impl Actor {
    pub fn new(id: ActorId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            facing_left: false,
            alive: true,
            hp: 100.0,
            effects: Vec::new(),
        }
    }

    /// Facing direction derived from the left/right flag
    pub fn facing_dir(&self) -> Vec2 {
        if self.facing_left { Vec2::NEG_X } else { Vec2::X }
    }

    /// Current move-speed override, if a MoveSpeed effect is active
    pub fn move_speed_override(&self, now: u64) -> Option<f32> {
        self.effects
            .iter()
            .find(|e| e.kind == EffectKind::MoveSpeed && !e.until.expired(now))
            .map(|e| e.magnitude)
    }
}

/// Gameplay-relevant facet of a hostile non-player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(id: EnemyId, pos: Vec2, hp: f32) -> Self {
        Self { id, pos, vel: Vec2::ZERO, hp, alive: true }
    }
}

/// A candidate returned by the overlap query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverlapHit {
    Enemy(EnemyId),
    Actor(ActorId),
}

/// Authoritative world registry shared by the whole simulation.
///
/// Ordered maps keep every enumeration deterministic under rollback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub actors: BTreeMap<ActorId, Actor>,
    pub enemies: BTreeMap<EnemyId, Enemy>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_actor(&mut self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }

    pub fn spawn_enemy(&mut self, enemy: Enemy) {
        self.enemies.insert(enemy.id, enemy);
    }

    /// Spatial overlap query: every live entity within `radius` of `pos`,
    /// enemies first, then actors, each in ascending id order. May slightly
    /// over-report; callers re-validate true distance.
    pub fn overlap(&self, pos: Vec2, radius: f32) -> Vec<OverlapHit> {
        let r2 = radius * radius;
        let mut hits: Vec<OverlapHit> = self
            .enemies
            .values()
            .filter(|e| e.alive && e.pos.distance_squared(pos) <= r2)
            .map(|e| OverlapHit::Enemy(e.id))
            .collect();
        hits.extend(
            self.actors
                .values()
                .filter(|a| a.alive && a.pos.distance_squared(pos) <= r2)
                .map(|a| OverlapHit::Actor(a.id)),
        );
        hits
    }

    /// Damage primitive. Idempotent no-op when the target is gone or dead.
    pub fn damage_enemy(&mut self, id: EnemyId, amount: f32) {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            log::debug!("damage_enemy: enemy {id:?} not resolvable, dropping");
            return;
        };
        if !enemy.alive {
            return;
        }
        enemy.hp -= amount;
        if enemy.hp <= 0.0 {
            enemy.hp = 0.0;
            enemy.alive = false;
            enemy.vel = Vec2::ZERO;
        }
    }

    /// Damage primitive for actors (self-punishment path). Clamped at zero;
    /// the dash never kills its own owner.
    pub fn damage_actor(&mut self, id: ActorId, amount: f32) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.hp = (actor.hp - amount).max(0.0);
        }
    }

    /// Knockback/velocity-set primitive on an enemy
    pub fn knockback_enemy(&mut self, id: EnemyId, vel: Vec2) {
        if let Some(enemy) = self.enemies.get_mut(&id) {
            if enemy.alive {
                enemy.vel = vel;
            }
        }
    }

    /// Timed-debuff primitive. Re-applying a kind replaces the prior instance.
    pub fn apply_effect(
        &mut self,
        id: ActorId,
        kind: EffectKind,
        magnitude: f32,
        duration_secs: f32,
        now: u64,
        dt: f32,
    ) {
        let Some(actor) = self.actors.get_mut(&id) else {
            log::debug!("apply_effect: actor {id:?} not resolvable, dropping");
            return;
        };
        actor.effects.retain(|e| e.kind != kind);
        actor.effects.push(ActiveEffect {
            kind,
            magnitude,
            until: TickTimer::started(now, duration_secs, dt),
        });
    }

    /// Drop expired effects, once per tick
    pub fn expire_effects(&mut self, now: u64) {
        for actor in self.actors.values_mut() {
            actor.effects.retain(|e| !e.until.expired(now));
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn enemy_resolvable(&self, id: EnemyId) -> bool {
        self.enemies.get(&id).is_some_and(|e| e.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn world_with_entities() -> World {
        let mut w = World::new();
        w.spawn_actor(Actor::new(ActorId(1), Vec2::ZERO));
        w.spawn_actor(Actor::new(ActorId(2), Vec2::new(1.0, 0.0)));
        w.spawn_enemy(Enemy::new(EnemyId(10), Vec2::new(0.5, 0.0), 20.0));
        w.spawn_enemy(Enemy::new(EnemyId(11), Vec2::new(50.0, 0.0), 20.0));
        w
    }

    #[test]
    fn test_overlap_orders_enemies_then_actors() {
        let w = world_with_entities();
        let hits = w.overlap(Vec2::ZERO, 2.0);
        assert_eq!(
            hits,
            vec![
                OverlapHit::Enemy(EnemyId(10)),
                OverlapHit::Actor(ActorId(1)),
                OverlapHit::Actor(ActorId(2)),
            ]
        );
    }

    #[test]
    fn test_overlap_skips_dead() {
        let mut w = world_with_entities();
        w.enemies.get_mut(&EnemyId(10)).unwrap().alive = false;
        let hits = w.overlap(Vec2::ZERO, 2.0);
        assert!(!hits.contains(&OverlapHit::Enemy(EnemyId(10))));
    }

    #[test]
    fn test_damage_enemy_idempotent_on_dead() {
        let mut w = world_with_entities();
        w.damage_enemy(EnemyId(10), 25.0);
        assert!(!w.enemy(EnemyId(10)).unwrap().alive);
        assert_eq!(w.enemy(EnemyId(10)).unwrap().hp, 0.0);

        // Further damage is a no-op
        w.damage_enemy(EnemyId(10), 25.0);
        assert_eq!(w.enemy(EnemyId(10)).unwrap().hp, 0.0);

        // Missing target is a no-op
        w.damage_enemy(EnemyId(99), 5.0);
    }

    #[test]
    fn test_effect_apply_replace_expire() {
        let mut w = world_with_entities();
        w.apply_effect(ActorId(1), EffectKind::MoveSpeed, 0.0, 1.0, 0, SIM_DT);
        assert_eq!(w.actor(ActorId(1)).unwrap().move_speed_override(30), Some(0.0));

        // Re-application replaces, not stacks
        w.apply_effect(ActorId(1), EffectKind::MoveSpeed, 2.0, 1.0, 30, SIM_DT);
        assert_eq!(w.actor(ActorId(1)).unwrap().effects.len(), 1);
        assert_eq!(w.actor(ActorId(1)).unwrap().move_speed_override(60), Some(2.0));

        w.expire_effects(200);
        assert!(w.actor(ActorId(1)).unwrap().effects.is_empty());
    }
}
