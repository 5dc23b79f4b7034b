//! Skill end conditions
//!
//! Four independent triggers, evaluated every tick. Timeout, stillness and
//! owner-despawn are polled here; the wrong-collision trigger is forced
//! directly by the collision resolver and never polled.

use crate::consts::MOVE_EPSILON;

use super::state::{EndReason, SkillState};
use super::world::World;

/// Poll the passive end conditions for one active skill instance.
///
/// Order matters only for the reported reason: a despawned owner wins over
/// a simultaneously expired timer.
pub fn check(state: &SkillState, world: &World, now: u64) -> Option<EndReason> {
    if !world.actor(state.owner).is_some_and(|a| a.alive) {
        return Some(EndReason::OwnerGone);
    }

    if state.skill_timer.expired(now) {
        return Some(EndReason::Timeout);
    }

    // Stillness: only once the player has actually acted, the initial stun
    // (or a freeze) is over, and the post-stun grace window has passed.
    // Final enhancement never auto-ends from standing still.
    if state.velocity.length() < MOVE_EPSILON
        && !state.is_waiting_to_recoil
        && state.stun_timer.expired(now)
        && now >= state.stun_grace_until
        && state.has_input
        && !state.is_final_enhancement
    {
        return Some(EndReason::Stillness);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::consts::SIM_DT;
    use crate::sim::state::ActorId;
    use crate::sim::timer::TickTimer;
    use crate::sim::world::Actor;

    fn setup() -> (SkillState, World) {
        let mut world = World::new();
        world.spawn_actor(Actor::new(ActorId(1), Vec2::ZERO));
        let mut state = SkillState::new(ActorId(1));
        state.skill_timer = TickTimer::started(0, 8.0, SIM_DT);
        (state, world)
    }

    #[test]
    fn test_timeout() {
        let (state, world) = setup();
        assert_eq!(check(&state, &world, 0), None);
        let end = crate::secs_to_ticks(8.0, SIM_DT);
        assert_eq!(check(&state, &world, end), Some(EndReason::Timeout));
    }

    #[test]
    fn test_owner_gone_wins() {
        let (state, mut world) = setup();
        world.actor_mut(ActorId(1)).unwrap().alive = false;
        let end = crate::secs_to_ticks(8.0, SIM_DT);
        assert_eq!(check(&state, &world, end), Some(EndReason::OwnerGone));
    }

    #[test]
    fn test_stillness_requires_input_history() {
        let (mut state, world) = setup();
        state.stun_grace_until = 10;

        // Never pressed a direction: stays active
        assert_eq!(check(&state, &world, 50), None);

        state.has_input = true;
        assert_eq!(check(&state, &world, 50), Some(EndReason::Stillness));
    }

    #[test]
    fn test_stillness_gated_on_stun_and_grace() {
        let (mut state, world) = setup();
        state.has_input = true;
        state.stun_timer = TickTimer::started(0, 0.4, SIM_DT);
        state.stun_grace_until = 60;

        assert_eq!(check(&state, &world, 10), None); // still stunned
        assert_eq!(check(&state, &world, 40), None); // in grace window
        assert_eq!(check(&state, &world, 60), Some(EndReason::Stillness));
    }

    #[test]
    fn test_stillness_skips_moving_frozen_and_final() {
        let (mut state, world) = setup();
        state.has_input = true;

        state.set_velocity(Vec2::new(3.0, 0.0));
        assert_eq!(check(&state, &world, 50), None);

        state.set_velocity(Vec2::ZERO);
        state.is_waiting_to_recoil = true;
        assert_eq!(check(&state, &world, 50), None);

        state.is_waiting_to_recoil = false;
        state.is_final_enhancement = true;
        assert_eq!(check(&state, &world, 50), None);
    }
}
