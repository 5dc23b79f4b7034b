//! Freeze → recoil sequencing after a front collision
//!
//! Two phases: a timed freeze with the actor pinned in place and its attack
//! collider off, then a launch that flings the actor along the stored recoil
//! direction and re-arms the collider.

use glam::Vec2;

use super::state::SkillState;
use crate::tuning::DashTuning;

/// Enter the freeze phase. The recoil direction is computed by the caller
/// ("away from the other actor", with fallbacks) and held until launch.
pub fn begin_freeze(state: &mut SkillState, tuning: &DashTuning, recoil_dir: Vec2, now: u64, dt: f32) {
    state.stun_timer.set(now, tuning.front_freeze_duration + tuning.grace_period, dt);
    state.set_velocity(Vec2::ZERO);
    state.is_waiting_to_recoil = true;
    state.pending_recoil_dir = recoil_dir;
    state.attack_collider_enabled = false;
}

/// Advance the sub-state by one tick. Returns true while still frozen, in
/// which case the caller must skip movement and collision processing for
/// this actor this tick.
pub fn tick_frozen(state: &mut SkillState, tuning: &DashTuning, now: u64, dt: f32) -> bool {
    if !state.is_waiting_to_recoil {
        return false;
    }

    if !state.stun_timer.expired(now) {
        // Pinned: no drift allowed while frozen
        state.set_velocity(Vec2::ZERO);
        return true;
    }

    // Launch
    let launch_vel = state.pending_recoil_dir * tuning.recoil_force;
    state.is_waiting_to_recoil = false;
    state.set_velocity(launch_vel);
    state.attack_collider_enabled = true;
    state.skill_timer.extend(now, tuning.recoil_time_extension, None, dt);
    state.pending_recoil_dir = Vec2::ZERO;
    // A fresh grace window follows this stun, same as the initial one, so
    // the recoil decelerating through zero cannot count as stillness
    state.stun_grace_until = now + crate::secs_to_ticks(tuning.grace_period, dt);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::ActorId;
    use crate::sim::timer::TickTimer;

    fn frozen_state(now: u64, tuning: &DashTuning) -> SkillState {
        let mut s = SkillState::new(ActorId(1));
        s.skill_timer = TickTimer::started(now, 4.0, SIM_DT);
        s.set_velocity(Vec2::new(5.0, 0.0));
        s.attack_collider_enabled = true;
        begin_freeze(&mut s, tuning, Vec2::NEG_X, now, SIM_DT);
        s
    }

    #[test]
    fn test_freeze_pins_and_disarms() {
        let tuning = DashTuning::default();
        let s = frozen_state(0, &tuning);
        assert_eq!(s.velocity, Vec2::ZERO);
        assert!(!s.is_moving);
        assert!(s.is_waiting_to_recoil);
        assert!(!s.attack_collider_enabled);
        assert_eq!(s.pending_recoil_dir, Vec2::NEG_X);
    }

    #[test]
    fn test_frozen_until_stun_expires() {
        let tuning = DashTuning::default();
        let mut s = frozen_state(0, &tuning);
        let freeze_ticks =
            crate::secs_to_ticks(tuning.front_freeze_duration + tuning.grace_period, SIM_DT);

        for now in 0..freeze_ticks {
            assert!(tick_frozen(&mut s, &tuning, now, SIM_DT));
            assert_eq!(s.velocity, Vec2::ZERO);
        }
        assert!(!tick_frozen(&mut s, &tuning, freeze_ticks, SIM_DT));
    }

    #[test]
    fn test_launch_applies_recoil_and_extension() {
        let tuning = DashTuning::default();
        let mut s = frozen_state(0, &tuning);
        let freeze_ticks =
            crate::secs_to_ticks(tuning.front_freeze_duration + tuning.grace_period, SIM_DT);
        let timer_before_launch = s.skill_timer.remaining(freeze_ticks);

        tick_frozen(&mut s, &tuning, freeze_ticks, SIM_DT);
        assert_eq!(s.velocity, Vec2::NEG_X * tuning.recoil_force);
        assert!(s.is_moving);
        assert!(!s.is_waiting_to_recoil);
        assert!(s.attack_collider_enabled);
        assert_eq!(s.pending_recoil_dir, Vec2::ZERO);
        assert_eq!(
            s.skill_timer.remaining(freeze_ticks),
            timer_before_launch + crate::secs_to_ticks(tuning.recoil_time_extension, SIM_DT)
        );
    }

    #[test]
    fn test_not_frozen_is_passthrough() {
        let tuning = DashTuning::default();
        let mut s = SkillState::new(ActorId(1));
        s.set_velocity(Vec2::new(3.0, 0.0));
        assert!(!tick_frozen(&mut s, &tuning, 0, SIM_DT));
        assert_eq!(s.velocity, Vec2::new(3.0, 0.0));
    }
}
