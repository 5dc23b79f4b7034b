//! Per-tick movement model
//!
//! Two mutually exclusive regimes: inertial (accelerate/decelerate toward
//! the input intent) and the final-enhancement direct-follow regime where
//! velocity tracks the intent with no inertia at all.

use glam::Vec2;

use super::state::SkillState;
use crate::tuning::DashTuning;

/// Advance the dash velocity by one tick from the input intent.
///
/// `intent` is the raw per-tick input vector, `(0,0)` when idle. The
/// resulting velocity is always clamped to `max_speed` and `is_moving` is
/// recomputed from the result.
pub fn apply_movement(state: &mut SkillState, tuning: &DashTuning, intent: Vec2, dt: f32) {
    if !tuning.is_usable() {
        log::warn!("movement: degenerate tuning profile, skill is inert this tick");
        return;
    }

    let has_intent = intent.length_squared() > 1e-6;
    if has_intent {
        state.last_input_dir = intent.normalize();
        state.has_input = true;
    }

    let mut vel = if state.is_final_enhancement {
        // Direct follow: no inertia in either direction
        if has_intent {
            intent.normalize() * tuning.base_move_speed * tuning.enhancement_speed_multiplier
        } else {
            Vec2::ZERO
        }
    } else if has_intent {
        state.velocity + intent.normalize() * tuning.acceleration * dt
    } else {
        // Decelerate along the current heading; snap handled by set_velocity
        let speed = state.velocity.length();
        if speed <= tuning.deceleration * dt {
            Vec2::ZERO
        } else {
            state.velocity - state.velocity / speed * tuning.deceleration * dt
        }
    };

    if vel.length() > tuning.max_speed {
        vel = vel.normalize() * tuning.max_speed;
    }

    state.set_velocity(vel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::ActorId;

    fn fresh_state() -> SkillState {
        SkillState::new(ActorId(1))
    }

    #[test]
    fn test_acceleration_reaches_clamp() {
        // max_speed=6, acceleration=20: 20*t >= 6 at t=0.3s, so half a
        // second of constant input must sit exactly at the clamp
        let tuning = DashTuning { max_speed: 6.0, acceleration: 20.0, ..Default::default() };
        let mut state = fresh_state();

        let ticks = (0.5 / SIM_DT) as u32;
        for _ in 0..ticks {
            apply_movement(&mut state, &tuning, Vec2::X, SIM_DT);
        }
        assert!((state.velocity.length() - 6.0).abs() < 1e-4);
        assert!(state.is_moving);
        assert!(state.has_input);
    }

    #[test]
    fn test_deceleration_snaps_to_zero() {
        let tuning = DashTuning::default();
        let mut state = fresh_state();
        state.set_velocity(Vec2::new(2.0, 0.0));

        for _ in 0..120 {
            apply_movement(&mut state, &tuning, Vec2::ZERO, SIM_DT);
        }
        assert_eq!(state.velocity, Vec2::ZERO);
        assert!(!state.is_moving);
        // Idle ticks never count as input
        assert!(!state.has_input);
    }

    #[test]
    fn test_final_regime_is_direct() {
        let tuning = DashTuning::default();
        let mut state = fresh_state();
        state.is_final_enhancement = true;

        apply_movement(&mut state, &tuning, Vec2::Y, SIM_DT);
        let expected =
            (tuning.base_move_speed * tuning.enhancement_speed_multiplier).min(tuning.max_speed);
        assert!((state.velocity.length() - expected).abs() < 1e-5);
        assert_eq!(state.last_input_dir, Vec2::Y);

        // Releasing input drops velocity immediately, no coast-down
        apply_movement(&mut state, &tuning, Vec2::ZERO, SIM_DT);
        assert_eq!(state.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_final_regime_clamped_to_max_speed() {
        let tuning = DashTuning {
            base_move_speed: 10.0,
            enhancement_speed_multiplier: 2.0,
            max_speed: 6.0,
            ..Default::default()
        };
        let mut state = fresh_state();
        state.is_final_enhancement = true;

        apply_movement(&mut state, &tuning, Vec2::X, SIM_DT);
        assert!((state.velocity.length() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_tuning_is_inert() {
        let tuning = DashTuning { max_speed: 0.0, ..Default::default() };
        let mut state = fresh_state();
        apply_movement(&mut state, &tuning, Vec2::X, SIM_DT);
        assert_eq!(state.velocity, Vec2::ZERO);
        assert!(!state.has_input);
    }
}
