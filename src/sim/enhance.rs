//! Enhancement negotiation between the two pair members
//!
//! One front collision banks exactly one increment, and both participants
//! must end the tick holding the same count. The initiator computes the new
//! count and propagates it; each side applies it through the same path.

use super::state::SkillState;
use crate::tuning::DashTuning;

/// Apply a negotiated enhancement count to one instance.
///
/// Clamps to `[current, cap]` (a participant never loses banked count) and
/// handles the timer side effects: reaching the cap engages the one-way
/// final-enhancement latch and resets the skill timer to the fixed final
/// duration; below the cap the timer is extended, capped at the configured
/// maximum total duration.
///
/// Returns true when the latch engaged on this call. No-op once the
/// instance is already final.
pub fn apply_enhancement(
    state: &mut SkillState,
    tuning: &DashTuning,
    new_count: u32,
    now: u64,
    dt: f32,
) -> bool {
    if state.is_final_enhancement {
        return false;
    }

    let clamped = new_count.min(tuning.enhancement_cap).max(state.enhancement_count);
    if clamped == state.enhancement_count && clamped < tuning.enhancement_cap {
        return false;
    }
    state.enhancement_count = clamped;

    if clamped >= tuning.enhancement_cap {
        state.is_final_enhancement = true;
        state.skill_timer.reset(now, tuning.final_enhancement_duration, dt);
        log::info!("actor {:?}: final enhancement engaged", state.owner);
        true
    } else {
        state.skill_timer.extend(
            now,
            tuning.duration_per_enhancement,
            Some(tuning.max_skill_duration),
            dt,
        );
        false
    }
}

/// Count the initiator proposes for a fresh front collision
pub fn next_count(state: &SkillState, tuning: &DashTuning) -> u32 {
    (state.enhancement_count + 1).min(tuning.enhancement_cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::ActorId;
    use crate::sim::timer::TickTimer;

    fn state_with_timer(secs: f32) -> SkillState {
        let mut s = SkillState::new(ActorId(1));
        s.skill_timer = TickTimer::started(0, secs, SIM_DT);
        s
    }

    #[test]
    fn test_increment_extends_timer() {
        let tuning = DashTuning::default();
        let mut s = state_with_timer(5.0);

        let latched = apply_enhancement(&mut s, &tuning, 1, 0, SIM_DT);
        assert!(!latched);
        assert_eq!(s.enhancement_count, 1);
        assert!(!s.is_final_enhancement);
        // 5s + 2s per enhancement
        assert_eq!(s.skill_timer.remaining(0), crate::secs_to_ticks(7.0, SIM_DT));
    }

    #[test]
    fn test_extension_clamped_to_max_duration() {
        let tuning = DashTuning {
            enhancement_cap: 10,
            duration_per_enhancement: 100.0,
            max_skill_duration: 12.0,
            ..Default::default()
        };
        let mut s = state_with_timer(5.0);
        apply_enhancement(&mut s, &tuning, 1, 0, SIM_DT);
        assert_eq!(s.skill_timer.remaining(0), crate::secs_to_ticks(12.0, SIM_DT));
    }

    #[test]
    fn test_cap_engages_latch_and_resets_timer() {
        let tuning = DashTuning::default(); // cap 2, final duration 6s
        let mut s = state_with_timer(11.0);
        s.enhancement_count = 1;

        let latched = apply_enhancement(&mut s, &tuning, 2, 0, SIM_DT);
        assert!(latched);
        assert!(s.is_final_enhancement);
        assert_eq!(s.enhancement_count, 2);
        // Reset overrides the longer remaining time, not extends it
        assert_eq!(s.skill_timer.remaining(0), crate::secs_to_ticks(6.0, SIM_DT));
    }

    #[test]
    fn test_noop_once_final() {
        let tuning = DashTuning::default();
        let mut s = state_with_timer(6.0);
        s.enhancement_count = 2;
        s.is_final_enhancement = true;

        let before = s.skill_timer;
        assert!(!apply_enhancement(&mut s, &tuning, 5, 0, SIM_DT));
        assert_eq!(s.enhancement_count, 2);
        assert_eq!(s.skill_timer, before);
    }

    #[test]
    fn test_count_never_decreases() {
        let tuning = DashTuning { enhancement_cap: 5, ..Default::default() };
        let mut s = state_with_timer(5.0);
        s.enhancement_count = 3;

        apply_enhancement(&mut s, &tuning, 1, 0, SIM_DT);
        assert_eq!(s.enhancement_count, 3);
    }

    #[test]
    fn test_next_count_clamps_at_cap() {
        let tuning = DashTuning::default();
        let mut s = state_with_timer(5.0);
        assert_eq!(next_count(&s, &tuning), 1);
        s.enhancement_count = 2;
        assert_eq!(next_count(&s, &tuning), 2);
    }
}
