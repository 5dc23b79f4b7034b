//! Data-driven skill balance
//!
//! The parameter profile handed to the engine on activation. Loaded from
//! JSON so designers can retune without a rebuild; every field has a default
//! so partial profiles deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Full parameter profile for one dash-skill activation.
///
/// Durations are in seconds (quantized to whole ticks at the fixed dt when
/// applied), speeds in world units per second, angles in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    // === Movement ===
    /// Acceleration applied along the input intent (inertial regime)
    pub acceleration: f32,
    /// Deceleration applied when there is no input intent
    pub deceleration: f32,
    /// Hard cap on dash velocity magnitude, both regimes
    pub max_speed: f32,
    /// Base movement speed used by the final-enhancement direct regime
    pub base_move_speed: f32,
    /// Multiplier on `base_move_speed` while final enhancement is active
    pub enhancement_speed_multiplier: f32,

    // === Combat ===
    /// Radius of the per-tick overlap query around the owner
    pub attack_radius: f32,
    /// Damage dealt to an enemy at enhancement count 0
    pub base_damage: f32,
    /// Extra damage per enhancement count (pre-final formula)
    pub per_enhancement_damage: f32,
    /// Flat bonus replacing the per-count term once final enhancement is set
    pub final_enhancement_bonus: f32,
    /// Damage applied to the *owner* when ramming an enemy still on cooldown
    pub self_damage_on_cooldown: f32,
    /// Knockback speed applied to a damaged enemy
    pub knockback_force: f32,
    /// Max random angular offset applied to the knockback direction
    pub knockback_angle_jitter: f32,
    /// Seconds removed from the skill timer per enemy hit
    pub duration_cost_per_hit: f32,
    /// Re-hit suppression window per enemy id
    pub enemy_collision_cooldown: f32,

    // === Enhancement ===
    /// Enhancement count at which the final-enhancement latch engages
    pub enhancement_cap: u32,
    /// Seconds added to the skill timer per pre-cap enhancement
    pub duration_per_enhancement: f32,
    /// Ceiling on total remaining skill duration after an extension
    pub max_skill_duration: f32,
    /// Fixed skill duration granted when the latch engages
    pub final_enhancement_duration: f32,

    // === Lifecycle ===
    /// Base skill duration at activation
    pub skill_duration: f32,
    /// Initial stun after activation (cast lock)
    pub stun_duration: f32,
    /// Grace window after a stun before stillness can end the skill
    pub grace_period: f32,

    // === Pairing ===
    /// Max forward-direction dot product still counting as head-on
    pub heading_dot_threshold: f32,
    /// Full width of the field-of-view cone for the front test
    pub fov_cone_angle: f32,
    /// Freeze duration after a front collision (before recoil launch)
    pub front_freeze_duration: f32,
    /// Launch speed applied when the freeze expires
    pub recoil_force: f32,
    /// Seconds added to the skill timer on recoil launch
    pub recoil_time_extension: f32,
    /// Duration of the zero-move-speed debuff after a wrong collision
    pub wrong_collision_stun_duration: f32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            acceleration: 20.0,
            deceleration: 30.0,
            max_speed: 6.0,
            base_move_speed: 4.0,
            enhancement_speed_multiplier: 1.8,

            attack_radius: 1.2,
            base_damage: 10.0,
            per_enhancement_damage: 5.0,
            final_enhancement_bonus: 15.0,
            self_damage_on_cooldown: 3.0,
            knockback_force: 8.0,
            knockback_angle_jitter: 0.35,
            duration_cost_per_hit: 0.5,
            enemy_collision_cooldown: 1.0,

            enhancement_cap: 2,
            duration_per_enhancement: 2.0,
            max_skill_duration: 12.0,
            final_enhancement_duration: 6.0,

            skill_duration: 8.0,
            stun_duration: 0.4,
            grace_period: 0.6,

            heading_dot_threshold: 0.1,
            fov_cone_angle: std::f32::consts::FRAC_PI_2,
            front_freeze_duration: 0.5,
            recoil_force: 7.0,
            recoil_time_extension: 1.0,
            wrong_collision_stun_duration: 1.5,
        }
    }
}

impl DashTuning {
    /// Parse a profile from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A profile is usable when its movement numbers can actually move the
    /// owner. A degenerate profile makes the engine tick as a no-op rather
    /// than panic, so callers should check this at activation time.
    pub fn is_usable(&self) -> bool {
        self.max_speed > 0.0 && self.skill_duration > 0.0
    }

    /// Damage for one enemy hit at the given enhancement state.
    ///
    /// The two formulas are alternatives: once final enhancement is reached
    /// the per-count increment no longer applies.
    pub fn hit_damage(&self, enhancement_count: u32, is_final: bool) -> f32 {
        if is_final {
            self.base_damage + self.final_enhancement_bonus
        } else {
            self.base_damage + self.per_enhancement_damage * enhancement_count as f32
        }
    }
}
