//! Tick-quantized countdown timers
//!
//! Every duration in the skill engine is "expires at tick T", never a
//! wall-clock instant, so re-simulating a past tick sees the same remaining
//! time it saw the first time.

use serde::{Deserialize, Serialize};

use crate::secs_to_ticks;

/// A countdown that expires at an absolute simulation tick.
///
/// A cleared timer reports expired at every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTimer {
    expires_at: u64,
}

impl TickTimer {
    /// Start a countdown of `secs` seconds from tick `now`
    pub fn set(&mut self, now: u64, secs: f32, dt: f32) {
        self.expires_at = now + secs_to_ticks(secs, dt);
    }

    /// Construct an already-running countdown
    pub fn started(now: u64, secs: f32, dt: f32) -> Self {
        let mut t = Self::default();
        t.set(now, secs, dt);
        t
    }

    /// Add `secs` to the remaining time, optionally capping the remaining
    /// duration at `max_secs` from `now`
    pub fn extend(&mut self, now: u64, secs: f32, max_secs: Option<f32>, dt: f32) {
        let base = self.expires_at.max(now);
        let mut expires = base + secs_to_ticks(secs, dt);
        if let Some(max) = max_secs {
            expires = expires.min(now + secs_to_ticks(max, dt));
        }
        self.expires_at = expires;
    }

    /// Remove `secs` from the remaining time, saturating at expiry
    pub fn reduce(&mut self, secs: f32, dt: f32) {
        self.expires_at = self.expires_at.saturating_sub(secs_to_ticks(secs, dt));
    }

    /// Force the timer to a fixed remaining duration, discarding what was left
    pub fn reset(&mut self, now: u64, secs: f32, dt: f32) {
        self.set(now, secs, dt);
    }

    pub fn clear(&mut self) {
        self.expires_at = 0;
    }

    pub fn expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// Remaining whole ticks at tick `now`
    pub fn remaining(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}
