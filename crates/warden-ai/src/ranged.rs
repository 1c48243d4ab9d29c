//! Ranged attack: mana-costed, frame-timed projectile spawning and kiting.

use serde::{Deserialize, Serialize};
use warden_common::{unit_or_default, Millis, Vec2};

use crate::config::CombatRanges;
use crate::constants::{KITE_SPEED_FACTOR, RANGE_COOLDOWN_MS, RANGE_FRAME_INTERVAL_MS};
use crate::swing::{Swing, SwingProgress};
use crate::vitals::Cooldown;

/// Frame at which the projectile leaves.
///
/// An explicit override is honored when it falls inside the animation;
/// otherwise frame 3 for four-frame animations and frame 4 for the rest.
#[must_use]
pub fn spawn_frame(total_frames: u8, override_frame: Option<u8>) -> u8 {
    match override_frame {
        Some(frame) if frame < total_frames => frame,
        _ if total_frames == 4 => 3,
        _ => 4,
    }
}

/// Velocity that keeps a ranged-only agent inside its firing band.
///
/// Backs away when closer than the middle of the band, closes in when beyond
/// the outer edge, and strafes around the target otherwise.
#[must_use]
pub fn kiting_velocity(delta: Vec2, distance: f32, ranges: &CombatRanges, speed: f32) -> Vec2 {
    let optimal = (ranges.range_enter + ranges.range_exit) / 2.0;
    let toward = unit_or_default(delta);

    if distance < optimal {
        -toward * speed * KITE_SPEED_FACTOR
    } else if distance > ranges.range_enter {
        toward * speed
    } else {
        toward.perp() * speed * KITE_SPEED_FACTOR
    }
}

/// Ranged attack state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeAttack {
    swing: Swing,
    cooldown: Cooldown,
}

impl Default for RangeAttack {
    fn default() -> Self {
        Self {
            swing: Swing::default(),
            cooldown: Cooldown::new(RANGE_COOLDOWN_MS),
        }
    }
}

impl RangeAttack {
    /// Whether an attack is playing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.swing.is_active()
    }

    /// Whether a new attack may start (mana is checked by the caller).
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.swing.is_active() && !self.cooldown.is_active()
    }

    /// Starts an attack and its cooldown. Mana must already be spent.
    pub fn start(&mut self, now: Millis) {
        self.swing.start(now);
        self.cooldown.trigger(now);
    }

    /// Advances the animation; `spawn` is set on the tick the projectile
    /// should be created.
    pub fn update(&mut self, now: Millis, total_frames: u8, override_frame: Option<u8>) -> SwingProgress {
        let spawn_at = spawn_frame(total_frames, override_frame);
        self.swing
            .advance(now, RANGE_FRAME_INTERVAL_MS, total_frames, spawn_at)
    }

    /// Clears the cooldown flag once it has elapsed.
    pub fn update_cooldown(&mut self, now: Millis) {
        self.cooldown.update(now);
    }

    /// Cancels the attack and forgets the cooldown.
    pub fn reset(&mut self) {
        self.swing.cancel();
        self.cooldown.reset();
    }

    /// Cancels the attack, keeping the cooldown.
    pub fn cancel(&mut self) {
        self.swing.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranged_only() -> CombatRanges {
        CombatRanges {
            sight: 300.0,
            melee_enter: 0.0,
            melee_exit: 0.0,
            range_enter: 200.0,
            range_exit: 150.0,
        }
    }

    #[test]
    fn test_spawn_frame_rules() {
        assert_eq!(spawn_frame(4, None), 3);
        assert_eq!(spawn_frame(8, None), 4);
        assert_eq!(spawn_frame(5, Some(5)), 4);
        assert_eq!(spawn_frame(6, Some(5)), 5);
        assert_eq!(spawn_frame(4, Some(3)), 3);
        assert_eq!(spawn_frame(4, Some(9)), 3);
    }

    #[test]
    fn test_kiting_moves_away_when_close() {
        let delta = Vec2::new(100.0, 0.0);
        let v = kiting_velocity(delta, 100.0, &ranged_only(), 1.5);
        assert!(v.x < 0.0);
        assert!((v.length() - 1.5 * KITE_SPEED_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn test_kiting_closes_in_when_far() {
        let v = kiting_velocity(Vec2::new(0.0, 250.0), 250.0, &ranged_only(), 1.5);
        assert!((v - Vec2::new(0.0, 1.5)).length() < 1e-5);
    }

    #[test]
    fn test_kiting_strafes_in_band() {
        let v = kiting_velocity(Vec2::new(180.0, 0.0), 180.0, &ranged_only(), 1.5);
        assert!(v.x.abs() < 1e-5);
        assert!(v.y.abs() > 0.0);
    }

    #[test]
    fn test_projectile_spawns_at_computed_frame() {
        let mut range = RangeAttack::default();
        assert!(range.is_ready());
        range.start(Millis::ZERO);

        let mut spawned_at = None;
        for t in 1..=8u64 {
            let progress = range.update(Millis::new(t * 200), 8, Some(5));
            if progress.spawn {
                spawned_at = Some(t);
            }
        }
        assert_eq!(spawned_at, Some(5));
        assert!(!range.is_active());

        range.update_cooldown(Millis::new(2_000));
        assert!(!range.is_ready());
        range.update_cooldown(Millis::new(2_001));
        assert!(range.is_ready());
    }
}
