//! Melee attack: frame-timed hit volume with one hit per swing.

use serde::{Deserialize, Serialize};
use warden_common::{Millis, Rect, Vec2};

use crate::constants::{MELEE_COOLDOWN_MS, MELEE_FRAME_INTERVAL_MS, MELEE_SPAWN_FRAME};
use crate::direction::Facing;
use crate::swing::Swing;
use crate::vitals::Cooldown;

/// A hit volume produced at the spawn frame of a swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeStrike {
    /// Area covered by the strike
    pub volume: Rect,
    /// Whether the target was hit (at most once per swing)
    pub hit: bool,
}

/// Hit volume geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeleeReach {
    /// Side of the square volume
    pub size: f32,
    /// Distance of the volume center from the body center along each facing axis
    pub offset: f32,
}

impl MeleeReach {
    /// Volume for an agent at `center` facing `facing`.
    #[must_use]
    pub fn volume(&self, center: Vec2, facing: Facing) -> Rect {
        let (ox, oy) = facing.unit_offset();
        Rect::from_center(
            center + Vec2::new(ox, oy) * self.offset,
            self.size,
            self.size,
        )
    }
}

/// Melee swing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeleeAttack {
    swing: Swing,
    damage_applied: bool,
    cooldown: Cooldown,
    #[serde(skip)]
    hitbox: Option<Rect>,
}

impl Default for MeleeAttack {
    fn default() -> Self {
        Self {
            swing: Swing::default(),
            damage_applied: false,
            cooldown: Cooldown::new(MELEE_COOLDOWN_MS),
            hitbox: None,
        }
    }
}

impl MeleeAttack {
    /// Whether a swing is playing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.swing.is_active()
    }

    /// Whether a new swing may start.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.swing.is_active() && !self.cooldown.is_active()
    }

    /// Starts a swing and its cooldown.
    pub fn start(&mut self, now: Millis) {
        self.swing.start(now);
        self.damage_applied = false;
        self.cooldown.trigger(now);
    }

    /// Advances the swing. At the spawn frame builds the hit volume and
    /// reports whether it lands on the target.
    pub fn update(
        &mut self,
        now: Millis,
        total_frames: u8,
        center: Vec2,
        facing: Facing,
        reach: &MeleeReach,
        target: &Rect,
    ) -> Option<MeleeStrike> {
        let progress = self
            .swing
            .advance(now, MELEE_FRAME_INTERVAL_MS, total_frames, MELEE_SPAWN_FRAME);

        let strike = progress.spawn.then(|| {
            let volume = reach.volume(center, facing);
            let hit = !self.damage_applied && volume.overlaps(target);
            self.damage_applied |= hit;
            self.hitbox = Some(volume);
            MeleeStrike { volume, hit }
        });

        if progress.finished {
            self.damage_applied = false;
        }
        strike
    }

    /// Clears the cooldown flag once it has elapsed.
    pub fn update_cooldown(&mut self, now: Millis) {
        self.cooldown.update(now);
    }

    /// Time of the last swing.
    #[must_use]
    pub fn last_trigger(&self) -> Option<Millis> {
        self.cooldown.last_trigger()
    }

    /// Pending hit volume, if one was produced this tick.
    #[must_use]
    pub fn hitbox(&self) -> Option<Rect> {
        self.hitbox
    }

    /// Returns and clears the pending hit volume.
    pub fn take_hitbox(&mut self) -> Option<Rect> {
        self.hitbox.take()
    }

    /// Drops a stale hit volume.
    pub fn clear_hitbox(&mut self) {
        self.hitbox = None;
    }

    /// Cancels the swing and forgets the cooldown.
    pub fn reset(&mut self) {
        self.swing.cancel();
        self.damage_applied = false;
        self.cooldown.reset();
        self.hitbox = None;
    }

    /// Cancels the swing, keeping the cooldown.
    pub fn cancel(&mut self) {
        self.swing.cancel();
        self.damage_applied = false;
        self.hitbox = None;
    }
}
