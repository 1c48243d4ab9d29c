//! Target perception: distance, line of sight and visibility tracking.

use serde::{Deserialize, Serialize};
use warden_common::{Rect, Vec2};

use crate::collision::CollisionOracle;
use crate::constants::{MIN_SIGHT_SAMPLES, SIGHT_PROBE_SIZE, SIGHT_SAMPLE_SPACING};

/// What an agent perceived about the target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    /// Target center
    pub target_center: Vec2,
    /// Offset from the agent to the target center
    pub delta: Vec2,
    /// Straight-line distance to the target center
    pub distance: f32,
    /// In sight range with an unobstructed line of sight
    pub visible: bool,
}

/// Samples the segment between two points with small probes and reports
/// whether none of them touches an obstacle.
pub fn has_line_of_sight<C: CollisionOracle + ?Sized>(collision: &C, from: Vec2, to: Vec2) -> bool {
    let samples = ((from.distance(to) / SIGHT_SAMPLE_SPACING) as u32).max(MIN_SIGHT_SAMPLES);
    (1..=samples).all(|i| {
        let t = i as f32 / samples as f32;
        let probe = Rect::from_center(from.lerp(to, t), SIGHT_PROBE_SIZE, SIGHT_PROBE_SIZE);
        !collision.collides(&probe)
    })
}

/// Measures distance to the target and tests visibility.
///
/// The line of sight is only sampled when the target is within sight range.
pub fn perceive<C: CollisionOracle + ?Sized>(
    collision: &C,
    eye: Vec2,
    target: &Rect,
    sight_range: f32,
) -> Perception {
    let target_center = target.center();
    let delta = target_center - eye;
    let distance = delta.length();
    let visible = distance <= sight_range && has_line_of_sight(collision, eye, target_center);
    Perception {
        target_center,
        delta,
        distance,
        visible,
    }
}

/// How visibility changed since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightChange {
    /// Target is visible this tick
    Visible,
    /// Target was visible last tick and is not now
    JustLost,
    /// Target was already out of sight
    Hidden,
}

/// Remembers where and whether the target was last seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetTracker {
    last_seen: Option<Vec2>,
    has_seen: bool,
    visible: bool,
}

impl TargetTracker {
    /// Records this tick's perception.
    pub fn observe(&mut self, perception: &Perception) -> SightChange {
        let was_visible = self.visible;
        self.visible = perception.visible;
        if perception.visible {
            self.has_seen = true;
            self.last_seen = Some(perception.target_center);
            SightChange::Visible
        } else if was_visible {
            SightChange::JustLost
        } else {
            SightChange::Hidden
        }
    }

    /// Whether the target was visible on the last observation.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the target has ever been seen since the last reset.
    #[must_use]
    pub fn has_seen(&self) -> bool {
        self.has_seen
    }

    /// Last position where the target was seen.
    #[must_use]
    pub fn last_seen(&self) -> Option<Vec2> {
        self.last_seen
    }

    /// Forgets everything about the target.
    pub fn forget(&mut self) {
        *self = Self::default();
    }
}
