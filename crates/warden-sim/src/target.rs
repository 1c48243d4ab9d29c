//! The scripted target and the breadcrumb trail it leaves behind.

use std::collections::VecDeque;

use tracing::info;
use warden_ai::{constants::TRAIL_CAPACITY, Cooldown, DamageOutcome, Vitals};
use warden_common::{Millis, Rect, Vec2};

use crate::scenario::TargetSpec;

/// Milliseconds between recorded breadcrumbs.
pub const BREADCRUMB_INTERVAL_MS: u64 = 200;

/// A target that walks a fixed loop of waypoints.
#[derive(Debug, Clone)]
pub struct ScriptedTarget {
    start: Vec2,
    position: Vec2,
    waypoints: Vec<Vec2>,
    next_waypoint: usize,
    speed: f32,
    width: f32,
    height: f32,
    vitals: Vitals,
    attack_damage: u32,
    attack_range: f32,
    attack_cooldown: Cooldown,
}

impl ScriptedTarget {
    /// Creates the target at its start point.
    #[must_use]
    pub fn new(spec: &TargetSpec) -> Self {
        Self {
            start: spec.start,
            position: spec.start,
            waypoints: spec.waypoints.clone(),
            next_waypoint: 0,
            speed: spec.speed,
            width: spec.width,
            height: spec.height,
            vitals: Vitals::new(spec.max_health, 0),
            attack_damage: spec.attack_damage,
            attack_range: spec.attack_range,
            attack_cooldown: Cooldown::new(spec.attack_interval_ms),
        }
    }

    /// Walks toward the current waypoint, advancing on arrival.
    pub fn update(&mut self, now: Millis) {
        self.attack_cooldown.update(now);

        let Some(&waypoint) = self.waypoints.get(self.next_waypoint) else {
            return;
        };
        let to_go = waypoint - self.position;
        let distance = to_go.length();
        if distance <= self.speed {
            self.position = waypoint;
            self.next_waypoint = (self.next_waypoint + 1) % self.waypoints.len();
        } else {
            self.position += to_go / distance * self.speed;
        }
    }

    /// Hitbox in world space.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.position, self.width, self.height)
    }

    /// Current center.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.vitals.health()
    }

    /// Whether the target still has health.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.vitals.is_depleted()
    }

    /// Applies incoming damage.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        self.vitals.apply_damage(amount)
    }

    /// Attacks something `distance` away if it is in reach and the attack
    /// is ready. Returns the damage dealt.
    pub fn try_attack(&mut self, now: Millis, distance: f32) -> Option<u32> {
        if self.attack_damage == 0 || self.attack_cooldown.is_active() || distance > self.attack_range {
            return None;
        }
        self.attack_cooldown.trigger(now);
        Some(self.attack_damage)
    }

    /// Returns to the start point at full health.
    pub fn respawn(&mut self) {
        self.position = self.start;
        self.next_waypoint = 0;
        self.vitals.restore_full();
        self.attack_cooldown.reset();
        info!(at = ?self.start, "Target respawned");
    }
}

/// Records where the target has been while it is observed.
#[derive(Debug, Clone, Default)]
pub struct BreadcrumbRecorder {
    points: VecDeque<Vec2>,
    last_recorded_at: Option<Millis>,
    revision: u64,
}

impl BreadcrumbRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a point if the interval has passed. Returns whether it did.
    pub fn record(&mut self, position: Vec2, now: Millis) -> bool {
        let due = self
            .last_recorded_at
            .map_or(true, |last| now.since(last) >= BREADCRUMB_INTERVAL_MS);
        if !due {
            return false;
        }

        self.points.push_back(position);
        while self.points.len() > TRAIL_CAPACITY {
            self.points.pop_front();
        }
        self.last_recorded_at = Some(now);
        self.revision += 1;
        true
    }

    /// Drops every point.
    pub fn clear(&mut self) {
        if !self.points.is_empty() {
            self.points.clear();
            self.revision += 1;
        }
        self.last_recorded_at = None;
    }

    /// Immutable copy of the trail, oldest point first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Vec2> {
        self.points.iter().copied().collect()
    }

    /// Changes whenever the trail changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TargetSpec {
        TargetSpec {
            start: Vec2::ZERO,
            waypoints: vec![Vec2::new(10.0, 0.0), Vec2::ZERO],
            speed: 4.0,
            ..TargetSpec::default()
        }
    }

    #[test]
    fn test_target_walks_loop() {
        let mut target = ScriptedTarget::new(&spec());
        target.update(Millis::ZERO);
        assert_eq!(target.position(), Vec2::new(4.0, 0.0));
        target.update(Millis::ZERO);
        target.update(Millis::ZERO);
        assert_eq!(target.position(), Vec2::new(10.0, 0.0));
        target.update(Millis::ZERO);
        assert_eq!(target.position(), Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_target_attack_cooldown() {
        let mut target = ScriptedTarget::new(&spec());
        assert_eq!(target.try_attack(Millis::ZERO, 10.0), Some(10));
        assert_eq!(target.try_attack(Millis::new(100), 10.0), None);
        target.update(Millis::new(801));
        assert_eq!(target.try_attack(Millis::new(801), 41.0), None);
        assert_eq!(target.try_attack(Millis::new(802), 40.0), Some(10));
    }

    #[test]
    fn test_target_death_and_respawn() {
        let mut target = ScriptedTarget::new(&spec());
        target.update(Millis::ZERO);
        assert!(target.apply_damage(150).killed);
        assert!(!target.is_alive());
        target.respawn();
        assert!(target.is_alive());
        assert_eq!(target.position(), Vec2::ZERO);
        assert_eq!(target.health(), 100);
    }

    #[test]
    fn test_recorder_interval_and_capacity() {
        let mut recorder = BreadcrumbRecorder::new();
        assert!(recorder.record(Vec2::ZERO, Millis::ZERO));
        assert!(!recorder.record(Vec2::ONE, Millis::new(199)));
        assert!(recorder.record(Vec2::ONE, Millis::new(200)));
        assert_eq!(recorder.len(), 2);

        for i in 0..20u64 {
            recorder.record(Vec2::new(i as f32, 0.0), Millis::new(400 + i * 200));
        }
        assert_eq!(recorder.len(), TRAIL_CAPACITY);
        assert_eq!(recorder.snapshot().last(), Some(&Vec2::new(19.0, 0.0)));
    }

    #[test]
    fn test_recorder_clear_bumps_revision() {
        let mut recorder = BreadcrumbRecorder::new();
        recorder.record(Vec2::ZERO, Millis::ZERO);
        let before = recorder.revision();
        recorder.clear();
        assert!(recorder.is_empty());
        assert_ne!(recorder.revision(), before);

        let cleared = recorder.revision();
        recorder.clear();
        assert_eq!(recorder.revision(), cleared);
    }
}
