//! Projectiles spawned by ranged attacks.
//!
//! The agent owns and advances its projectiles; resolving impacts against
//! the target is left to whoever owns both.

use serde::{Deserialize, Serialize};
use warden_common::{unit_or_default, Rect, Vec2};

use crate::collision::CollisionOracle;
use crate::constants::PROJECTILE_SIZE;

/// A straight-flying projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    position: Vec2,
    origin: Vec2,
    velocity: Vec2,
    max_range_sq: f32,
    damage: u32,
    alive: bool,
}

impl Projectile {
    /// Creates a projectile at `origin` flying along `direction`.
    ///
    /// A zero-length direction falls back to the default heading.
    #[must_use]
    pub fn new(origin: Vec2, direction: Vec2, speed: f32, max_range: f32, damage: u32) -> Self {
        Self {
            position: origin,
            origin,
            velocity: unit_or_default(direction) * speed,
            max_range_sq: max_range * max_range,
            damage,
            alive: true,
        }
    }

    /// Moves one tick; dies on hitting an obstacle or running out of range.
    pub fn update<C: CollisionOracle + ?Sized>(&mut self, collision: &C) {
        if !self.alive {
            return;
        }

        self.position += self.velocity;

        if collision.first_overlap(&self.bounds()).is_some() {
            self.alive = false;
            return;
        }

        if self.position.distance_squared(self.origin) >= self.max_range_sq {
            self.alive = false;
        }
    }

    /// Hitbox in world space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, PROJECTILE_SIZE, PROJECTILE_SIZE)
    }

    /// Marks the projectile as spent after hitting the target.
    pub fn on_hit(&mut self) {
        self.alive = false;
    }

    /// Whether the projectile is still flying.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current center.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Damage dealt on impact.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ObstacleMap;
    use warden_common::DEFAULT_HEADING;

    #[test]
    fn test_direction_is_normalized() {
        let p = Projectile::new(Vec2::ZERO, Vec2::new(30.0, 40.0), 4.0, 200.0, 5);
        assert!((p.velocity().length() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_uses_default_heading() {
        let p = Projectile::new(Vec2::ZERO, Vec2::ZERO, 4.0, 200.0, 5);
        assert_eq!(p.velocity(), DEFAULT_HEADING * 4.0);
    }

    #[test]
    fn test_dies_at_max_range() {
        let map = ObstacleMap::new();
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 4.0, 200.0, 5);
        for _ in 0..49 {
            p.update(&map);
        }
        assert!(p.is_alive());
        p.update(&map);
        assert!(!p.is_alive());
        assert_eq!(p.position(), Vec2::new(200.0, 0.0));
    }

    #[test]
    fn test_dies_on_obstacle() {
        let map = ObstacleMap::new().with_obstacle(10.0, -50.0, 10.0, 100.0).expect("valid");
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 4.0, 200.0, 5);
        p.update(&map);
        assert!(p.is_alive());
        p.update(&map);
        assert!(!p.is_alive());

        // Dead projectiles do not move.
        let before = p.position();
        p.update(&map);
        assert_eq!(p.position(), before);
    }

    #[test]
    fn test_on_hit() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::Y, 4.0, 200.0, 7);
        p.on_hit();
        assert!(!p.is_alive());
        assert_eq!(p.damage(), 7);
    }
}
