//! Collision-aware movement: seeking, obstacle avoidance, axis sliding and
//! forced unsticking.

use serde::{Deserialize, Serialize};
use warden_common::{Rect, Vec2};

use crate::collision::CollisionOracle;
use crate::constants::{
    AVOIDANCE_AXIS_BOOST, FORCED_MOVE_DIRECTIONS, FORCED_MOVE_MAGNITUDES, SLIDE_OFFSETS,
};

/// Collision footprint of an agent relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
    /// Vertical offset of the hitbox center from the position
    pub offset_y: f32,
}

impl Body {
    /// Creates a body footprint.
    #[must_use]
    pub const fn new(width: f32, height: f32, offset_y: f32) -> Self {
        Self {
            width,
            height,
            offset_y,
        }
    }

    /// Hitbox when the agent stands at `position`.
    #[must_use]
    pub fn rect_at(&self, position: Vec2) -> Rect {
        Rect::from_center(
            Vec2::new(position.x, position.y + self.offset_y),
            self.width,
            self.height,
        )
    }
}

/// How a movement request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing requested
    Idle,
    /// Full displacement applied
    Clear,
    /// One axis applied, the other slid or held
    Slid,
    /// Both axes blocked; a nearby free offset was taken instead
    Forced,
    /// No free offset found; position unchanged
    Blocked,
}

/// Velocity toward a point at the given speed; zero once within one unit.
#[must_use]
pub fn seek_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist < 1.0 {
        return Vec2::ZERO;
    }
    delta / dist * speed
}

/// Like [`seek_velocity`], but when the direct step would collide prefers
/// whichever single axis is free, boosted to keep pace.
pub fn avoidance_velocity<C: CollisionOracle + ?Sized>(
    from: Vec2,
    to: Vec2,
    speed: f32,
    body: &Body,
    collision: &C,
) -> Vec2 {
    let desired = seek_velocity(from, to, speed);
    if desired == Vec2::ZERO || !collision.collides(&body.rect_at(from + desired)) {
        return desired;
    }

    if !collision.collides(&body.rect_at(from + Vec2::new(desired.x, 0.0))) {
        Vec2::new(desired.x * AVOIDANCE_AXIS_BOOST, 0.0)
    } else if !collision.collides(&body.rect_at(from + Vec2::new(0.0, desired.y))) {
        Vec2::new(0.0, desired.y * AVOIDANCE_AXIS_BOOST)
    } else {
        desired
    }
}

/// Applies `velocity` to `position`, honoring obstacles.
///
/// Blocked on one axis: the free axis is applied and the blocked axis slides
/// by the largest clear offset in the direction of travel. Blocked on both:
/// the first clear offset from a fixed ring of directions is taken.
pub fn resolve_movement<C: CollisionOracle + ?Sized>(
    position: &mut Vec2,
    velocity: Vec2,
    body: &Body,
    collision: &C,
) -> MoveOutcome {
    if velocity == Vec2::ZERO {
        return MoveOutcome::Idle;
    }

    let start = *position;
    let next = start + velocity;

    if !collision.collides(&body.rect_at(next)) {
        *position = next;
        return MoveOutcome::Clear;
    }

    let blocked_x = collision.collides(&body.rect_at(Vec2::new(next.x, start.y)));
    let blocked_y = collision.collides(&body.rect_at(Vec2::new(start.x, next.y)));

    if blocked_x && !blocked_y {
        position.y = next.y;
        if let Some(x) = slide_offset(start.x, velocity.x, |x| {
            !collision.collides(&body.rect_at(Vec2::new(x, next.y)))
        }) {
            position.x = x;
        }
        return MoveOutcome::Slid;
    }

    if blocked_y && !blocked_x {
        position.x = next.x;
        if let Some(y) = slide_offset(start.y, velocity.y, |y| {
            !collision.collides(&body.rect_at(Vec2::new(next.x, y)))
        }) {
            position.y = y;
        }
        return MoveOutcome::Slid;
    }

    if let Some(forced) = forced_offset(start, body, collision) {
        *position = forced;
        return MoveOutcome::Forced;
    }

    MoveOutcome::Blocked
}

fn slide_offset(origin: f32, velocity: f32, is_clear: impl Fn(f32) -> bool) -> Option<f32> {
    let sign = if velocity > 0.0 { 1.0 } else { -1.0 };
    SLIDE_OFFSETS
        .iter()
        .map(|offset| origin + sign * offset)
        .find(|&candidate| is_clear(candidate))
}

fn forced_offset<C: CollisionOracle + ?Sized>(start: Vec2, body: &Body, collision: &C) -> Option<Vec2> {
    FORCED_MOVE_DIRECTIONS.iter().find_map(|&(dx, dy)| {
        FORCED_MOVE_MAGNITUDES.iter().find_map(|&magnitude| {
            let candidate = start + Vec2::new(dx, dy) * magnitude;
            (!collision.collides(&body.rect_at(candidate))).then_some(candidate)
        })
    })
}
