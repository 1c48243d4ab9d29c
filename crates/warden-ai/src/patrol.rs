//! Patrol wandering and idle look-around.

use serde::{Deserialize, Serialize};
use warden_common::{Millis, RandomSource, Rect, Vec2};

use crate::constants::{
    IDLE_LOOK_MAX_MS, IDLE_LOOK_MIN_MS, PATROL_ARRIVE_RADIUS, PATROL_WAIT_MAX_MS,
    PATROL_WAIT_MIN_MS, SEARCH_LOOK_MAX_MS, SEARCH_LOOK_MIN_MS,
};
use crate::direction::Facing;

/// What a patrolling agent should do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolStep {
    /// No patrol area; stand still
    Stationary,
    /// Waiting at a waypoint
    Wait,
    /// Walk toward the waypoint
    MoveTo(Vec2),
}

/// Random waypoints inside a patrol area with waits between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoint: Option<Vec2>,
    wait_until: Millis,
}

impl PatrolRoute {
    /// Advances the route by one tick.
    pub fn step<R: RandomSource + ?Sized>(
        &mut self,
        area: Option<&Rect>,
        position: Vec2,
        rng: &mut R,
        now: Millis,
    ) -> PatrolStep {
        let Some(area) = area else {
            return PatrolStep::Stationary;
        };

        if now < self.wait_until {
            return PatrolStep::Wait;
        }

        match self.waypoint {
            Some(waypoint) if position.distance(waypoint) >= PATROL_ARRIVE_RADIUS => {
                PatrolStep::MoveTo(waypoint)
            },
            _ => {
                self.waypoint = Some(random_point(area, rng));
                self.wait_until = now.plus(rng.range_u64(PATROL_WAIT_MIN_MS, PATROL_WAIT_MAX_MS));
                PatrolStep::Wait
            },
        }
    }

    /// Current waypoint.
    #[must_use]
    pub fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    /// Forgets the waypoint and any wait.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn random_point<R: RandomSource + ?Sized>(area: &Rect, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.range_f32(area.min_x, area.max_x),
        rng.range_f32(area.min_y, area.max_y),
    )
}

/// Periodically turns a stationary agent to a random facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleLook {
    next_look_at: Millis,
}

impl IdleLook {
    /// Returns a new facing when it is time to look around.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        now: Millis,
        search_paused: bool,
        rng: &mut R,
    ) -> Option<Facing> {
        if now < self.next_look_at {
            return None;
        }
        let facing = Facing::ALL[rng.index(Facing::ALL.len())];
        let interval = if search_paused {
            rng.range_u64(SEARCH_LOOK_MIN_MS, SEARCH_LOOK_MAX_MS)
        } else {
            rng.range_u64(IDLE_LOOK_MIN_MS, IDLE_LOOK_MAX_MS)
        };
        self.next_look_at = now.plus(interval);
        Some(facing)
    }
}
