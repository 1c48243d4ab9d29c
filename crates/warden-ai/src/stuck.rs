//! Stuck detection and the forced step-back recovery maneuver.

use serde::{Deserialize, Serialize};
use warden_common::{Millis, RandomSource, Vec2};

use crate::collision::CollisionOracle;
use crate::constants::{
    BLOCKED_MOVE_PENALTY, STEP_BACK_CLEARANCE_MAX, STEP_BACK_SPEED_FACTOR, STEP_BACK_TICKS,
    STUCK_MIN_PROGRESS, STUCK_SAMPLE_INTERVAL_MS, STUCK_SAMPLE_LIMIT, STUCK_SAMPLE_MIN_PROGRESS,
    STUCK_TICK_THRESHOLD,
};
use crate::movement::Body;

/// Candidate step-back directions, in probe order.
const STEP_BACK_DIRECTIONS: [(f32, f32); 8] = [
    (0.0, -1.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, -1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (1.0, 1.0),
];

/// Tracks lack of progress with two independent heuristics.
///
/// The per-tick counter triggers the forced step-back. The sampled counter,
/// checked every few hundred milliseconds, drives breadcrumb skipping and
/// search-target regeneration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StuckMonitor {
    consecutive: u32,
    sampled: u32,
    last_sample_at: Millis,
    last_sample_pos: Vec2,
}

impl StuckMonitor {
    /// Creates a monitor anchored at a position.
    #[must_use]
    pub fn new(position: Vec2, now: Millis) -> Self {
        Self {
            consecutive: 0,
            sampled: 0,
            last_sample_at: now,
            last_sample_pos: position,
        }
    }

    /// Records one tick of movement. Returns `true` when the consecutive
    /// no-progress count reaches the step-back threshold.
    pub fn record_tick(&mut self, displacement: f32, trying_to_move: bool) -> bool {
        if !trying_to_move || displacement >= STUCK_MIN_PROGRESS {
            self.consecutive = 0;
            return false;
        }
        self.consecutive += 1;
        self.consecutive >= STUCK_TICK_THRESHOLD
    }

    /// Samples progress over the last window. Returns `true` when the
    /// sampled counter says the agent is stuck.
    pub fn sample(&mut self, position: Vec2, now: Millis) -> bool {
        if now.since(self.last_sample_at) > STUCK_SAMPLE_INTERVAL_MS {
            let moved = (position - self.last_sample_pos).abs();
            if moved.x + moved.y < STUCK_SAMPLE_MIN_PROGRESS {
                self.sampled += 1;
            } else {
                self.sampled = 0;
            }
            self.last_sample_pos = position;
            self.last_sample_at = now;
        }
        self.is_sample_stuck()
    }

    /// Whether the sampled counter exceeds its limit.
    #[must_use]
    pub fn is_sample_stuck(&self) -> bool {
        self.sampled > STUCK_SAMPLE_LIMIT
    }

    /// Penalizes a fully blocked move.
    pub fn penalize_blocked(&mut self) {
        self.sampled += BLOCKED_MOVE_PENALTY;
    }

    /// Clears the sampled counter.
    pub fn clear_sampled(&mut self) {
        self.sampled = 0;
    }

    /// Clears both counters.
    pub fn clear(&mut self) {
        self.consecutive = 0;
        self.sampled = 0;
    }

    /// Consecutive no-progress ticks.
    #[must_use]
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// Sampled stuck count.
    #[must_use]
    pub fn sampled(&self) -> u32 {
        self.sampled
    }
}

/// Progress of a step-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBackStatus {
    /// Still overriding normal behavior
    Moving,
    /// Done; normal behavior resumes next tick
    Finished,
}

/// A fixed-duration walk away from wherever the agent got stuck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepBack {
    ticks_remaining: u32,
    velocity: Vec2,
    origin: Vec2,
}

impl StepBack {
    /// Picks the direction with the best clearance score.
    ///
    /// Clearance is a bounded random score, not a measured distance; ties keep
    /// the earlier direction.
    pub fn begin<R: RandomSource + ?Sized>(position: Vec2, base_speed: f32, rng: &mut R) -> Self {
        let mut best = STEP_BACK_DIRECTIONS[0];
        let mut best_clearance = None;
        for dir in STEP_BACK_DIRECTIONS {
            let clearance = rng.range_u64(0, STEP_BACK_CLEARANCE_MAX);
            if best_clearance.map_or(true, |b| clearance > b) {
                best_clearance = Some(clearance);
                best = dir;
            }
        }

        let direction = Vec2::new(best.0, best.1).normalize_or_zero();
        Self {
            ticks_remaining: STEP_BACK_TICKS,
            velocity: direction * base_speed * STEP_BACK_SPEED_FACTOR,
            origin: position,
        }
    }

    /// Moves one tick along the chosen direction, sliding on a free axis.
    pub fn step<C: CollisionOracle + ?Sized>(
        &mut self,
        position: &mut Vec2,
        body: &Body,
        collision: &C,
    ) -> StepBackStatus {
        if self.ticks_remaining == 0 {
            return StepBackStatus::Finished;
        }

        let start = *position;
        let next = start + self.velocity;
        if collision.collides(&body.rect_at(next)) {
            let blocked_x = collision.collides(&body.rect_at(Vec2::new(next.x, start.y)));
            let blocked_y = collision.collides(&body.rect_at(Vec2::new(start.x, next.y)));
            if !blocked_x {
                position.x = next.x;
            }
            if !blocked_y {
                position.y = next.y;
            }
            if blocked_x && blocked_y {
                self.ticks_remaining = 0;
                return StepBackStatus::Moving;
            }
        } else {
            *position = next;
        }

        self.ticks_remaining -= 1;
        StepBackStatus::Moving
    }

    /// Step-back velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Where the agent was when the step-back began.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Ticks left before the maneuver ends.
    #[must_use]
    pub fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ObstacleMap;
    use warden_common::SequenceRng;

    #[test]
    fn test_threshold_is_exact() {
        let mut monitor = StuckMonitor::default();
        for _ in 0..STUCK_TICK_THRESHOLD - 1 {
            assert!(!monitor.record_tick(0.2, true));
        }
        assert_eq!(monitor.consecutive(), 29);
        assert!(monitor.record_tick(0.2, true));
    }

    #[test]
    fn test_progress_resets_counter() {
        let mut monitor = StuckMonitor::default();
        for _ in 0..20 {
            monitor.record_tick(0.0, true);
        }
        monitor.record_tick(1.0, true);
        assert_eq!(monitor.consecutive(), 0);
        monitor.record_tick(0.0, true);
        monitor.record_tick(0.0, false);
        assert_eq!(monitor.consecutive(), 0);
    }

    #[test]
    fn test_sampled_counter() {
        let mut monitor = StuckMonitor::new(Vec2::ZERO, Millis::ZERO);
        assert!(!monitor.sample(Vec2::ZERO, Millis::new(400)));
        assert!(!monitor.sample(Vec2::ZERO, Millis::new(401)));
        assert_eq!(monitor.sampled(), 1);
        assert!(monitor.sample(Vec2::new(1.0, 0.0), Millis::new(802)));
        assert!(!monitor.sample(Vec2::new(10.0, 0.0), Millis::new(1_203)));

        monitor.penalize_blocked();
        assert!(monitor.is_sample_stuck());
        monitor.clear_sampled();
        assert!(!monitor.is_sample_stuck());
    }

    #[test]
    fn test_step_back_picks_highest_clearance() {
        // Scores 0.1, 0.1, 0.5, 0.9, 0.9, ...: the first 0.9 (+x) wins ties.
        let mut rng = SequenceRng::new(vec![0.1, 0.1, 0.5, 0.9, 0.9, 0.2, 0.2, 0.2]);
        let step = StepBack::begin(Vec2::ZERO, 2.0, &mut rng);
        assert_eq!(step.velocity(), Vec2::new(1.0, 0.0));
        assert_eq!(rng.draws(), 8);
    }

    #[test]
    fn test_step_back_runs_fixed_ticks() {
        let map = ObstacleMap::new();
        let body = Body::new(10.0, 10.0, 0.0);
        let mut rng = SequenceRng::constant(0.0);
        let mut step = StepBack::begin(Vec2::ZERO, 2.0, &mut rng);
        let mut pos = Vec2::ZERO;
        for _ in 0..STEP_BACK_TICKS {
            assert_eq!(step.step(&mut pos, &body, &map), StepBackStatus::Moving);
        }
        assert_eq!(step.step(&mut pos, &body, &map), StepBackStatus::Finished);
        // All ties: the first direction (up) is kept.
        assert_eq!(pos, Vec2::new(0.0, -20.0));
    }

    #[test]
    fn test_step_back_ends_when_boxed_in() {
        // Walls left and above; the up-left diagonal wins the clearance draw.
        let map = ObstacleMap::new()
            .with_obstacle(-15.0, -100.0, 10.0, 200.0)
            .and_then(|m| m.with_obstacle(-100.0, -15.0, 200.0, 10.0))
            .expect("valid");
        let body = Body::new(10.0, 10.0, 0.0);
        let mut rng = SequenceRng::new(vec![0.0, 0.0, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0]);
        let mut step = StepBack::begin(Vec2::ZERO, 2.0, &mut rng);
        let mut pos = Vec2::ZERO;
        assert_eq!(step.step(&mut pos, &body, &map), StepBackStatus::Moving);
        assert_eq!(step.ticks_remaining(), 0);
        assert_eq!(pos, Vec2::ZERO);
        assert_eq!(step.step(&mut pos, &body, &map), StepBackStatus::Finished);
    }
}
