//! Randomized local search around the agent after the trail runs out.
//!
//! A session alternates between short move windows toward a random
//! collision-free candidate and standing pauses. It ends after a fixed
//! duration or once too many candidates have been reached or found blocked.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};
use warden_common::{Millis, RandomSource, Vec2};

use crate::collision::CollisionOracle;
use crate::constants::{
    MAX_SEARCH_ATTEMPTS, SEARCH_ARRIVE_RADIUS, SEARCH_BASE_RADIUS, SEARCH_CANDIDATE_TRIALS,
    SEARCH_DURATION_MS, SEARCH_FALLBACK_SPREAD, SEARCH_MAX_RADIUS, SEARCH_MOVE_MAX_MS,
    SEARCH_MOVE_MIN_MS, SEARCH_PAUSE_MAX_MS, SEARCH_PAUSE_MIN_MS, SEARCH_RADIUS_STEP,
};
use crate::movement::Body;

/// What the agent should do this tick while searching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchStep {
    /// Search is over; return to patrol
    Completed,
    /// Stand still
    Paused,
    /// Walk toward the candidate point
    MoveTo(Vec2),
}

/// Transient state of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSession {
    attempts: u32,
    started_at: Millis,
    target: Option<Vec2>,
    paused_until: Option<Millis>,
    move_started_at: Millis,
    move_duration_ms: u64,
}

impl SearchSession {
    /// Starts a search from the agent's current position.
    pub fn begin<C, R>(
        position: Vec2,
        body: &Body,
        collision: &C,
        rng: &mut R,
        now: Millis,
    ) -> Self
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        let mut session = Self {
            attempts: 0,
            started_at: now,
            target: None,
            paused_until: None,
            move_started_at: now,
            move_duration_ms: rng.range_u64(SEARCH_MOVE_MIN_MS, SEARCH_MOVE_MAX_MS),
        };
        session.target = Some(session.generate_candidate(position, body, collision, rng));
        session
    }

    /// Advances the session by one tick.
    pub fn step<C, R>(
        &mut self,
        position: Vec2,
        body: &Body,
        collision: &C,
        rng: &mut R,
        now: Millis,
    ) -> SearchStep
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        if now.since(self.started_at) > SEARCH_DURATION_MS {
            return SearchStep::Completed;
        }

        if let Some(until) = self.paused_until {
            if now < until {
                return SearchStep::Paused;
            }
            self.paused_until = None;
            self.restart_move_window(rng, now);
            self.target = Some(self.generate_candidate(position, body, collision, rng));
        }

        if now.since(self.move_started_at) >= self.move_duration_ms {
            let pause = rng.range_u64(SEARCH_PAUSE_MIN_MS, SEARCH_PAUSE_MAX_MS);
            self.paused_until = Some(now.plus(pause));
            return SearchStep::Paused;
        }

        let needs_new_target = match self.target {
            None => true,
            Some(target) => {
                position.distance(target) < SEARCH_ARRIVE_RADIUS
                    || collision.collides(&body.rect_at(target))
            },
        };

        if needs_new_target {
            self.attempts += 1;
            if self.attempts > MAX_SEARCH_ATTEMPTS {
                return SearchStep::Completed;
            }
            self.target = Some(self.generate_candidate(position, body, collision, rng));
            self.restart_move_window(rng, now);
        }

        match self.target {
            Some(target) => SearchStep::MoveTo(target),
            None => SearchStep::Paused,
        }
    }

    /// Replaces the current candidate, used when the agent is stuck.
    pub fn regenerate_target<C, R>(&mut self, position: Vec2, body: &Body, collision: &C, rng: &mut R)
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.target = Some(self.generate_candidate(position, body, collision, rng));
    }

    fn restart_move_window<R: RandomSource + ?Sized>(&mut self, rng: &mut R, now: Millis) {
        self.move_started_at = now;
        self.move_duration_ms = rng.range_u64(SEARCH_MOVE_MIN_MS, SEARCH_MOVE_MAX_MS);
    }

    /// Picks a point in a ring around `position` whose radius grows with the
    /// attempt count, falling back to an unchecked nearby point.
    pub fn generate_candidate<C, R>(
        &self,
        position: Vec2,
        body: &Body,
        collision: &C,
        rng: &mut R,
    ) -> Vec2
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        let radius = (SEARCH_BASE_RADIUS + self.attempts as f32 * SEARCH_RADIUS_STEP)
            .min(SEARCH_MAX_RADIUS);

        for _ in 0..SEARCH_CANDIDATE_TRIALS {
            let angle = rng.range_f32(0.0, TAU);
            let distance = radius * rng.range_f32(0.5, 1.0);
            let candidate = position + Vec2::from_angle(angle) * distance;
            if !collision.collides(&body.rect_at(candidate)) {
                return candidate;
            }
        }

        position
            + Vec2::new(
                rng.range_f32(-SEARCH_FALLBACK_SPREAD, SEARCH_FALLBACK_SPREAD),
                rng.range_f32(-SEARCH_FALLBACK_SPREAD, SEARCH_FALLBACK_SPREAD),
            )
    }

    /// Candidates reached or abandoned so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Current candidate point.
    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Whether the agent is standing in a pause window.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_until.is_some()
    }

    /// When the session started.
    #[must_use]
    pub fn started_at(&self) -> Millis {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::ObstacleMap;
    use warden_common::SequenceRng;

    fn body() -> Body {
        Body::new(30.0, 21.0, 0.0)
    }

    fn assert_near(a: Vec2, b: Vec2) {
        assert!(a.distance(b) < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_candidate_in_ring() {
        let map = ObstacleMap::new();
        let mut rng = SequenceRng::new(vec![0.0, 0.0]);
        let session = SearchSession::begin(Vec2::ZERO, &body(), &map, &mut rng, Millis::ZERO);
        // Angle 0, half of the base radius.
        assert_near(session.target().expect("target"), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_candidate_radius_grows_and_caps() {
        let map = ObstacleMap::new();
        let mut rng = SequenceRng::constant(0.0);
        let mut session = SearchSession::begin(Vec2::ZERO, &body(), &map, &mut rng, Millis::ZERO);
        session.attempts = 2;
        assert_near(
            session.generate_candidate(Vec2::ZERO, &body(), &map, &mut rng),
            Vec2::new(130.0, 0.0),
        );
        session.attempts = 10;
        assert_near(
            session.generate_candidate(Vec2::ZERO, &body(), &map, &mut rng),
            Vec2::new(200.0, 0.0),
        );
    }

    #[test]
    fn test_blocked_candidates_fall_back() {
        let map = ObstacleMap::new()
            .with_obstacle(-1_000.0, -1_000.0, 2_000.0, 2_000.0)
            .expect("valid");
        let mut rng = SequenceRng::constant(0.75);
        let session = SearchSession::begin(Vec2::ZERO, &body(), &map, &mut rng, Millis::ZERO);
        assert_near(session.target().expect("target"), Vec2::new(75.0, 75.0));
    }

    #[test]
    fn test_search_completes_after_duration() {
        let map = ObstacleMap::new();
        let mut rng = SequenceRng::constant(0.99);
        let mut session = SearchSession::begin(Vec2::ZERO, &body(), &map, &mut rng, Millis::ZERO);
        // Stay in the active window by resuming from pauses as they come.
        let mut now = Millis::ZERO;
        while now < Millis::new(SEARCH_DURATION_MS) {
            assert_ne!(
                session.step(Vec2::ZERO, &body(), &map, &mut rng, now),
                SearchStep::Completed
            );
            now = now.plus(100);
        }
        assert_ne!(
            session.step(Vec2::ZERO, &body(), &map, &mut rng, Millis::new(SEARCH_DURATION_MS)),
            SearchStep::Completed
        );
        assert_eq!(
            session.step(Vec2::ZERO, &body(), &map, &mut rng, Millis::new(SEARCH_DURATION_MS + 1)),
            SearchStep::Completed
        );
    }

    #[test]
    fn test_search_completes_after_attempt_cap() {
        let map = ObstacleMap::new();
        let mut rng = SequenceRng::constant(0.5);
        let mut session = SearchSession::begin(Vec2::ZERO, &body(), &map, &mut rng, Millis::ZERO);

        for attempt in 1..=MAX_SEARCH_ATTEMPTS {
            let reached = session.target().expect("target");
            let step = session.step(reached, &body(), &map, &mut rng, Millis::new(u64::from(attempt)));
            assert!(matches!(step, SearchStep::MoveTo(_)));
            assert_eq!(session.attempts(), attempt);
        }

        let reached = session.target().expect("target");
        assert_eq!(
            session.step(reached, &body(), &map, &mut rng, Millis::new(10)),
            SearchStep::Completed
        );
    }

    #[test]
    fn test_pause_cycle() {
        let map = ObstacleMap::new();
        // Move window 550ms, pause 1250ms.
        let mut rng = SequenceRng::constant(0.5);
        let mut session = SearchSession::begin(Vec2::ZERO, &body(), &map, &mut rng, Millis::ZERO);

        assert!(matches!(
            session.step(Vec2::ZERO, &body(), &map, &mut rng, Millis::new(549)),
            SearchStep::MoveTo(_)
        ));
        assert_eq!(
            session.step(Vec2::ZERO, &body(), &map, &mut rng, Millis::new(550)),
            SearchStep::Paused
        );
        assert!(session.is_paused());
        assert_eq!(
            session.step(Vec2::ZERO, &body(), &map, &mut rng, Millis::new(1_799)),
            SearchStep::Paused
        );
        assert!(matches!(
            session.step(Vec2::ZERO, &body(), &map, &mut rng, Millis::new(1_800)),
            SearchStep::MoveTo(_)
        ));
        assert!(!session.is_paused());
        assert_eq!(session.attempts(), 0);
    }
}
