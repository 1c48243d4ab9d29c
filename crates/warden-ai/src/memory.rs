//! Breadcrumb memory: pursuing a target after losing sight of it.
//!
//! The orchestrator records where the target has been and pushes an
//! immutable snapshot to the agent. The agent keeps its own copy, walks it
//! head first, and gives up after a few points or once the copy expires.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_common::{Millis, Vec2};

use crate::constants::{
    MAX_BREADCRUMBS_TO_FOLLOW, TRAIL_ACCEPT_RADIUS, TRAIL_CAPACITY, TRAIL_TTL_MS,
};

/// An accepted trail: ordered points sharing one creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTrail {
    points: VecDeque<Vec2>,
    created_at: Millis,
}

impl MemoryTrail {
    /// Creates a trail from points, keeping at most [`TRAIL_CAPACITY`] of them.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = Vec2>, created_at: Millis) -> Self {
        Self {
            points: points.into_iter().take(TRAIL_CAPACITY).collect(),
            created_at,
        }
    }

    /// Whether the trail has outlived [`TRAIL_TTL_MS`].
    #[must_use]
    pub fn is_expired(&self, now: Millis) -> bool {
        now.since(self.created_at) > TRAIL_TTL_MS
    }

    /// First remaining point.
    #[must_use]
    pub fn head(&self) -> Option<Vec2> {
        self.points.front().copied()
    }

    /// Remaining points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no points remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> Millis {
        self.created_at
    }
}

/// Why a pushed trail was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailRejection {
    /// The target is currently visible
    TargetVisible,
    /// No points
    Empty,
    /// A point was NaN or infinite
    Malformed,
    /// The agent never saw the target and the trail starts too far away
    TooFar,
}

/// Result of consuming the current breadcrumb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailStep {
    /// Continue toward the next point
    Next(Vec2),
    /// Trail emptied or follow cap reached; the trail has been discarded
    Exhausted,
}

/// Owns the agent's copy of the trail and counts consumed breadcrumbs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailFollower {
    trail: Option<MemoryTrail>,
    consumed: u32,
}

impl TrailFollower {
    /// Validates and stores a pushed trail, replacing any previous one.
    ///
    /// When a last-seen position is known the trail is first trimmed to start
    /// at the point closest to it.
    pub fn accept(
        &mut self,
        points: &[Vec2],
        agent_center: Vec2,
        target_visible: bool,
        has_seen_target: bool,
        last_seen: Option<Vec2>,
        now: Millis,
    ) -> Result<(), TrailRejection> {
        if target_visible {
            return Err(TrailRejection::TargetVisible);
        }
        if points.is_empty() {
            return Err(TrailRejection::Empty);
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(TrailRejection::Malformed);
        }

        let start = last_seen.map_or(0, |seen| closest_index(points, seen));
        let trimmed = &points[start..];

        if !has_seen_target && trimmed[0].distance(agent_center) > TRAIL_ACCEPT_RADIUS {
            return Err(TrailRejection::TooFar);
        }

        self.trail = Some(MemoryTrail::new(trimmed.iter().copied(), now));
        Ok(())
    }

    /// Discards the trail once it has expired.
    pub fn expire(&mut self, now: Millis) -> bool {
        if self.trail.as_ref().is_some_and(|t| t.is_expired(now)) {
            debug!("Breadcrumb trail expired");
            self.trail = None;
            return true;
        }
        false
    }

    /// Whether there is a trail worth following.
    #[must_use]
    pub fn is_followable(&self) -> bool {
        self.consumed < MAX_BREADCRUMBS_TO_FOLLOW && self.trail.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// The breadcrumb currently being walked toward.
    #[must_use]
    pub fn current(&self) -> Option<Vec2> {
        self.trail.as_ref().and_then(MemoryTrail::head)
    }

    /// Pops the current breadcrumb.
    pub fn advance(&mut self) -> TrailStep {
        if let Some(trail) = self.trail.as_mut() {
            trail.points.pop_front();
        }
        self.consumed += 1;

        match self.current() {
            Some(next) if self.consumed < MAX_BREADCRUMBS_TO_FOLLOW => TrailStep::Next(next),
            _ => {
                self.trail = None;
                TrailStep::Exhausted
            },
        }
    }

    /// Breadcrumbs consumed since the last reset.
    #[must_use]
    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    /// The retained trail, if any.
    #[must_use]
    pub fn trail(&self) -> Option<&MemoryTrail> {
        self.trail.as_ref()
    }

    /// Discards the trail.
    pub fn clear(&mut self) {
        self.trail = None;
    }

    /// Restarts the follow count.
    pub fn reset_progress(&mut self) {
        self.consumed = 0;
    }
}

fn closest_index(points: &[Vec2], to: Vec2) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance(to);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect()
    }

    #[test]
    fn test_accept_rejects_visible_and_empty() {
        let mut follower = TrailFollower::default();
        let t0 = Millis::ZERO;
        assert_eq!(
            follower.accept(&line(3), Vec2::ZERO, true, true, None, t0),
            Err(TrailRejection::TargetVisible)
        );
        assert_eq!(
            follower.accept(&[], Vec2::ZERO, false, true, None, t0),
            Err(TrailRejection::Empty)
        );
        assert_eq!(
            follower.accept(&[Vec2::new(f32::NAN, 0.0)], Vec2::ZERO, false, true, None, t0),
            Err(TrailRejection::Malformed)
        );
        assert!(follower.trail().is_none());
    }

    #[test]
    fn test_acceptance_radius_only_for_unseen_targets() {
        let far = vec![Vec2::new(900.0, 0.0), Vec2::new(910.0, 0.0)];
        let mut follower = TrailFollower::default();
        assert_eq!(
            follower.accept(&far, Vec2::ZERO, false, false, None, Millis::ZERO),
            Err(TrailRejection::TooFar)
        );
        assert!(follower
            .accept(&far, Vec2::ZERO, false, true, None, Millis::ZERO)
            .is_ok());
    }

    #[test]
    fn test_trim_to_last_seen() {
        let mut follower = TrailFollower::default();
        follower
            .accept(&line(6), Vec2::ZERO, false, true, Some(Vec2::new(31.0, 2.0)), Millis::ZERO)
            .expect("accepted");
        assert_eq!(follower.current(), Some(Vec2::new(30.0, 0.0)));
        assert_eq!(follower.trail().map(MemoryTrail::len), Some(3));
    }

    #[test]
    fn test_capacity_keeps_leading_points() {
        let trail = MemoryTrail::new(line(40), Millis::ZERO);
        assert_eq!(trail.len(), TRAIL_CAPACITY);
        assert_eq!(trail.head(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_trail_expires_after_ttl() {
        let mut follower = TrailFollower::default();
        follower
            .accept(&line(3), Vec2::ZERO, false, true, None, Millis::new(1_000))
            .expect("accepted");
        assert!(!follower.expire(Millis::new(6_000)));
        assert!(follower.is_followable());
        assert!(follower.expire(Millis::new(6_001)));
        assert!(!follower.is_followable());
    }

    #[test]
    fn test_follow_cap() {
        let mut follower = TrailFollower::default();
        follower
            .accept(&line(10), Vec2::ZERO, false, true, None, Millis::ZERO)
            .expect("accepted");

        assert_eq!(follower.advance(), TrailStep::Next(Vec2::new(10.0, 0.0)));
        assert_eq!(follower.advance(), TrailStep::Next(Vec2::new(20.0, 0.0)));
        assert_eq!(follower.advance(), TrailStep::Exhausted);
        assert_eq!(follower.consumed(), MAX_BREADCRUMBS_TO_FOLLOW);
        assert!(follower.trail().is_none());

        // A fresh trail is still capped until progress is reset.
        follower
            .accept(&line(10), Vec2::ZERO, false, true, None, Millis::ZERO)
            .expect("accepted");
        assert!(!follower.is_followable());
        follower.reset_progress();
        assert!(follower.is_followable());
    }

    #[test]
    fn test_short_trail_exhausts_early() {
        let mut follower = TrailFollower::default();
        follower
            .accept(&line(1), Vec2::ZERO, false, true, None, Millis::ZERO)
            .expect("accepted");
        assert_eq!(follower.advance(), TrailStep::Exhausted);
        assert_eq!(follower.consumed(), 1);
    }
}
