//! # Warden AI
//!
//! Hostile agent controller for Project Warden.
//!
//! This crate drives a single AI actor that hunts one target:
//! - Perception with sampled line of sight
//! - Behavior state machine (patrol, chase, search, melee, range, idle)
//! - Breadcrumb memory trails with expiry and a follow cap
//! - Randomized search sessions
//! - Collision-aware movement with sliding and forced unsticking
//! - Stuck detection and step-back recovery
//! - Melee swings, ranged attacks and projectiles
//! - Health, mana, cooldowns, death and respawn
//!
//! Time and randomness are injected on every tick, so the whole controller
//! is deterministic under a manual clock and a scripted random source.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod agent;
pub mod collision;
pub mod config;
pub mod constants;
pub mod direction;
pub mod effects;
pub mod melee;
pub mod memory;
pub mod movement;
pub mod patrol;
pub mod perception;
pub mod presets;
pub mod projectile;
pub mod ranged;
pub mod search;
pub mod state;
pub mod stuck;
pub mod swing;
pub mod vitals;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::agent::*;
    pub use crate::collision::*;
    pub use crate::config::*;
    pub use crate::direction::*;
    pub use crate::effects::*;
    pub use crate::melee::*;
    pub use crate::memory::*;
    pub use crate::movement::*;
    pub use crate::patrol::*;
    pub use crate::perception::*;
    pub use crate::presets::AgentPreset;
    pub use crate::projectile::*;
    pub use crate::ranged::*;
    pub use crate::search::*;
    pub use crate::state::*;
    pub use crate::stuck::*;
    pub use crate::swing::*;
    pub use crate::vitals::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use warden_common::{Millis, Rect, SequenceRng, Vec2};

    #[test]
    fn test_prelude_builds_an_agent() {
        let map = ObstacleMap::new();
        let mut rng = SequenceRng::constant(0.5);
        let mut agent = Agent::new(AgentPreset::Bandit.config(), Vec2::ZERO).expect("valid");

        let mut ctx = TickContext::new(Millis::ZERO, &map, &mut rng);
        let target = Rect::from_center(Vec2::new(120.0, 0.0), 20.0, 20.0);
        let effects = agent.tick(&mut ctx, &target);

        assert!(agent.can_see_target());
        assert_eq!(agent.state(), BehaviorState::Chase);
        assert!(effects.contains(&AgentEffect::StateChanged {
            from: BehaviorState::Patrol,
            to: BehaviorState::Chase,
        }));
    }

    #[test]
    fn test_dummy_never_moves() {
        let map = ObstacleMap::new();
        let mut rng = SequenceRng::constant(0.5);
        let spawn = Vec2::new(10.0, 10.0);
        let mut agent = Agent::new(AgentPreset::TrainingDummy.config(), spawn).expect("valid");
        let target = Rect::from_center(Vec2::new(20.0, 10.0), 20.0, 20.0);

        for t in 0..50 {
            let mut ctx = TickContext::new(Millis::new(t * 16), &map, &mut rng);
            agent.tick(&mut ctx, &target);
        }
        assert_eq!(agent.position(), spawn);
        assert_eq!(agent.state(), BehaviorState::Idle);
    }
}
