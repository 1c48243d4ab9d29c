//! Effects reported by an agent tick for the orchestrator to apply.

use serde::{Deserialize, Serialize};
use warden_common::{Rect, Vec2};

use crate::state::BehaviorState;

/// Something observable that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentEffect {
    /// Behavior state changed
    StateChanged {
        /// Previous state
        from: BehaviorState,
        /// New state
        to: BehaviorState,
    },
    /// A melee hit volume was created
    HitVolumeCreated {
        /// Area covered
        volume: Rect,
    },
    /// A melee hit volume landed on the target; apply `damage` to it
    MeleeHit {
        /// Area covered
        volume: Rect,
        /// Damage to apply
        damage: u32,
    },
    /// A projectile left the agent
    ProjectileSpawned {
        /// Launch point
        origin: Vec2,
        /// Unit flight direction
        direction: Vec2,
    },
    /// The agent started searching for the target
    SearchStarted,
    /// The search ended without finding the target
    SearchCompleted,
    /// The agent began a forced step-back
    StepBackStarted,
    /// The agent came back to life
    Respawned {
        /// Spawn point
        at: Vec2,
    },
}
