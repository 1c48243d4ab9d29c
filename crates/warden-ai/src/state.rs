//! Behavior states and the transition function that selects one per tick.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CombatRanges;
use crate::constants::MELEE_TO_RANGE_DELAY_MS;

/// Top-level behavior of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Wandering the patrol area (or standing if there is none)
    #[default]
    Patrol,
    /// Closing on the target or walking its breadcrumbs
    Chase,
    /// Sampling random points near where the trail ran out
    Search,
    /// Holding position and swinging
    MeleeAttack,
    /// Shooting, or kiting for ranged-only agents
    RangeAttack,
    /// Nothing to do
    Idle,
}

impl BehaviorState {
    /// Whether this is one of the attack states.
    #[must_use]
    pub fn is_attack(self) -> bool {
        matches!(self, Self::MeleeAttack | Self::RangeAttack)
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Patrol => "patrol",
            Self::Chase => "chase",
            Self::Search => "search",
            Self::MeleeAttack => "melee",
            Self::RangeAttack => "range",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// Everything the transition function looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionInputs {
    /// A melee swing is playing
    pub melee_active: bool,
    /// A ranged attack is playing
    pub range_active: bool,
    /// Target is in sight
    pub target_visible: bool,
    /// Distance to the target center
    pub distance: f32,
    /// Combat radii
    pub ranges: CombatRanges,
    /// Current mana
    pub mana: u32,
    /// Mana needed for one ranged attack
    pub range_cost: u32,
    /// Milliseconds since the last melee swing (None if never)
    pub since_last_melee: Option<u64>,
    /// A search just ended without finding the target
    pub search_completed: bool,
    /// A search session is running
    pub searching: bool,
    /// A breadcrumb trail is available and not exhausted
    pub trail_followable: bool,
    /// A patrol area is configured
    pub has_patrol_area: bool,
}

/// Selects this tick's behavior.
///
/// Playing attack animations lock their state. With the target in sight the
/// agent attacks or closes in; otherwise it patrols after a finished search,
/// keeps searching, walks breadcrumbs, patrols, or idles, in that order.
#[must_use]
pub fn next_state(inputs: &TransitionInputs) -> BehaviorState {
    if inputs.melee_active {
        return BehaviorState::MeleeAttack;
    }
    if inputs.range_active {
        return BehaviorState::RangeAttack;
    }

    if inputs.target_visible {
        return select_engagement(inputs);
    }

    if inputs.search_completed {
        BehaviorState::Patrol
    } else if inputs.searching {
        BehaviorState::Search
    } else if inputs.trail_followable {
        BehaviorState::Chase
    } else if inputs.has_patrol_area {
        BehaviorState::Patrol
    } else {
        BehaviorState::Idle
    }
}

fn select_engagement(inputs: &TransitionInputs) -> BehaviorState {
    let ranges = &inputs.ranges;
    let distance = inputs.distance;
    let can_melee = ranges.can_melee();
    let can_range = ranges.can_range();

    if !can_melee && can_range && distance < ranges.range_exit {
        return BehaviorState::RangeAttack;
    }

    if can_melee && can_range && inputs.mana < inputs.range_cost {
        return if distance <= ranges.melee_enter {
            BehaviorState::MeleeAttack
        } else {
            BehaviorState::Chase
        };
    }

    let melee_settled = inputs
        .since_last_melee
        .map_or(true, |elapsed| elapsed >= MELEE_TO_RANGE_DELAY_MS);

    if can_melee && distance <= ranges.melee_enter {
        BehaviorState::MeleeAttack
    } else if can_range
        && distance >= ranges.range_exit
        && distance <= ranges.range_enter
        && melee_settled
    {
        BehaviorState::RangeAttack
    } else {
        BehaviorState::Chase
    }
}
