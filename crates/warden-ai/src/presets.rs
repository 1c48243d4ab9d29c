//! Ready-made agent configurations.

use serde::{Deserialize, Serialize};

use crate::config::{AgentConfig, AnimationFrames, CombatRanges};
use crate::direction::FacingTable;

/// Respawn delay of the regular roster.
const ROSTER_RESPAWN_MS: u64 = 10_000;

/// Named preset, usable from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPreset {
    /// Stationary target that never fights back
    TrainingDummy,
    /// Melee brawler
    Bandit,
    /// Ranged caster that keeps its distance
    HighMage,
    /// Fights both up close and at range
    Musketeer,
}

impl AgentPreset {
    /// All presets.
    pub const ALL: [AgentPreset; 4] = [
        AgentPreset::TrainingDummy,
        AgentPreset::Bandit,
        AgentPreset::HighMage,
        AgentPreset::Musketeer,
    ];

    /// Builds the configuration for this preset.
    #[must_use]
    pub fn config(self) -> AgentConfig {
        match self {
            Self::TrainingDummy => training_dummy(),
            Self::Bandit => bandit(),
            Self::HighMage => high_mage(),
            Self::Musketeer => musketeer(),
        }
    }
}

fn frames(movement: u8, melee: u8, range: u8) -> AnimationFrames {
    AnimationFrames {
        movement: FacingTable::uniform(movement),
        melee: FacingTable::uniform(melee),
        range: FacingTable::uniform(range),
    }
}

/// Stationary practice target with a tall hitbox; respawns quickly.
#[must_use]
pub fn training_dummy() -> AgentConfig {
    AgentConfig::default()
        .with_name("Practice Dummy")
        .with_stats(100, 0, 0.0)
        .with_ranges(CombatRanges {
            sight: 0.0,
            melee_enter: 0.0,
            melee_exit: 0.0,
            range_enter: 0.0,
            range_exit: 0.0,
        })
        .with_damage(0, 0)
        .with_body(40.0, 45.0, 7.5)
        .with_animations(frames(0, 0, 0))
        .with_respawn_delay(3_000)
}

/// Melee-only fighter.
#[must_use]
pub fn bandit() -> AgentConfig {
    AgentConfig::default()
        .with_name("Bandit")
        .with_stats(100, 100, 1.5)
        .with_ranges(CombatRanges {
            sight: 300.0,
            melee_enter: 40.0,
            melee_exit: 60.0,
            range_enter: 0.0,
            range_exit: 0.0,
        })
        .with_damage(5, 0)
        .with_animations(frames(8, 4, 0))
        .with_respawn_delay(ROSTER_RESPAWN_MS)
}

/// Ranged-only caster; kites when the target gets close.
#[must_use]
pub fn high_mage() -> AgentConfig {
    AgentConfig::default()
        .with_name("High Mage")
        .with_stats(100, 100, 1.5)
        .with_ranges(CombatRanges {
            sight: 300.0,
            melee_enter: 0.0,
            melee_exit: 0.0,
            range_enter: 200.0,
            range_exit: 150.0,
        })
        .with_damage(0, 5)
        .with_projectile_spawn_frame(5)
        .with_animations(frames(8, 0, 5))
        .with_respawn_delay(ROSTER_RESPAWN_MS)
}

/// Hybrid fighter; falls back to melee when out of mana.
#[must_use]
pub fn musketeer() -> AgentConfig {
    AgentConfig::default()
        .with_name("Musketeer")
        .with_stats(100, 100, 1.5)
        .with_ranges(CombatRanges {
            sight: 300.0,
            melee_enter: 40.0,
            melee_exit: 60.0,
            range_enter: 200.0,
            range_exit: 150.0,
        })
        .with_damage(8, 8)
        .with_projectile_spawn_frame(3)
        .with_animations(frames(8, 4, 4))
        .with_respawn_delay(ROSTER_RESPAWN_MS)
}

/// Baseline configuration to tailor with the `with_*` builders.
#[must_use]
pub fn custom(name: impl Into<String>) -> AgentConfig {
    AgentConfig::default().with_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for preset in AgentPreset::ALL {
            assert!(preset.config().validate().is_ok(), "{preset:?}");
        }
    }

    #[test]
    fn test_capabilities_match_roles() {
        assert!(!training_dummy().ranges.can_melee());
        assert!(!training_dummy().ranges.can_range());
        assert!(bandit().ranges.can_melee() && !bandit().ranges.can_range());
        assert!(!high_mage().ranges.can_melee() && high_mage().ranges.can_range());
        assert!(musketeer().ranges.can_melee() && musketeer().ranges.can_range());
    }

    #[test]
    fn test_preset_names_deserialize() {
        let preset: AgentPreset = serde_json::from_str("\"high_mage\"").expect("parse");
        assert_eq!(preset, AgentPreset::HighMage);
        assert_eq!(custom("Grunt").name, "Grunt");
    }
}
