//! Per-agent configuration.
//!
//! Every tunable that differs between agent kinds lives in [`AgentConfig`].
//! Engine-wide constants live in [`crate::constants`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_common::Rect;

use crate::constants::MELEE_CAPABLE_MIN_RANGE;
use crate::direction::FacingTable;

/// Errors raised when an agent configuration is inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Melee enter radius exceeds the exit radius
    #[error("Melee enter radius {enter} exceeds exit radius {exit}")]
    MeleeHysteresis {
        /// Enter radius
        enter: f32,
        /// Exit radius
        exit: f32,
    },

    /// Ranged exit radius exceeds the enter radius
    #[error("Range exit radius {exit} exceeds enter radius {enter}")]
    RangeBand {
        /// Enter radius
        enter: f32,
        /// Exit radius
        exit: f32,
    },

    /// A value that must be finite and non-negative is not
    #[error("Field {field} must be finite and non-negative, got {value}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Body hitbox has no area
    #[error("Body hitbox must have positive size, got {width}x{height}")]
    EmptyBody {
        /// Width
        width: f32,
        /// Height
        height: f32,
    },

    /// Maximum health must be positive
    #[error("Maximum health must be positive")]
    ZeroHealth,

    /// Patrol area is degenerate
    #[error("Invalid patrol area: {0:?}")]
    InvalidPatrolArea(Rect),
}

/// Combat radii, all in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRanges {
    /// Maximum distance at which the target can be seen
    pub sight: f32,
    /// Distance at which a melee swing starts
    pub melee_enter: f32,
    /// Distance beyond which the agent stops holding melee position
    pub melee_exit: f32,
    /// Outer edge of the ranged band
    pub range_enter: f32,
    /// Inner edge of the ranged band
    pub range_exit: f32,
}

impl CombatRanges {
    /// Whether the agent can melee at all.
    #[must_use]
    pub fn can_melee(&self) -> bool {
        self.melee_enter > MELEE_CAPABLE_MIN_RANGE
    }

    /// Whether the agent can attack at range at all.
    #[must_use]
    pub fn can_range(&self) -> bool {
        self.range_enter > 0.0
    }
}

impl Default for CombatRanges {
    fn default() -> Self {
        Self {
            sight: 300.0,
            melee_enter: 40.0,
            melee_exit: 60.0,
            range_enter: 0.0,
            range_exit: 0.0,
        }
    }
}

/// Frame counts per facing for each animation. Zero means the animation is
/// missing for that facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationFrames {
    /// Walking animation
    pub movement: FacingTable<u8>,
    /// Melee swing animation
    pub melee: FacingTable<u8>,
    /// Ranged attack animation (falls back to `movement` when zero)
    pub range: FacingTable<u8>,
}

impl Default for AnimationFrames {
    fn default() -> Self {
        Self {
            movement: FacingTable::uniform(8),
            melee: FacingTable::uniform(4),
            range: FacingTable::uniform(0),
        }
    }
}

/// Per-agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Display name used in logs
    pub name: String,

    // === Stats ===
    /// Maximum health
    pub max_health: u32,
    /// Maximum mana
    pub max_mana: u32,
    /// Movement speed in units per tick
    pub base_speed: f32,

    // === Combat ===
    /// Combat radii
    pub ranges: CombatRanges,
    /// Damage per melee hit
    pub melee_damage: u32,
    /// Damage per projectile
    pub range_damage: u32,
    /// Side of the square melee hit volume
    pub melee_hitbox_size: f32,
    /// Distance of the melee hit volume from the body center
    pub melee_hitbox_offset: f32,
    /// Projectile speed in units per tick
    pub projectile_speed: f32,
    /// Maximum projectile travel distance
    pub projectile_range: f32,
    /// Explicit projectile spawn frame (ignored when out of range)
    pub projectile_spawn_frame: Option<u8>,

    // === Body ===
    /// Body hitbox width
    pub body_width: f32,
    /// Body hitbox height
    pub body_height: f32,
    /// Vertical offset of the body hitbox from the agent position
    pub body_offset_y: f32,

    // === Lifecycle ===
    /// Delay before automatic respawn (None = stays dead)
    pub respawn_delay_ms: Option<u64>,
    /// Area to wander in while patrolling
    pub patrol_area: Option<Rect>,

    /// Animation frame counts
    pub animations: AnimationFrames,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "agent".to_string(),

            max_health: 100,
            max_mana: 100,
            base_speed: 1.5,

            ranges: CombatRanges::default(),
            melee_damage: 5,
            range_damage: 5,
            melee_hitbox_size: 30.0,
            melee_hitbox_offset: 20.0,
            projectile_speed: 4.0,
            projectile_range: 200.0,
            projectile_spawn_frame: None,

            body_width: 30.0,
            body_height: 21.0,
            body_offset_y: 0.0,

            respawn_delay_ms: None,
            patrol_area: None,

            animations: AnimationFrames::default(),
        }
    }
}

impl AgentConfig {
    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets maximum health and mana.
    #[must_use]
    pub fn with_stats(mut self, max_health: u32, max_mana: u32, base_speed: f32) -> Self {
        self.max_health = max_health;
        self.max_mana = max_mana;
        self.base_speed = base_speed;
        self
    }

    /// Sets the combat radii.
    #[must_use]
    pub fn with_ranges(mut self, ranges: CombatRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Sets melee and ranged damage.
    #[must_use]
    pub fn with_damage(mut self, melee: u32, range: u32) -> Self {
        self.melee_damage = melee;
        self.range_damage = range;
        self
    }

    /// Sets the body hitbox size and vertical offset.
    #[must_use]
    pub fn with_body(mut self, width: f32, height: f32, offset_y: f32) -> Self {
        self.body_width = width;
        self.body_height = height;
        self.body_offset_y = offset_y;
        self
    }

    /// Enables automatic respawn after a delay.
    #[must_use]
    pub fn with_respawn_delay(mut self, delay_ms: u64) -> Self {
        self.respawn_delay_ms = Some(delay_ms);
        self
    }

    /// Sets the patrol area.
    #[must_use]
    pub fn with_patrol_area(mut self, area: Rect) -> Self {
        self.patrol_area = Some(area);
        self
    }

    /// Sets the animation frame counts.
    #[must_use]
    pub fn with_animations(mut self, animations: AnimationFrames) -> Self {
        self.animations = animations;
        self
    }

    /// Sets the projectile spawn frame override.
    #[must_use]
    pub fn with_projectile_spawn_frame(mut self, frame: u8) -> Self {
        self.projectile_spawn_frame = Some(frame);
        self
    }

    /// Checks the configuration for inconsistencies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("base_speed", self.base_speed),
            ("ranges.sight", self.ranges.sight),
            ("ranges.melee_enter", self.ranges.melee_enter),
            ("ranges.melee_exit", self.ranges.melee_exit),
            ("ranges.range_enter", self.ranges.range_enter),
            ("ranges.range_exit", self.ranges.range_exit),
            ("melee_hitbox_size", self.melee_hitbox_size),
            ("melee_hitbox_offset", self.melee_hitbox_offset),
            ("projectile_speed", self.projectile_speed),
            ("projectile_range", self.projectile_range),
            ("body_offset_y", self.body_offset_y.abs()),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if self.max_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }

        if !(self.body_width > 0.0 && self.body_height > 0.0) {
            return Err(ConfigError::EmptyBody {
                width: self.body_width,
                height: self.body_height,
            });
        }

        let ranges = &self.ranges;
        if ranges.can_melee() && ranges.melee_enter > ranges.melee_exit {
            return Err(ConfigError::MeleeHysteresis {
                enter: ranges.melee_enter,
                exit: ranges.melee_exit,
            });
        }
        if ranges.can_range() && ranges.range_exit > ranges.range_enter {
            return Err(ConfigError::RangeBand {
                enter: ranges.range_enter,
                exit: ranges.range_exit,
            });
        }

        if let Some(area) = self.patrol_area {
            if !area.is_valid() {
                return Err(ConfigError::InvalidPatrolArea(area));
            }
        }

        Ok(())
    }
}
