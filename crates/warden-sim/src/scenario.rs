//! Scenario configuration.
//!
//! A scenario describes the arena (tile rows and loose obstacles), the
//! scripted target and the agents to spawn. Scenarios are loaded from and
//! saved to TOML files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use warden_ai::{presets::AgentPreset, AgentConfig, ConfigError, ObstacleMap};
use warden_common::{ObstacleError, Rect, Vec2, WardenError, WardenResult};

/// Default scenario file name.
pub const SCENARIO_FILE: &str = "warden.toml";

/// Errors raised while building a simulation from a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Obstacle layout is invalid
    #[error("Invalid obstacle layout: {0}")]
    Obstacles(#[from] ObstacleError),

    /// An agent configuration failed validation
    #[error("Invalid agent '{name}': {source}")]
    Agent {
        /// Agent name
        name: String,
        /// Validation failure
        #[source]
        source: ConfigError,
    },

    /// Tick length must be positive
    #[error("Tick length must be positive")]
    ZeroTick,
}

/// Result type for scenario setup.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// A loose rectangular obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

/// The scripted target the agents hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpec {
    /// Starting center
    pub start: Vec2,
    /// Waypoints walked in order, looping
    pub waypoints: Vec<Vec2>,
    /// Units per tick
    pub speed: f32,
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
    /// Maximum health
    pub max_health: u32,
    /// Damage dealt to the nearest agent in reach (0 = harmless)
    pub attack_damage: u32,
    /// Reach of the target's attack
    pub attack_range: f32,
    /// Milliseconds between target attacks
    pub attack_interval_ms: u64,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            start: Vec2::new(100.0, 100.0),
            waypoints: vec![
                Vec2::new(100.0, 100.0),
                Vec2::new(500.0, 100.0),
                Vec2::new(500.0, 400.0),
                Vec2::new(100.0, 400.0),
            ],
            speed: 2.0,
            width: 20.0,
            height: 20.0,
            max_health: 100,
            attack_damage: 10,
            attack_range: 40.0,
            attack_interval_ms: 800,
        }
    }
}

/// One agent to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpawn {
    /// Base configuration
    pub preset: AgentPreset,
    /// Spawn point
    pub position: Vec2,
    /// Display name override
    #[serde(default)]
    pub name: Option<String>,
    /// Respawn delay override
    #[serde(default)]
    pub respawn_delay_ms: Option<u64>,
    /// Patrol area override
    #[serde(default)]
    pub patrol_area: Option<Rect>,
}

impl AgentSpawn {
    /// Creates a spawn from a preset.
    #[must_use]
    pub fn new(preset: AgentPreset, position: Vec2) -> Self {
        Self {
            preset,
            position,
            name: None,
            respawn_delay_ms: None,
            patrol_area: None,
        }
    }

    /// Sets the patrol area.
    #[must_use]
    pub fn with_patrol_area(mut self, area: Rect) -> Self {
        self.patrol_area = Some(area);
        self
    }

    /// Resolves the preset and overrides into a full configuration.
    #[must_use]
    pub fn config(&self) -> AgentConfig {
        let mut config = self.preset.config();
        if let Some(name) = &self.name {
            config = config.with_name(name.clone());
        }
        if let Some(area) = self.patrol_area {
            config = config.with_patrol_area(area);
        }
        if let Some(delay) = self.respawn_delay_ms {
            config = config.with_respawn_delay(delay);
        }
        config
    }
}

/// Scenario parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    // === Timing ===
    /// Milliseconds per tick
    pub tick_ms: u64,
    /// Total simulated time
    pub duration_ms: u64,
    /// Random seed (None = random)
    pub seed: Option<u64>,

    // === Arena ===
    /// Tile edge length for `tiles`
    pub tile_size: f32,
    /// Comma-separated tile rows, `1` solid and `0` open
    pub tiles: Vec<String>,
    /// Loose obstacles
    pub obstacles: Vec<ObstacleSpec>,

    // === Actors ===
    /// The hunted target
    pub target: TargetSpec,
    /// Agents to spawn
    pub agents: Vec<AgentSpawn>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let patrol = Rect::from_xywh(250.0, 200.0, 150.0, 120.0);
        Self {
            tick_ms: 16,
            duration_ms: 30_000,
            seed: None,

            tile_size: 32.0,
            tiles: Vec::new(),
            obstacles: vec![
                ObstacleSpec {
                    x: 280.0,
                    y: 160.0,
                    width: 40.0,
                    height: 120.0,
                },
                ObstacleSpec {
                    x: 180.0,
                    y: 300.0,
                    width: 120.0,
                    height: 32.0,
                },
            ],

            target: TargetSpec::default(),
            agents: vec![
                AgentSpawn::new(AgentPreset::Bandit, Vec2::new(320.0, 320.0)).with_patrol_area(patrol),
                AgentSpawn::new(AgentPreset::HighMage, Vec2::new(420.0, 250.0)),
                AgentSpawn::new(AgentPreset::Musketeer, Vec2::new(200.0, 220.0)).with_patrol_area(patrol),
                AgentSpawn::new(AgentPreset::TrainingDummy, Vec2::new(560.0, 300.0)),
            ],
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario from a specific path.
    /// Returns the default scenario if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Scenario file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read scenario file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded scenario from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse scenario file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open scenario file: {e}");
                Self::default()
            },
        }
    }

    /// Save the scenario to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> WardenResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| WardenError::Config(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved scenario to {}", path.display());
        Ok(())
    }

    /// Builds the obstacle map from tile rows and loose obstacles.
    pub fn build_obstacles(&self) -> ScenarioResult<ObstacleMap> {
        let mut map = if self.tiles.is_empty() {
            ObstacleMap::new()
        } else {
            ObstacleMap::from_tile_rows(&self.tiles, self.tile_size)?
        };
        for o in &self.obstacles {
            map.add_obstacle(o.x, o.y, o.width, o.height)?;
        }
        Ok(map)
    }

    /// Resolves and validates every agent configuration.
    pub fn agent_configs(&self) -> ScenarioResult<Vec<(AgentConfig, Vec2)>> {
        self.agents
            .iter()
            .map(|spawn| {
                let config = spawn.config();
                config
                    .validate()
                    .map_err(|source| ScenarioError::Agent {
                        name: config.name.clone(),
                        source,
                    })?;
                Ok((config, spawn.position))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_valid() {
        let scenario = ScenarioConfig::default();
        let map = scenario.build_obstacles().expect("obstacles");
        assert_eq!(map.len(), 2);
        assert_eq!(scenario.agent_configs().expect("agents").len(), 4);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = ScenarioConfig::load_from(dir.path().join("missing.toml"));
        assert_eq!(scenario, ScenarioConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SCENARIO_FILE);

        let mut scenario = ScenarioConfig::default();
        scenario.seed = Some(42);
        scenario.tiles = vec!["0,1,1,0".to_string(), "0,0,0,0".to_string()];
        scenario.save_to(&path).expect("save");

        let loaded = ScenarioConfig::load_from(&path);
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.tiles.len(), 2);
        assert_eq!(loaded.agents.len(), scenario.agents.len());
        assert_eq!(loaded.agents[1].preset, AgentPreset::HighMage);
        assert_eq!(loaded.build_obstacles().expect("obstacles").len(), 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.toml");
        let contents = r#"
duration_ms = 500

[[agents]]
preset = "bandit"
position = [10.0, 20.0]
respawn_delay_ms = 1000
"#;
        fs::write(&path, contents).expect("write");

        let loaded = ScenarioConfig::load_from(&path);
        assert_eq!(loaded.duration_ms, 500);
        assert_eq!(loaded.tick_ms, 16);
        assert_eq!(loaded.agents.len(), 1);
        let config = loaded.agents[0].config();
        assert_eq!(config.respawn_delay_ms, Some(1_000));
        assert_eq!(config.name, "Bandit");
    }

    #[test]
    fn test_garbage_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "tick_ms = \"fast\"").expect("write");
        assert_eq!(ScenarioConfig::load_from(&path), ScenarioConfig::default());
    }

    #[test]
    fn test_bad_tiles_rejected() {
        let scenario = ScenarioConfig {
            tiles: vec!["0,1,x".to_string()],
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            scenario.build_obstacles(),
            Err(ScenarioError::Obstacles(ObstacleError::UnknownTile { .. }))
        ));
    }
}
