//! Simulation world: obstacles, the target, agents, and the glue between them.

use tracing::{debug, info};
use warden_ai::{Agent, AgentEffect, ObstacleMap, TickContext};
use warden_common::{AgentId, Clock, FastRandom, ManualClock, Millis};

use crate::scenario::{ScenarioConfig, ScenarioError, ScenarioResult};
use crate::target::{BreadcrumbRecorder, ScriptedTarget};

/// Counters collected over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Ticks simulated
    pub ticks: u64,
    /// Melee hits landed on the target
    pub melee_hits: u32,
    /// Projectiles that struck the target
    pub projectile_hits: u32,
    /// Times the target died
    pub target_deaths: u32,
    /// Times an agent died
    pub agent_deaths: u32,
    /// Agent respawns
    pub respawns: u32,
    /// Searches started
    pub searches_started: u32,
    /// Searches that ran out
    pub searches_completed: u32,
    /// Forced step-backs
    pub step_backs: u32,
}

struct AgentSlot {
    agent: Agent,
    trail_revision: Option<u64>,
}

/// Owns everything and advances it one tick at a time.
pub struct Simulation {
    clock: ManualClock,
    tick_ms: u64,
    obstacles: ObstacleMap,
    rng: FastRandom,
    target: ScriptedTarget,
    recorder: BreadcrumbRecorder,
    slots: Vec<AgentSlot>,
    stats: SimulationStats,
}

impl Simulation {
    /// Builds the world described by a scenario.
    pub fn from_scenario(scenario: &ScenarioConfig) -> ScenarioResult<Self> {
        if scenario.tick_ms == 0 {
            return Err(ScenarioError::ZeroTick);
        }

        let obstacles = scenario.build_obstacles()?;
        let slots = scenario
            .agent_configs()?
            .into_iter()
            .map(|(config, position)| {
                let name = config.name.clone();
                Agent::new(config, position)
                    .map(|agent| AgentSlot {
                        agent,
                        trail_revision: None,
                    })
                    .map_err(|source| ScenarioError::Agent { name, source })
            })
            .collect::<ScenarioResult<Vec<_>>>()?;

        let rng = scenario.seed.map_or_else(FastRandom::new, FastRandom::seeded);

        info!(
            agents = slots.len(),
            obstacles = obstacles.len(),
            tick_ms = scenario.tick_ms,
            "Simulation ready"
        );

        Ok(Self {
            clock: ManualClock::new(0),
            tick_ms: scenario.tick_ms,
            obstacles,
            rng,
            target: ScriptedTarget::new(&scenario.target),
            recorder: BreadcrumbRecorder::new(),
            slots,
            stats: SimulationStats::default(),
        })
    }

    /// Advances the world by one tick and returns every agent effect.
    pub fn step(&mut self) -> Vec<(AgentId, AgentEffect)> {
        let now = self.clock.now();
        let mut reported = Vec::new();

        self.target.update(now);
        self.update_breadcrumbs(now);

        let target_box = self.target.hitbox();
        for slot in &mut self.slots {
            let agent = &mut slot.agent;
            let mut ctx = TickContext::new(now, &self.obstacles, &mut self.rng);
            let effects = agent.tick(&mut ctx, &target_box);

            for effect in effects {
                match effect {
                    AgentEffect::MeleeHit { damage, .. } => {
                        self.stats.melee_hits += 1;
                        self.target.apply_damage(damage);
                    },
                    AgentEffect::SearchStarted => self.stats.searches_started += 1,
                    AgentEffect::SearchCompleted => self.stats.searches_completed += 1,
                    AgentEffect::StepBackStarted => self.stats.step_backs += 1,
                    AgentEffect::Respawned { .. } => {
                        self.stats.respawns += 1;
                        slot.trail_revision = None;
                    },
                    _ => {},
                }
                reported.push((agent.id(), effect));
            }
            agent.consume_melee_hitbox();

            for projectile in agent.projectiles_mut().iter_mut() {
                if projectile.is_alive() && projectile.bounds().overlaps(&target_box) {
                    projectile.on_hit();
                    self.stats.projectile_hits += 1;
                    self.target.apply_damage(projectile.damage());
                }
            }
        }

        self.target_strikes_back(now);

        if !self.target.is_alive() {
            self.stats.target_deaths += 1;
            info!(at = %now, "Target died");
            for slot in &mut self.slots {
                slot.agent.clear_target_memory();
                slot.trail_revision = None;
            }
            self.recorder.clear();
            self.target.respawn();
        }

        self.stats.ticks += 1;
        self.clock.advance(self.tick_ms);
        reported
    }

    /// Records the target's path while it is watched and hands snapshots to
    /// agents that are hunting it from memory.
    fn update_breadcrumbs(&mut self, now: Millis) {
        let agents = self.slots.iter().map(|s| &s.agent);
        if agents.clone().any(Agent::is_searching) {
            self.recorder.clear();
        } else if agents.clone().any(|a| a.is_alive() && a.can_see_target()) {
            self.recorder.record(self.target.position(), now);
        }

        if self.recorder.is_empty() {
            return;
        }
        let revision = self.recorder.revision();
        let snapshot = self.recorder.snapshot();
        for slot in &mut self.slots {
            let agent = &mut slot.agent;
            let wants_trail = agent.is_alive()
                && agent.has_seen_target()
                && !agent.can_see_target()
                && !agent.is_searching();
            if wants_trail && slot.trail_revision != Some(revision) {
                let accepted = agent.push_memory_trail(&snapshot, now);
                debug!(agent = %agent.id(), accepted, points = snapshot.len(), "Pushed breadcrumb trail");
                slot.trail_revision = Some(revision);
            }
        }
    }

    fn target_strikes_back(&mut self, now: Millis) {
        if !self.target.is_alive() {
            return;
        }
        let origin = self.target.position();
        let nearest = self
            .slots
            .iter_mut()
            .map(|slot| &mut slot.agent)
            .filter(|agent| agent.is_alive())
            .map(|agent| (agent.position().distance(origin), agent))
            .min_by(|(a, _), (b, _)| a.total_cmp(b));

        let Some((distance, agent)) = nearest else {
            return;
        };
        let Some(damage) = self.target.try_attack(now, distance) else {
            return;
        };
        let outcome = agent.apply_damage(damage, now);
        if outcome.killed {
            self.stats.agent_deaths += 1;
        }
    }

    /// Runs ticks until `duration_ms` of simulated time has passed.
    pub fn run_for(&mut self, duration_ms: u64) -> SimulationStats {
        let end = self.clock.now().plus(duration_ms);
        while self.clock.now() < end {
            self.step();
        }
        self.stats
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Agents in spawn order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.slots.iter().map(|s| &s.agent)
    }

    /// The target.
    #[must_use]
    pub fn target(&self) -> &ScriptedTarget {
        &self.target
    }

    /// The breadcrumb recorder.
    #[must_use]
    pub fn recorder(&self) -> &BreadcrumbRecorder {
        &self.recorder
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{AgentSpawn, ObstacleSpec, TargetSpec};
    use warden_ai::presets::AgentPreset;
    use warden_common::Vec2;

    fn arena(target: TargetSpec, agents: Vec<AgentSpawn>) -> ScenarioConfig {
        ScenarioConfig {
            seed: Some(7),
            obstacles: Vec::new(),
            target,
            agents,
            ..ScenarioConfig::default()
        }
    }

    fn parked_target(at: Vec2) -> TargetSpec {
        TargetSpec {
            start: at,
            waypoints: Vec::new(),
            attack_damage: 0,
            ..TargetSpec::default()
        }
    }

    #[test]
    fn test_zero_tick_rejected() {
        let scenario = ScenarioConfig {
            tick_ms: 0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            Simulation::from_scenario(&scenario),
            Err(ScenarioError::ZeroTick)
        ));
    }

    #[test]
    fn test_bandit_kills_parked_target() {
        let scenario = arena(
            parked_target(Vec2::new(100.0, 0.0)),
            vec![AgentSpawn::new(AgentPreset::Bandit, Vec2::ZERO)],
        );
        let mut sim = Simulation::from_scenario(&scenario).expect("valid");

        // 5 damage per swing, one swing every 1.5s.
        let stats = sim.run_for(40_000);
        assert!(stats.melee_hits >= 20);
        assert!(stats.target_deaths >= 1);
        assert_eq!(stats.projectile_hits, 0);
    }

    #[test]
    fn test_mage_projectiles_hit_target() {
        let scenario = arena(
            parked_target(Vec2::new(180.0, 0.0)),
            vec![AgentSpawn::new(AgentPreset::HighMage, Vec2::ZERO)],
        );
        let mut sim = Simulation::from_scenario(&scenario).expect("valid");

        let stats = sim.run_for(5_000);
        assert!(stats.projectile_hits >= 1);
        assert!(sim.target().health() < 100);
        let mage = sim.agents().next().expect("agent");
        assert!(mage.mana() < 100);
    }

    #[test]
    fn test_target_fights_back() {
        let mut target = parked_target(Vec2::new(30.0, 0.0));
        target.attack_damage = 50;
        target.attack_interval_ms = 100;
        let spawn = AgentSpawn {
            respawn_delay_ms: Some(60_000),
            ..AgentSpawn::new(AgentPreset::Bandit, Vec2::ZERO)
        };
        let mut sim = Simulation::from_scenario(&arena(target, vec![spawn])).expect("valid");

        let stats = sim.run_for(1_000);
        assert_eq!(stats.agent_deaths, 1);
        assert!(!sim.agents().any(Agent::is_alive));
    }

    #[test]
    fn test_lost_target_leaves_trail() {
        // Target runs behind a wall; the bandit follows the crumbs, then searches.
        let target = TargetSpec {
            start: Vec2::new(150.0, 0.0),
            waypoints: vec![Vec2::new(150.0, 0.0), Vec2::new(150.0, 600.0)],
            speed: 3.0,
            attack_damage: 0,
            ..TargetSpec::default()
        };
        let mut scenario = arena(target, vec![AgentSpawn::new(AgentPreset::Bandit, Vec2::ZERO)]);
        scenario.obstacles = vec![ObstacleSpec {
            x: 40.0,
            y: 60.0,
            width: 200.0,
            height: 20.0,
        }];
        let mut sim = Simulation::from_scenario(&scenario).expect("valid");

        let mut saw_trail = false;
        let mut searched = false;
        for _ in 0..1_500 {
            for (_, effect) in sim.step() {
                searched |= effect == AgentEffect::SearchStarted;
            }
            saw_trail |= !sim.recorder().is_empty();
        }
        assert!(saw_trail);
        assert!(searched);
    }

    #[test]
    fn test_run_for_advances_clock() {
        let scenario = arena(parked_target(Vec2::new(5_000.0, 0.0)), Vec::new());
        let mut sim = Simulation::from_scenario(&scenario).expect("valid");
        let stats = sim.run_for(160);
        assert_eq!(stats.ticks, 10);
        assert_eq!(sim.now(), Millis::new(160));
    }
}
