//! # Warden
//!
//! Runs a scenario headlessly and logs what the agents did.
//!
//! Usage: `warden [scenario.toml]`, or `warden --init [scenario.toml]` to
//! write the default scenario.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use warden_sim::{ScenarioConfig, Simulation, SCENARIO_FILE};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("warden=info".parse()?))
        .init();

    info!("Warden {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1).peekable();
    let init = args.peek().is_some_and(|a| a == "--init");
    if init {
        args.next();
    }
    let path = args.next().map_or_else(|| PathBuf::from(SCENARIO_FILE), PathBuf::from);

    if init {
        ScenarioConfig::default().save_to(&path)?;
        return Ok(());
    }

    let scenario = ScenarioConfig::load_from(&path);
    let mut sim = Simulation::from_scenario(&scenario)?;
    let stats = sim.run_for(scenario.duration_ms);

    info!(
        ticks = stats.ticks,
        melee_hits = stats.melee_hits,
        projectile_hits = stats.projectile_hits,
        target_deaths = stats.target_deaths,
        agent_deaths = stats.agent_deaths,
        respawns = stats.respawns,
        searches = stats.searches_started,
        abandoned = stats.searches_completed,
        step_backs = stats.step_backs,
        "Run finished"
    );
    for agent in sim.agents() {
        info!(
            name = %agent.config().name,
            state = %agent.state(),
            alive = agent.is_alive(),
            health = agent.health(),
            mana = agent.mana(),
            position = ?agent.position(),
            "Agent summary"
        );
    }

    Ok(())
}
