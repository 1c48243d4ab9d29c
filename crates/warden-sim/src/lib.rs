//! # Warden Sim
//!
//! Headless scenario runner for Project Warden.
//!
//! This crate hosts agents outside of any game engine:
//! - Scenario files (TOML) describing the arena, target and agents
//! - A scripted target that walks waypoints and fights back
//! - Breadcrumb recording and trail hand-off to agents
//! - Effect application (melee hits, projectile impacts, deaths)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod scenario;
pub mod target;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::scenario::*;
    pub use crate::target::*;
    pub use crate::world::*;
}

pub use prelude::*;
