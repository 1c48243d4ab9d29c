//! ID types for agents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for agent IDs.
static AGENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an agent in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// Creates a new unique agent ID.
    #[must_use]
    pub fn new() -> Self {
        Self(AGENT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an agent ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid agent ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) agent ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}
