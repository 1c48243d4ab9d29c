//! Health, mana, cooldowns and respawn timing.

use serde::{Deserialize, Serialize};
use warden_common::Millis;

use crate::constants::{MANA_REGEN_AMOUNT, MANA_REGEN_INTERVAL_MS};

/// Result of applying damage to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Health actually removed
    pub applied: u32,
    /// Whether this hit killed the agent
    pub killed: bool,
}

/// Health and mana, clamped to `[0, max]` on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    health: u32,
    max_health: u32,
    mana: u32,
    max_mana: u32,
    regen_accumulator_ms: u64,
}

impl Vitals {
    /// Creates full vitals.
    #[must_use]
    pub fn new(max_health: u32, max_mana: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            regen_accumulator_ms: 0,
        }
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Current mana.
    #[must_use]
    pub fn mana(&self) -> u32 {
        self.mana
    }

    /// Maximum mana.
    #[must_use]
    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    /// Whether health is depleted.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.health == 0
    }

    /// Removes health, never below zero.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        let was_alive = self.health > 0;
        let applied = amount.min(self.health);
        self.health -= applied;
        DamageOutcome {
            applied,
            killed: was_alive && self.health == 0,
        }
    }

    /// Restores health, never above max.
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Spends mana if enough is available.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        if self.mana < cost {
            return false;
        }
        self.mana -= cost;
        true
    }

    /// Adds mana, never above max.
    pub fn restore_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
    }

    /// Accumulates elapsed time and regenerates one increment per full period.
    pub fn regenerate(&mut self, elapsed_ms: u64) {
        self.regen_accumulator_ms = self.regen_accumulator_ms.saturating_add(elapsed_ms);
        while self.regen_accumulator_ms >= MANA_REGEN_INTERVAL_MS {
            self.regen_accumulator_ms -= MANA_REGEN_INTERVAL_MS;
            self.restore_mana(MANA_REGEN_AMOUNT);
        }
    }

    /// Refills health and mana.
    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
        self.regen_accumulator_ms = 0;
    }
}

/// Minimum interval between two triggers of the same action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    duration_ms: u64,
    last_trigger: Option<Millis>,
    active: bool,
}

impl Cooldown {
    /// Creates an idle cooldown.
    #[must_use]
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            last_trigger: None,
            active: false,
        }
    }

    /// Starts the cooldown.
    pub fn trigger(&mut self, now: Millis) {
        self.last_trigger = Some(now);
        self.active = true;
    }

    /// Clears the active flag once the duration has passed.
    pub fn update(&mut self, now: Millis) {
        if let Some(last) = self.last_trigger {
            if self.active && now.since(last) > self.duration_ms {
                self.active = false;
            }
        }
    }

    /// Whether the cooldown blocks a new trigger.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time of the last trigger.
    #[must_use]
    pub fn last_trigger(&self) -> Option<Millis> {
        self.last_trigger
    }

    /// Forgets any previous trigger.
    pub fn reset(&mut self) {
        self.last_trigger = None;
        self.active = false;
    }
}

/// Death timestamp and respawn delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespawnTimer {
    delay_ms: Option<u64>,
    died_at: Option<Millis>,
}

impl RespawnTimer {
    /// Creates a timer; `None` disables respawning.
    #[must_use]
    pub const fn new(delay_ms: Option<u64>) -> Self {
        Self {
            delay_ms,
            died_at: None,
        }
    }

    /// Records a death if respawning is enabled.
    pub fn record_death(&mut self, now: Millis) {
        if self.delay_ms.is_some() {
            self.died_at = Some(now);
        }
    }

    /// Whether the respawn delay has passed.
    #[must_use]
    pub fn is_due(&self, now: Millis) -> bool {
        match (self.delay_ms, self.died_at) {
            (Some(delay), Some(died_at)) => now.since(died_at) >= delay,
            _ => false,
        }
    }

    /// Clears the recorded death.
    pub fn clear(&mut self) {
        self.died_at = None;
    }
}
