//! Injectable monotonic time source.
//!
//! Every timed behavior (cooldowns, trail TTL, search windows, respawn delay)
//! reads time through a [`Millis`] value supplied by the caller, never from a
//! global clock. [`ManualClock`] lets tests step time explicitly.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::time::Instant;

/// Monotonic timestamp in milliseconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Millis(u64);

impl Millis {
    /// The zero timestamp.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from raw milliseconds.
    #[must_use]
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// Returns the raw millisecond value.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is in the future).
    #[must_use]
    pub const fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns this timestamp shifted forward by `ms`.
    #[must_use]
    pub const fn plus(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A source of monotonic time.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Millis;
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Creates a clock whose zero is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis(self.start.elapsed().as_millis() as u64)
    }
}

/// Manually stepped clock for deterministic tests and headless simulation.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Creates a clock starting at `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Advances the clock by `ms` and returns the new time.
    pub fn advance(&self, ms: u64) -> Millis {
        self.now.set(self.now.get().saturating_add(ms));
        self.now()
    }

    /// Sets the clock to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }
}
