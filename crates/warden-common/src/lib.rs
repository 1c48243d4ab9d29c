//! # Warden Common
//!
//! Common types, utilities, and shared abstractions for Project Warden.
//!
//! This crate provides foundational types used across all Warden subsystems:
//! - Geometry types (world-space rectangles and vectors)
//! - ID types (AgentId)
//! - Injectable time source (Millis, Clock)
//! - Injectable random source
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod rng;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
    pub use crate::rng::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_generation() {
        let id1 = AgentId::new();
        let id2 = AgentId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_manual_clock_drives_timestamps() {
        let clock = ManualClock::new(1_000);
        let start = clock.now();
        clock.advance(250);
        assert_eq!(clock.now().since(start), 250);
    }
}
