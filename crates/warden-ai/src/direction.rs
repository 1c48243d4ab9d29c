//! Eight-way facing and facing-indexed tables.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use warden_common::Vec2;

use crate::constants::FACE_DEAD_ZONE;

/// One of the eight compass facings, in screen space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Up
    Up,
    /// Up and right
    UpRight,
    /// Right
    Right,
    /// Down and right
    DownRight,
    /// Down
    #[default]
    Down,
    /// Down and left
    DownLeft,
    /// Left
    Left,
    /// Up and left
    UpLeft,
}

impl Facing {
    /// All facings in table order.
    pub const ALL: [Facing; 8] = [
        Facing::Up,
        Facing::UpRight,
        Facing::Right,
        Facing::DownRight,
        Facing::Down,
        Facing::DownLeft,
        Facing::Left,
        Facing::UpLeft,
    ];

    /// Position of this facing in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::UpRight => 1,
            Self::Right => 2,
            Self::DownRight => 3,
            Self::Down => 4,
            Self::DownLeft => 5,
            Self::Left => 6,
            Self::UpLeft => 7,
        }
    }

    /// Unnormalized grid offset for this facing (components in -1..=1).
    #[must_use]
    pub const fn unit_offset(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::UpRight => (1.0, -1.0),
            Self::Right => (1.0, 0.0),
            Self::DownRight => (1.0, 1.0),
            Self::Down => (0.0, 1.0),
            Self::DownLeft => (-1.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::UpLeft => (-1.0, -1.0),
        }
    }

    fn from_signs(sx: i8, sy: i8) -> Option<Self> {
        match (sx, sy) {
            (0, -1) => Some(Self::Up),
            (1, -1) => Some(Self::UpRight),
            (1, 0) => Some(Self::Right),
            (1, 1) => Some(Self::DownRight),
            (0, 1) => Some(Self::Down),
            (-1, 1) => Some(Self::DownLeft),
            (-1, 0) => Some(Self::Left),
            (-1, -1) => Some(Self::UpLeft),
            _ => None,
        }
    }

    /// Facing implied by a velocity, or `None` when not moving.
    #[must_use]
    pub fn from_velocity(velocity: Vec2) -> Option<Self> {
        Self::from_signs(sign(velocity.x, 0.0), sign(velocity.y, 0.0))
    }

    /// Facing toward a target offset, ignoring axis components inside the
    /// dead zone. `None` when the target is inside the dead zone on both axes.
    #[must_use]
    pub fn toward(delta: Vec2) -> Option<Self> {
        Self::from_signs(sign(delta.x, FACE_DEAD_ZONE), sign(delta.y, FACE_DEAD_ZONE))
    }
}

fn sign(v: f32, dead_zone: f32) -> i8 {
    if v > dead_zone {
        1
    } else if v < -dead_zone {
        -1
    } else {
        0
    }
}

/// A value per facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacingTable<T>(pub [T; 8]);

impl<T: Copy> FacingTable<T> {
    /// Table with the same value for every facing.
    #[must_use]
    pub const fn uniform(value: T) -> Self {
        Self([value; 8])
    }
}

impl<T> Index<Facing> for FacingTable<T> {
    type Output = T;

    fn index(&self, facing: Facing) -> &T {
        &self.0[facing.index()]
    }
}

impl<T> IndexMut<Facing> for FacingTable<T> {
    fn index_mut(&mut self, facing: Facing) -> &mut T {
        &mut self.0[facing.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, facing) in Facing::ALL.iter().enumerate() {
            assert_eq!(facing.index(), i);
        }
    }

    #[test]
    fn test_from_velocity() {
        assert_eq!(Facing::from_velocity(Vec2::ZERO), None);
        assert_eq!(Facing::from_velocity(Vec2::new(0.5, 0.0)), Some(Facing::Right));
        assert_eq!(Facing::from_velocity(Vec2::new(-1.0, -1.0)), Some(Facing::UpLeft));
        assert_eq!(Facing::from_velocity(Vec2::new(0.0, 2.0)), Some(Facing::Down));
    }

    #[test]
    fn test_toward_respects_dead_zone() {
        assert_eq!(Facing::toward(Vec2::new(5.0, -5.0)), None);
        assert_eq!(Facing::toward(Vec2::new(50.0, 5.0)), Some(Facing::Right));
        assert_eq!(Facing::toward(Vec2::new(-50.0, 40.0)), Some(Facing::DownLeft));
    }

    #[test]
    fn test_offsets_round_trip_through_signs() {
        for facing in Facing::ALL {
            let (x, y) = facing.unit_offset();
            assert_eq!(Facing::from_velocity(Vec2::new(x, y)), Some(facing));
        }
    }

    #[test]
    fn test_table_indexing() {
        let mut table = FacingTable::uniform(4u8);
        table[Facing::Left] = 0;
        assert_eq!(table[Facing::Left], 0);
        assert_eq!(table[Facing::Right], 4);
    }
}
