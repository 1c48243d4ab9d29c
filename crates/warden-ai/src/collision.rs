//! Static obstacle queries.
//!
//! The controller only ever asks two questions of the world: does this
//! rectangle overlap an obstacle, and which one. [`ObstacleMap`] is the
//! rectangle-list implementation used by the simulation and the tests.

use warden_common::{ObstacleError, Rect};

/// Read-only collision oracle over static obstacles.
///
/// Implementations must be safe to query many times per tick and must not
/// change while a tick is in progress.
pub trait CollisionOracle {
    /// Returns the first obstacle overlapping `rect`, if any.
    fn first_overlap(&self, rect: &Rect) -> Option<Rect>;

    /// Checks whether `rect` overlaps any obstacle.
    fn collides(&self, rect: &Rect) -> bool {
        self.first_overlap(rect).is_some()
    }
}

/// A flat list of rectangular obstacles.
#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    obstacles: Vec<Rect>,
}

impl ObstacleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an obstacle from its top-left corner and size.
    pub fn add_obstacle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), ObstacleError> {
        let rect = Rect::from_xywh(x, y, width, height);
        if !rect.is_valid() || width <= 0.0 || height <= 0.0 {
            return Err(ObstacleError::InvalidObstacle {
                x,
                y,
                width,
                height,
            });
        }
        self.obstacles.push(rect);
        Ok(())
    }

    /// Builder form of [`Self::add_obstacle`] for tests and fixtures.
    pub fn with_obstacle(
        mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<Self, ObstacleError> {
        self.add_obstacle(x, y, width, height)?;
        Ok(self)
    }

    /// Builds a map from comma-separated tile rows where `1` is solid and
    /// `0` is open.
    pub fn from_tile_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, ObstacleError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(ObstacleError::InvalidTileSize(tile_size));
        }

        let mut map = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            for (column, cell) in line.split(',').enumerate() {
                match cell.trim() {
                    "1" => map.obstacles.push(Rect::from_xywh(
                        column as f32 * tile_size,
                        row as f32 * tile_size,
                        tile_size,
                        tile_size,
                    )),
                    "0" | "" => {},
                    other => {
                        return Err(ObstacleError::UnknownTile {
                            row,
                            column,
                            value: other.to_string(),
                        })
                    },
                }
            }
        }
        Ok(map)
    }

    /// Returns all obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// Returns the number of obstacles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Returns whether the map has no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl CollisionOracle for ObstacleMap {
    fn first_overlap(&self, rect: &Rect) -> Option<Rect> {
        self.obstacles.iter().find(|obs| rect.overlaps(obs)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_never_collides() {
        let map = ObstacleMap::new();
        assert!(map.is_empty());
        assert!(!map.collides(&Rect::from_xywh(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_first_overlap_returns_obstacle() {
        let map = ObstacleMap::new()
            .with_obstacle(10.0, 10.0, 5.0, 5.0)
            .and_then(|m| m.with_obstacle(50.0, 50.0, 5.0, 5.0))
            .expect("valid obstacles");

        let hit = map.first_overlap(&Rect::from_xywh(48.0, 48.0, 4.0, 4.0));
        assert_eq!(hit, Some(Rect::from_xywh(50.0, 50.0, 5.0, 5.0)));
        assert!(!map.collides(&Rect::from_xywh(20.0, 20.0, 4.0, 4.0)));
    }

    #[test]
    fn test_invalid_obstacle_rejected() {
        let mut map = ObstacleMap::new();
        assert!(map.add_obstacle(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(map.add_obstacle(f32::NAN, 0.0, 1.0, 1.0).is_err());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_tile_rows() {
        let map = ObstacleMap::from_tile_rows(&["1,0,1", "0,0,0", "", "0,1"], 64.0)
            .expect("valid grid");
        assert_eq!(map.len(), 3);
        assert!(map.collides(&Rect::from_xywh(130.0, 10.0, 4.0, 4.0)));
        assert!(map.collides(&Rect::from_xywh(70.0, 200.0, 4.0, 4.0)));
        assert!(!map.collides(&Rect::from_xywh(70.0, 70.0, 4.0, 4.0)));
    }

    #[test]
    fn test_tile_rows_reject_unknown_cells() {
        let err = ObstacleMap::from_tile_rows(&["1,x"], 32.0).expect_err("bad cell");
        assert!(matches!(err, ObstacleError::UnknownTile { column: 1, .. }));
        assert!(ObstacleMap::from_tile_rows(&["1"], 0.0).is_err());
    }
}
