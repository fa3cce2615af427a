//! Terrain model: a set of unit cubes in grid coordinates.
//!
//! A robot may stand on a cell exactly when the cell itself is free and the
//! cell below it holds a cube. World files are JSON (`WorldConfig`); the two
//! generators reproduce the stock flat and maze layouts.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Coord, Direction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    cubes: HashSet<Coord>,
}

impl Terrain {
    pub fn new() -> Self {
        Terrain {
            cubes: HashSet::new(),
        }
    }

    pub fn add_cube(&mut self, coord: Coord) {
        self.cubes.insert(coord);
    }

    pub fn occupied(&self, coord: Coord) -> bool {
        self.cubes.contains(&coord)
    }

    /// A cell is steppable when it is free and has a floor beneath it.
    pub fn can_step_on(&self, coord: Coord) -> bool {
        !self.occupied(coord) && self.occupied(coord.below())
    }

    /// Smallest (x, y) bounds containing every cube, as exclusive extents.
    /// Empty terrain has zero extents.
    pub fn extents(&self) -> (i32, i32) {
        self.cubes
            .iter()
            .fold((0, 0), |(mx, my), c| (mx.max(c.x + 1), my.max(c.y + 1)))
    }

    /// Tallest cube at the given column, if any. Used by the renderer to draw
    /// walls over floors.
    pub fn height_at(&self, x: i32, y: i32) -> Option<i32> {
        self.cubes
            .iter()
            .filter(|c| c.x == x && c.y == y)
            .map(|c| c.z)
            .max()
    }

    /// A rectangular floor, every cell at altitude 0.
    pub fn flat(width: i32, depth: i32) -> Self {
        let mut terrain = Terrain::new();
        for x in 0..width {
            for y in 0..depth {
                terrain.add_cube(Coord::new(x, y, 0));
            }
        }
        terrain
    }

    /// A flat floor with wall columns forming a serpentine maze: every odd
    /// column carries a wall with a one-cell gap, alternating between the
    /// north and south edges.
    pub fn maze(width: i32, depth: i32) -> Self {
        let mut terrain = Terrain::flat(width, depth);
        for x in 0..width {
            if x % 2 != 1 {
                continue;
            }
            for y in 0..depth {
                if x % 4 == 1 && y < depth - 1 {
                    terrain.add_cube(Coord::new(x, y, 1));
                } else if (x + 2) % 4 == 1 && y > 0 {
                    terrain.add_cube(Coord::new(x, y, 1));
                }
            }
        }
        terrain
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::new()
    }
}

// ---------------------------------------------------------------------------
// World files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotStart {
    pub position: Coord,
    pub facing: Direction,
}

/// The on-disk description of a runnable world: terrain, robot start pose,
/// and target cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub terrain: Terrain,
    pub robot: RobotStart,
    pub target: Coord,
}

impl WorldConfig {
    /// Stock flat world: robot in the south-west corner, target in the
    /// north-east corner.
    pub fn flat(width: i32, depth: i32) -> Self {
        WorldConfig {
            terrain: Terrain::flat(width, depth),
            robot: RobotStart {
                position: Coord::new(0, 0, 1),
                facing: Direction::North,
            },
            target: Coord::new(width - 1, depth - 1, 1),
        }
    }

    /// Stock maze world: robot near the north-west corner, target in the
    /// south-east corner, matching the serpentine gaps.
    pub fn maze(width: i32, depth: i32) -> Self {
        WorldConfig {
            terrain: Terrain::maze(width, depth),
            robot: RobotStart {
                position: Coord::new(0, depth - 2, 1),
                facing: Direction::North,
            },
            target: Coord::new(width - 1, 0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_terrain_is_floor_only() {
        let t = Terrain::flat(4, 3);
        assert!(t.occupied(Coord::new(0, 0, 0)));
        assert!(t.occupied(Coord::new(3, 2, 0)));
        assert!(!t.occupied(Coord::new(4, 0, 0)));
        assert!(!t.occupied(Coord::new(0, 0, 1)));
        assert_eq!(t.extents(), (4, 3));
    }

    #[test]
    fn step_needs_floor_below_and_free_cell() {
        let mut t = Terrain::flat(2, 2);
        assert!(t.can_step_on(Coord::new(0, 0, 1)));
        t.add_cube(Coord::new(0, 0, 1));
        assert!(!t.can_step_on(Coord::new(0, 0, 1)), "cell occupied");
        assert!(!t.can_step_on(Coord::new(5, 5, 1)), "no floor");
    }

    #[test]
    fn maze_walls_alternate_their_gaps() {
        let t = Terrain::maze(15, 15);
        // Column 1 is walled except at the north edge.
        assert!(t.occupied(Coord::new(1, 0, 1)));
        assert!(t.occupied(Coord::new(1, 13, 1)));
        assert!(!t.occupied(Coord::new(1, 14, 1)));
        // Column 3 is walled except at the south edge.
        assert!(!t.occupied(Coord::new(3, 0, 1)));
        assert!(t.occupied(Coord::new(3, 1, 1)));
        assert!(t.occupied(Coord::new(3, 14, 1)));
        // Even columns carry no walls.
        assert_eq!(t.height_at(2, 7), Some(0));
    }

    #[test]
    fn world_config_round_trips_through_json() {
        let config = WorldConfig::maze(7, 7);
        let json = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.robot.position, config.robot.position);
        assert_eq!(back.target, config.target);
        assert_eq!(back.terrain.extents(), config.terrain.extents());
        assert!(back.terrain.occupied(Coord::new(1, 0, 1)));
    }
}
