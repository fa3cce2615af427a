//! The world query interface and its grid implementation.
//!
//! The engine only sees the `World` trait: boundary predicates for control
//! flow, and a guarded motion surface split into per-frame fractional
//! application (`try_step` / `rotate`) and a logical commit at window
//! completion (`commit_step` / `commit_turn`). A step is legal when the
//! destination cell is unoccupied and has a floor cube directly beneath it;
//! an illegal step applies nothing, it never raises.

pub mod terrain;

use crate::types::{Coord, Direction, Turn};
use terrain::Terrain;

pub trait World {
    fn is_facing(&self, direction: Direction) -> bool;
    /// Whether the robot could not step one cell toward the given compass
    /// direction from where it stands.
    fn is_blocked(&self, direction: Direction) -> bool;
    fn front_is_blocked(&self) -> bool;
    fn is_on_target(&self) -> bool;

    /// Apply a fractional forward step (in cells). Returns the fraction
    /// actually applied: 0.0 when the way is blocked.
    fn try_step(&mut self, fraction: f64) -> f64;
    /// Commit the logical cell advance at window completion. Guarded the
    /// same way as `try_step`.
    fn commit_step(&mut self);
    /// Apply a fractional rotation in degrees, counter-clockwise positive.
    fn rotate(&mut self, degrees: f64);
    /// Commit a quarter-turn and snap the heading to the new direction.
    fn commit_turn(&mut self, turn: Turn);
}

/// A robot on a cube-grid terrain with a fixed target cell.
///
/// Logical state is integer cells; the fractional pose (`px`, `py`,
/// `heading`) exists for smooth rendering and is snapped back to the logical
/// state on every commit.
pub struct GridWorld {
    terrain: Terrain,
    target: Coord,
    position: Coord,
    facing: Direction,
    px: f64,
    py: f64,
    heading: f64,
}

impl GridWorld {
    pub fn new(terrain: Terrain, start: Coord, facing: Direction, target: Coord) -> Self {
        GridWorld {
            terrain,
            target,
            position: start,
            facing,
            px: start.x as f64,
            py: start.y as f64,
            heading: facing.heading_degrees(),
        }
    }

    pub fn from_config(config: terrain::WorldConfig) -> Self {
        GridWorld::new(
            config.terrain,
            config.robot.position,
            config.robot.facing,
            config.target,
        )
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn target(&self) -> Coord {
        self.target
    }

    /// Fractional (x, y) pose, in cell units.
    pub fn pose(&self) -> (f64, f64) {
        (self.px, self.py)
    }

    /// Heading in degrees, counter-clockwise from north.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    fn snap_pose(&mut self) {
        self.px = self.position.x as f64;
        self.py = self.position.y as f64;
    }
}

impl World for GridWorld {
    fn is_facing(&self, direction: Direction) -> bool {
        self.facing == direction
    }

    fn is_blocked(&self, direction: Direction) -> bool {
        !self.terrain.can_step_on(self.position.toward(direction))
    }

    fn front_is_blocked(&self) -> bool {
        self.is_blocked(self.facing)
    }

    fn is_on_target(&self) -> bool {
        self.position == self.target
    }

    fn try_step(&mut self, fraction: f64) -> f64 {
        if self.front_is_blocked() {
            return 0.0;
        }
        let (dx, dy) = self.facing.delta();
        self.px += dx as f64 * fraction;
        self.py += dy as f64 * fraction;
        fraction
    }

    fn commit_step(&mut self) {
        if !self.front_is_blocked() {
            self.position = self.position.toward(self.facing);
        }
        self.snap_pose();
    }

    fn rotate(&mut self, degrees: f64) {
        self.heading += degrees;
    }

    fn commit_turn(&mut self, turn: Turn) {
        self.facing = self.facing.turned(turn);
        self.heading = self.facing.heading_degrees();
    }
}
