//! Shared boundary types for the robot scripting sandbox.
//!
//! Two families live here:
//! - World-side primitives: `Coord`, `Direction`, `Turn` (grid cells are
//!   integer coordinates, never scene units).
//! - Renderer -> Player contract: `Cell` and `Style`, the styled character
//!   grid the player prints each frame.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// World-side primitives
// ---------------------------------------------------------------------------

/// An integer grid cell. `z` is altitude: terrain floors sit at `z = 0`,
/// the robot walks at `z = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Coord { x, y, z }
    }

    /// The cell directly below this one.
    pub fn below(self) -> Self {
        Coord {
            z: self.z - 1,
            ..self
        }
    }

    /// The adjacent cell one step toward `direction`, same altitude.
    pub fn toward(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Coord {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }
}

/// The four cardinal directions. North is +y, east is +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    West,
    South,
    East,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Direction {
    /// Unit step in grid coordinates.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    /// The direction after a quarter turn.
    pub fn turned(self, turn: Turn) -> Self {
        match (self, turn) {
            (Direction::North, Turn::Left) => Direction::West,
            (Direction::West, Turn::Left) => Direction::South,
            (Direction::South, Turn::Left) => Direction::East,
            (Direction::East, Turn::Left) => Direction::North,
            (Direction::North, Turn::Right) => Direction::East,
            (Direction::East, Turn::Right) => Direction::South,
            (Direction::South, Turn::Right) => Direction::West,
            (Direction::West, Turn::Right) => Direction::North,
        }
    }

    /// Heading in degrees, counter-clockwise from north.
    pub fn heading_degrees(self) -> f64 {
        match self {
            Direction::North => 0.0,
            Direction::West => 90.0,
            Direction::South => 180.0,
            Direction::East => 270.0,
        }
    }

    /// Map glyph for the robot when facing this way.
    pub fn glyph(self) -> char {
        match self {
            Direction::North => '^',
            Direction::West => '<',
            Direction::South => 'v',
            Direction::East => '>',
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer -> Player contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Style {
            fg: Some(color),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default)]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_left_turns_return_home() {
        let mut d = Direction::North;
        for _ in 0..4 {
            d = d.turned(Turn::Left);
        }
        assert_eq!(d, Direction::North);
    }

    #[test]
    fn left_then_right_cancels() {
        for d in [
            Direction::North,
            Direction::West,
            Direction::South,
            Direction::East,
        ] {
            assert_eq!(d.turned(Turn::Left).turned(Turn::Right), d);
        }
    }

    #[test]
    fn toward_moves_one_cell() {
        let c = Coord::new(3, 3, 1);
        assert_eq!(c.toward(Direction::North), Coord::new(3, 4, 1));
        assert_eq!(c.toward(Direction::East), Coord::new(4, 3, 1));
        assert_eq!(c.below(), Coord::new(3, 3, 0));
    }
}
