//! Renderer: a pure rasterizer from world state to a styled cell grid.
//!
//! Produces a top-down map, north up: row 0 is the northernmost row of the
//! terrain. Stateless; given the same world snapshot it always draws the
//! same grid. It knows nothing about terminals or timing.

use crate::types::{Cell, Color, Coord, Style};
use crate::world::GridWorld;

pub struct Renderer;

const FLOOR: char = '\u{00b7}';
const WALL: char = '\u{2588}';
const TARGET: char = '\u{25ce}';

impl Renderer {
    /// Rasterize the world into rows of styled cells.
    pub fn render(world: &GridWorld) -> Vec<Vec<Cell>> {
        let (width, depth) = world.terrain().extents();
        let mut grid = vec![vec![Cell::default(); width.max(0) as usize]; depth.max(0) as usize];

        for y in 0..depth {
            let row = (depth - 1 - y) as usize;
            for x in 0..width {
                grid[row][x as usize] = Self::terrain_cell(world, x, y);
            }
        }

        // Target and robot paint over terrain; the robot wins ties.
        Self::plot(&mut grid, depth, world.target(), Cell {
            ch: TARGET,
            style: Style::fg(Color::Blue),
        });
        // The robot draws at its fractional pose so a move is visible
        // mid-window instead of jumping a whole cell per second.
        let (px, py) = world.pose();
        let robot = Coord::new(px.round() as i32, py.round() as i32, world.position().z);
        Self::plot(&mut grid, depth, robot, Cell {
            ch: world.facing().glyph(),
            style: Style {
                fg: Some(Color::Red),
                bold: true,
                ..Default::default()
            },
        });

        grid
    }

    fn terrain_cell(world: &GridWorld, x: i32, y: i32) -> Cell {
        match world.terrain().height_at(x, y) {
            Some(z) if z >= 1 => Cell {
                ch: WALL,
                style: Style::fg(Color::Green),
            },
            Some(_) => Cell {
                ch: FLOOR,
                style: Style {
                    fg: Some(Color::Green),
                    dim: true,
                    ..Default::default()
                },
            },
            None => Cell::default(),
        }
    }

    fn plot(grid: &mut [Vec<Cell>], depth: i32, at: Coord, cell: Cell) {
        let row = depth - 1 - at.y;
        if row < 0 || at.x < 0 {
            return;
        }
        if let Some(slot) = grid
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(at.x as usize))
        {
            *slot = cell;
        }
    }
}
