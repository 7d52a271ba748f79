// MazeRace: Visibility Engine
// The 3x3 sensor window around an agent. Out-of-bounds offsets read as
// unknown rather than walls so oracles can tell the border from the edge
// of the world.

use crate::maze::{Cell, Direction, Grid, Position};
use serde::{Deserialize, Serialize};

/// Immutable 3x3 snapshot of the cells around a position.
///
/// Indexed `cells[row][col]` with row 0 above the center and col 0 to its
/// left; `None` marks a window entry outside the grid. Recomputed every
/// turn, never cached across moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleArea {
    pub center: Position,
    pub cells: [[Option<Cell>; 3]; 3],
}

impl VisibleArea {
    /// Window entry at the given offset from the center (each in -1..=1)
    pub fn cell_at_offset(&self, dx: i32, dy: i32) -> Option<Cell> {
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
            return None;
        }
        self.cells[(dy + 1) as usize][(dx + 1) as usize]
    }

    /// The cell one step away in `direction`
    pub fn cell_in(&self, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.delta();
        self.cell_at_offset(dx, dy)
    }

    /// The cell the agent is standing on
    pub fn center_cell(&self) -> Option<Cell> {
        self.cell_at_offset(0, 0)
    }

    /// How many of the 9 window entries fall outside the grid
    pub fn unknown_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_none())
            .count()
    }
}

/// Compute the sensor window centered on `position`
pub fn visible_area(grid: &Grid, position: Position) -> VisibleArea {
    let mut cells = [[None; 3]; 3];
    for dy in -1..=1i32 {
        for dx in -1..=1i32 {
            cells[(dy + 1) as usize][(dx + 1) as usize] = grid.cell(position.offset(dx, dy));
        }
    }
    VisibleArea {
        center: position,
        cells,
    }
}
