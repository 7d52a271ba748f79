// MazeRace: Move Validator
// Pure rules deciding whether a proposed move is legal.

use crate::maze::{Direction, Grid, Position};

/// A position is a legal move target when it is in bounds and not a wall
pub fn is_valid_move(grid: &Grid, position: Position) -> bool {
    grid.is_walkable(position)
}

/// Apply the direction's unit delta. Performs no bounds checking; callers
/// pass the result through [`is_valid_move`].
pub fn calculate_new_position(position: Position, direction: Direction) -> Position {
    position.step(direction)
}
