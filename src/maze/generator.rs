// MazeRace: Maze Generator
// Recursive backtracking over a stride-2 lattice (spanning carve), followed
// by a difficulty-tuned complexity-injection pass that opens extra routes.

use super::{Cell, DifficultyTable, Grid, MazeConfig, MazeError, Position};
use std::collections::HashSet;

/// A generated maze with its fixed entry and exit cells
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    pub grid: Grid,
    pub start: Position,
    pub exit: Position,
}

/// Builds mazes from a size/difficulty configuration.
///
/// The carve phase produces a spanning tree over the odd-coordinate lattice,
/// so before injection there is exactly one simple route between any two
/// path cells and every corridor is one cell wide with walls on both sides.
pub struct MazeGenerator;

impl MazeGenerator {
    /// Generate with a fresh random seed
    pub fn generate(
        config: &MazeConfig,
        table: &DifficultyTable,
    ) -> Result<GeneratedMaze, MazeError> {
        Self::generate_seeded(config, table, fastrand::u64(..))
    }

    /// Generate deterministically from `seed`
    pub fn generate_seeded(
        config: &MazeConfig,
        table: &DifficultyTable,
        seed: u64,
    ) -> Result<GeneratedMaze, MazeError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(seed);

        let width = config.width as i32;
        let height = config.height as i32;
        let start = Position::new(1, 1);
        let exit = Position::new(width - 2, height - 2);

        let mut grid = Grid::filled(config.width, config.height, Cell::Wall);
        grid.set(start, Cell::Start);
        grid.set(exit, Cell::Exit);

        carve_spanning_tree(&mut grid, start, width, height, &mut rng);
        connect_exit(&mut grid, exit);

        let probability = table.extra_path_probability(config.difficulty);
        let opened = inject_extra_paths(&mut grid, probability, &mut rng);
        log::debug!(
            "generated {}x{} maze ({:?}, seed {}): {} extra openings",
            config.width,
            config.height,
            config.difficulty,
            seed,
            opened
        );

        Ok(GeneratedMaze { grid, start, exit })
    }
}

/// Iterative recursive backtracker over cells two apart, carving the wall
/// between each visited pair. Lattice coordinates stay in `1..=dim-2`.
fn carve_spanning_tree(
    grid: &mut Grid,
    start: Position,
    width: i32,
    height: i32,
    rng: &mut fastrand::Rng,
) {
    let mut stack = vec![start];
    let mut visited: HashSet<Position> = HashSet::new();
    visited.insert(start);

    while let Some(&current) = stack.last() {
        let mut candidates: Vec<Position> = Vec::with_capacity(4);
        for (dx, dy) in [(0, -2), (0, 2), (-2, 0), (2, 0)] {
            let next = current.offset(dx, dy);
            if next.x >= 1
                && next.x <= width - 2
                && next.y >= 1
                && next.y <= height - 2
                && !visited.contains(&next)
            {
                candidates.push(next);
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let next = candidates[rng.usize(..candidates.len())];
        let between = Position::new((current.x + next.x) / 2, (current.y + next.y) / 2);
        if grid.cell(between) == Some(Cell::Wall) {
            grid.set(between, Cell::Path);
        }
        if grid.cell(next) == Some(Cell::Wall) {
            grid.set(next, Cell::Path);
        }
        visited.insert(next);
        stack.push(next);
    }
}

/// The exit sits at (width-2, height-2), which falls off the stride-2
/// lattice when a dimension is even; the spanning carve can then leave it
/// walled in. Opening the west neighbor reaches the nearest lattice column
/// by parity (north as a fallback).
fn connect_exit(grid: &mut Grid, exit: Position) {
    let has_open_neighbor = |g: &Grid| {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .iter()
            .any(|&(dx, dy)| g.is_walkable(exit.offset(dx, dy)))
    };

    if has_open_neighbor(grid) {
        return;
    }
    let west = exit.offset(-1, 0);
    if west.x >= 1 && grid.cell(west) == Some(Cell::Wall) {
        grid.set(west, Cell::Path);
    }
    if !has_open_neighbor(grid) {
        let north = exit.offset(0, -1);
        if north.y >= 1 && grid.cell(north) == Some(Cell::Wall) {
            grid.set(north, Cell::Path);
        }
    }
}

/// Open eligible interior walls with probability `probability`, adding
/// alternative routes without ever widening a corridor to two cells.
///
/// Scans in raster order; a converted cell's neighbors are marked considered
/// and skipped for the remainder of the pass so one opening cannot cascade
/// into a cluster. The scan-order dependency is accepted behavior.
fn inject_extra_paths(grid: &mut Grid, probability: f64, rng: &mut fastrand::Rng) -> usize {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut considered: HashSet<Position> = HashSet::new();
    let mut opened = 0;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let pos = Position::new(x, y);
            if grid.cell(pos) != Some(Cell::Wall) || considered.contains(&pos) {
                continue;
            }

            let open_neighbors = [(0, -1), (0, 1), (-1, 0), (1, 0)]
                .iter()
                .filter(|&&(dx, dy)| grid.is_walkable(pos.offset(dx, dy)))
                .count();
            if open_neighbors != 2 {
                continue;
            }
            if would_complete_open_block(grid, pos) {
                continue;
            }
            if rng.f64() >= probability {
                continue;
            }

            grid.set(pos, Cell::Path);
            opened += 1;
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                considered.insert(pos.offset(dx, dy));
            }
        }
    }

    opened
}

/// Opening `pos` completes a 2x2 walkable block (a two-wide hallway) when
/// any diagonal neighbor plus the two cells flanking it are already open.
fn would_complete_open_block(grid: &Grid, pos: Position) -> bool {
    for (dx, dy) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
        if grid.is_walkable(pos.offset(dx, 0))
            && grid.is_walkable(pos.offset(0, dy))
            && grid.is_walkable(pos.offset(dx, dy))
        {
            return true;
        }
    }
    false
}
