use mazerace_core::{
    shortest_path_length, Cell, Difficulty, DifficultyTable, Direction, MazeConfig, MazeError,
    MazeGenerator, Position,
};
use std::collections::{HashSet, VecDeque};

fn generate(width: u32, height: u32, difficulty: Difficulty, seed: u64) -> mazerace_core::GeneratedMaze {
    let config = MazeConfig::new(width, height, difficulty);
    MazeGenerator::generate_seeded(&config, &DifficultyTable::default(), seed).unwrap()
}

/// Flood fill from `from` over walkable cells
fn reachable(grid: &mazerace_core::Grid, from: Position) -> HashSet<Position> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(from);
    queue.push_back(from);
    while let Some(current) = queue.pop_front() {
        for dir in Direction::ALL {
            let next = current.step(dir);
            if grid.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn test_invalid_configs_are_rejected() {
    for (w, h) in [(2, 8), (8, 2), (0, 0), (1, 3)] {
        let config = MazeConfig::new(w, h, Difficulty::Medium);
        let result = MazeGenerator::generate(&config, &DifficultyTable::default());
        assert!(matches!(result, Err(MazeError::InvalidConfig { .. })));
    }
}

#[test]
fn test_every_size_and_difficulty_is_connected() {
    let sizes = [(3, 3), (4, 4), (5, 5), (6, 8), (8, 6), (9, 9), (12, 10), (15, 15)];
    let difficulties = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];
    for (w, h) in sizes {
        for difficulty in difficulties {
            let maze = generate(w, h, difficulty, 1234);
            let distance = shortest_path_length(&maze.grid, maze.start, maze.exit);
            assert!(
                distance.is_ok(),
                "{}x{} {:?}: exit unreachable",
                w,
                h,
                difficulty
            );
        }
    }
}

#[test]
fn test_all_walkable_cells_form_one_region() {
    // The spec's 5x5 Easy case plus a spread of larger mazes
    let maze = generate(5, 5, Difficulty::Easy, 42);
    assert_eq!(maze.start, Position::new(1, 1));
    assert_eq!(maze.exit, Position::new(3, 3));
    for (w, h, seed) in [(5, 5, 42), (11, 9, 7), (14, 14, 8)] {
        let maze = generate(w, h, Difficulty::Easy, seed);
        let region = reachable(&maze.grid, maze.start);
        for pos in maze.grid.walkable_positions() {
            assert!(
                region.contains(&pos),
                "{}x{}: cell ({}, {}) cut off from start",
                w,
                h,
                pos.x,
                pos.y
            );
        }
        assert!(region.contains(&maze.exit));
    }
}

#[test]
fn test_exactly_one_start_and_exit() {
    for seed in 0..10 {
        let maze = generate(9, 9, Difficulty::Medium, seed);
        assert_eq!(maze.grid.count(Cell::Start), 1);
        assert_eq!(maze.grid.count(Cell::Exit), 1);
        assert_eq!(maze.grid.find(Cell::Start), Some(maze.start));
        assert_eq!(maze.grid.find(Cell::Exit), Some(maze.exit));
    }
}

#[test]
fn test_no_two_wide_hallways_after_injection() {
    // Easy has the highest injection probability, so it is the pass most
    // likely to violate the corridor-width invariant
    for seed in 0..25 {
        let maze = generate(13, 11, Difficulty::Easy, seed);
        for y in 0..10i32 {
            for x in 0..12i32 {
                let block = [
                    Position::new(x, y),
                    Position::new(x + 1, y),
                    Position::new(x, y + 1),
                    Position::new(x + 1, y + 1),
                ];
                let open = block.iter().all(|&p| maze.grid.is_walkable(p));
                assert!(!open, "seed {}: open 2x2 block at ({}, {})", seed, x, y);
            }
        }
    }
}

#[test]
fn test_seeded_generation_is_deterministic() {
    let a = generate(11, 11, Difficulty::Hard, 99999);
    let b = generate(11, 11, Difficulty::Hard, 99999);
    assert_eq!(a.grid, b.grid);

    let c = generate(11, 11, Difficulty::Hard, 11111);
    assert_ne!(a.grid, c.grid);
}

#[test]
fn test_easy_opens_more_routes_than_expert() {
    // Count walkable cells across seeds; higher injection probability must
    // open at least as many walls on aggregate
    let mut easy_open = 0usize;
    let mut expert_open = 0usize;
    for seed in 0..20 {
        easy_open += generate(15, 15, Difficulty::Easy, seed)
            .grid
            .walkable_positions()
            .len();
        expert_open += generate(15, 15, Difficulty::Expert, seed)
            .grid
            .walkable_positions()
            .len();
    }
    assert!(easy_open > expert_open);
}
