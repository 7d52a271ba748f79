use mazerace_core::{
    shortest_path_length, Difficulty, DifficultyTable, Grid, MazeConfig, MazeGenerator,
    PathEnumerator, PathError, PathSearchConfig, Position,
};

fn jaccard(a: &[Position], b: &[Position]) -> f64 {
    mazerace_core::maze::pathfinding::jaccard_similarity(a, b)
}

#[test]
fn test_bfs_matches_hand_counted_distance() {
    let grid = Grid::from_ascii(
        "#######\n\
         #S....#\n\
         ####.##\n\
         #E...##\n\
         #######",
    )
    .unwrap();
    // Right 3, down 2, left 3
    let len = shortest_path_length(&grid, Position::new(1, 1), Position::new(1, 3)).unwrap();
    assert_eq!(len, 8);
}

#[test]
fn test_bfs_not_found_is_reported_not_panicked() {
    let grid = Grid::from_ascii(
        "#####\n\
         #S#E#\n\
         #####",
    )
    .unwrap();
    assert_eq!(
        shortest_path_length(&grid, Position::new(1, 1), Position::new(3, 1)),
        Err(PathError::NotFound {
            from: Position::new(1, 1),
            to: Position::new(3, 1),
        })
    );
}

#[test]
fn test_enumerated_paths_are_sorted_and_diverse() {
    let config = MazeConfig::new(11, 11, Difficulty::Easy);
    let table = DifficultyTable::default();
    let maze = MazeGenerator::generate_seeded(&config, &table, 2024).unwrap();

    let enumerator = PathEnumerator::new(table.enumerator_preset(Difficulty::Easy));
    let threshold = enumerator.config().similarity_threshold;
    let paths = enumerator.find_paths(&maze.grid, maze.start, maze.exit);

    assert!(!paths.is_empty(), "generated maze must have at least one route");
    for pair in paths.windows(2) {
        assert!(pair[0].len() <= pair[1].len(), "paths not sorted by length");
    }
    for (i, a) in paths.iter().enumerate() {
        for b in paths.iter().skip(i + 1) {
            let longer = a.len().max(b.len()) as f64;
            let diff = a.len().abs_diff(b.len()) as f64;
            if diff / longer < 0.15 {
                assert!(
                    jaccard(a, b) < threshold,
                    "length-similar paths too similar: {} vs {} cells",
                    a.len(),
                    b.len()
                );
            }
        }
    }
}

#[test]
fn test_enumerated_paths_start_and_end_correctly() {
    let config = MazeConfig::new(9, 9, Difficulty::Medium);
    let table = DifficultyTable::default();
    let maze = MazeGenerator::generate_seeded(&config, &table, 55).unwrap();

    let paths = PathEnumerator::default().find_paths(&maze.grid, maze.start, maze.exit);
    let shortest = shortest_path_length(&maze.grid, maze.start, maze.exit).unwrap();

    for path in &paths {
        assert_eq!(path.first(), Some(&maze.start));
        assert_eq!(path.last(), Some(&maze.exit));
        // No enumerated route can beat the BFS baseline
        assert!(path.len() - 1 >= shortest);
        // Every consecutive pair is one orthogonal step apart
        for pair in path.windows(2) {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            assert_eq!(dx + dy, 1);
        }
    }
}

#[test]
fn test_max_path_length_prunes_long_routes() {
    let grid = Grid::from_ascii(
        "######\n\
         #S...#\n\
         #....#\n\
         #....#\n\
         #...E#\n\
         ######",
    )
    .unwrap();
    let cap = 8;
    let enumerator = PathEnumerator::new(PathSearchConfig {
        max_paths: 20,
        max_path_length: Some(cap),
        similarity_threshold: 0.99,
        ..PathSearchConfig::default()
    });
    let paths = enumerator.find_paths(&grid, Position::new(1, 1), Position::new(4, 4));
    assert!(!paths.is_empty());
    for path in &paths {
        assert!(path.len() <= cap);
    }
}

#[test]
fn test_revisit_cap_limits_cell_reuse() {
    let grid = Grid::from_ascii(
        "######\n\
         #S...#\n\
         #....#\n\
         #....#\n\
         #...E#\n\
         ######",
    )
    .unwrap();
    let enumerator = PathEnumerator::new(PathSearchConfig {
        max_paths: 10,
        max_revisits: 1,
        similarity_threshold: 0.99,
        ..PathSearchConfig::default()
    });
    let paths = enumerator.find_paths(&grid, Position::new(1, 1), Position::new(4, 4));
    for path in &paths {
        let mut seen = std::collections::HashMap::new();
        for pos in path {
            *seen.entry(*pos).or_insert(0usize) += 1;
        }
        for (pos, count) in seen {
            assert!(count <= 1, "({}, {}) visited {} times", pos.x, pos.y, count);
        }
    }
}
