// MazeRace: Pathfinding and Route-Diversity Analysis
// BFS optimal distance (performance baseline) and a bounded DFS enumerator
// that surfaces a diverse set of start->exit routes for diagnostics.

use super::{Direction, Grid, Position};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// How many recently accepted paths a new candidate is compared against
const SIMILARITY_LOOKBACK: usize = 20;

/// Relative length difference under which two paths are considered
/// comparable for the similarity check
const COMPARABLE_LENGTH_RATIO: f64 = 0.15;

/// Errors from read-only path queries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("no route from ({}, {}) to ({}, {})", from.x, from.y, to.x, to.y)]
    NotFound { from: Position, to: Position },
}

/// Hop count of the shortest route between two walkable cells.
///
/// Standard BFS over the 4-connected non-wall cells. Generator-produced
/// grids are always connected, but hand-authored grids may not be, so the
/// disconnected case is a typed result rather than a panic.
pub fn shortest_path_length(
    grid: &Grid,
    start: Position,
    exit: Position,
) -> Result<usize, PathError> {
    let not_found = PathError::NotFound {
        from: start,
        to: exit,
    };
    if !grid.is_walkable(start) || !grid.is_walkable(exit) {
        return Err(not_found);
    }

    let mut distances: HashMap<Position, usize> = HashMap::new();
    let mut queue = VecDeque::new();
    distances.insert(start, 0);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let dist = distances.get(&current).copied().unwrap_or(0);
        if current == exit {
            return Ok(dist);
        }
        for dir in Direction::ALL {
            let next = current.step(dir);
            if grid.is_walkable(next) && !distances.contains_key(&next) {
                distances.insert(next, dist + 1);
                queue.push_back(next);
            }
        }
    }

    Err(not_found)
}

/// Tunable budget for the path enumerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSearchConfig {
    /// Stop once this many paths have been accepted
    pub max_paths: usize,
    /// Prune any branch that grows beyond this many cells
    pub max_path_length: Option<usize>,
    /// How many times a single cell may appear in one path
    pub max_revisits: usize,
    /// Jaccard similarity at or above which a candidate is rejected
    pub similarity_threshold: f64,
    /// Stop after this many completed candidate paths
    pub max_attempts: usize,
}

impl Default for PathSearchConfig {
    fn default() -> Self {
        Self {
            max_paths: 5,
            max_path_length: None,
            max_revisits: 2,
            similarity_threshold: 0.85,
            max_attempts: 5000,
        }
    }
}

/// Enumerates a bounded, near-duplicate-filtered set of routes through a grid.
///
/// Depth-first search with a per-cell visit cap; completed candidates are
/// rejected when identical to an earlier acceptance or Jaccard-similar to a
/// recently accepted path of comparable length. The search budget bounds an
/// otherwise combinatorial walk.
#[derive(Debug, Clone)]
pub struct PathEnumerator {
    config: PathSearchConfig,
}

impl Default for PathEnumerator {
    fn default() -> Self {
        Self::new(PathSearchConfig::default())
    }
}

impl PathEnumerator {
    pub fn new(config: PathSearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PathSearchConfig {
        &self.config
    }

    /// All accepted routes from `start` to `exit`, sorted ascending by length
    pub fn find_paths(&self, grid: &Grid, start: Position, exit: Position) -> Vec<Vec<Position>> {
        if !grid.is_walkable(start) || !grid.is_walkable(exit) {
            return Vec::new();
        }

        let mut search = Search {
            grid,
            exit,
            config: &self.config,
            visits: HashMap::new(),
            path: vec![start],
            accepted: Vec::new(),
            attempts: 0,
        };
        search.visits.insert(start, 1);
        search.explore(start);

        let mut paths = search.accepted;
        log::debug!(
            "path enumeration finished: {} accepted, {} candidates tried",
            paths.len(),
            search.attempts
        );
        paths.sort_by_key(|p| p.len());
        paths
    }
}

struct Search<'a> {
    grid: &'a Grid,
    exit: Position,
    config: &'a PathSearchConfig,
    visits: HashMap<Position, usize>,
    path: Vec<Position>,
    accepted: Vec<Vec<Position>>,
    attempts: usize,
}

impl Search<'_> {
    /// Returns true when the search budget is exhausted and the walk should
    /// unwind without exploring further.
    fn explore(&mut self, current: Position) -> bool {
        if current == self.exit {
            self.attempts += 1;
            self.consider_candidate();
            return self.accepted.len() >= self.config.max_paths
                || self.attempts >= self.config.max_attempts;
        }

        if let Some(max_len) = self.config.max_path_length {
            if self.path.len() >= max_len {
                return false;
            }
        }

        for dir in Direction::ALL {
            let next = current.step(dir);
            if !self.grid.is_walkable(next) {
                continue;
            }
            if self.visits.get(&next).copied().unwrap_or(0) >= self.config.max_revisits {
                continue;
            }
            // Stepping straight back to the cell occupied two steps ago only
            // produces oscillation noise.
            if self.path.len() >= 2 && next == self.path[self.path.len() - 2] {
                continue;
            }

            self.path.push(next);
            *self.visits.entry(next).or_insert(0) += 1;
            let done = self.explore(next);
            self.path.pop();
            if let Some(count) = self.visits.get_mut(&next) {
                *count -= 1;
            }
            if done {
                return true;
            }
        }

        false
    }

    fn consider_candidate(&mut self) {
        if self.accepted.iter().any(|p| p == &self.path) {
            return;
        }

        let recent = self
            .accepted
            .iter()
            .rev()
            .take(SIMILARITY_LOOKBACK);
        for existing in recent {
            if !comparable_lengths(existing.len(), self.path.len()) {
                continue;
            }
            if jaccard_similarity(existing, &self.path) >= self.config.similarity_threshold {
                return;
            }
        }

        self.accepted.push(self.path.clone());
    }
}

fn comparable_lengths(a: usize, b: usize) -> bool {
    let longer = a.max(b) as f64;
    let diff = a.abs_diff(b) as f64;
    diff / longer < COMPARABLE_LENGTH_RATIO
}

/// |A ∩ B| / |A ∪ B| over the two paths' cell-sets
pub fn jaccard_similarity(a: &[Position], b: &[Position]) -> f64 {
    let set_a: HashSet<Position> = a.iter().copied().collect();
    let set_b: HashSet<Position> = b.iter().copied().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Grid;

    fn corridor() -> Grid {
        Grid::from_ascii(
            "#####\n\
             #S.E#\n\
             #####",
        )
        .unwrap()
    }

    #[test]
    fn test_bfs_straight_corridor() {
        let grid = corridor();
        let len = shortest_path_length(&grid, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert_eq!(len, 2);
    }

    #[test]
    fn test_bfs_disconnected_is_typed_not_found() {
        let grid = Grid::from_ascii(
            "#####\n\
             #S#E#\n\
             #####",
        )
        .unwrap();
        let result = shortest_path_length(&grid, Position::new(1, 1), Position::new(3, 1));
        assert_eq!(
            result,
            Err(PathError::NotFound {
                from: Position::new(1, 1),
                to: Position::new(3, 1),
            })
        );
    }

    #[test]
    fn test_bfs_start_on_wall_is_not_found() {
        let grid = corridor();
        assert!(shortest_path_length(&grid, Position::new(0, 0), Position::new(3, 1)).is_err());
    }

    #[test]
    fn test_enumerator_finds_both_routes_around_a_block() {
        let grid = Grid::from_ascii(
            "#####\n\
             #S..#\n\
             #.#.#\n\
             #..E#\n\
             #####",
        )
        .unwrap();
        let enumerator = PathEnumerator::default();
        let paths = enumerator.find_paths(&grid, Position::new(1, 1), Position::new(3, 3));

        assert!(!paths.is_empty());
        // Sorted ascending by length
        for pair in paths.windows(2) {
            assert!(pair[0].len() <= pair[1].len());
        }
        // Both minimal routes (over and under the center block) are distinct
        let shortest: Vec<_> = paths.iter().filter(|p| p.len() == 5).collect();
        assert_eq!(shortest.len(), 2);
        for path in &paths {
            assert_eq!(path[0], Position::new(1, 1));
            assert_eq!(*path.last().unwrap(), Position::new(3, 3));
        }
    }

    #[test]
    fn test_enumerator_respects_max_paths() {
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
            max_paths: 3,
            similarity_threshold: 0.99,
            ..PathSearchConfig::default()
        });
        let paths = enumerator.find_paths(&grid, Position::new(1, 1), Position::new(4, 4));
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_enumerator_rejects_near_duplicates() {
        let grid = Grid::from_ascii(
            "######\n\
             #S...#\n\
             #....#\n\
             #....#\n\
             #...E#\n\
             ######",
        )
        .unwrap();
        let threshold = 0.85;
        let enumerator = PathEnumerator::new(PathSearchConfig {
            max_paths: 10,
            similarity_threshold: threshold,
            ..PathSearchConfig::default()
        });
        let paths = enumerator.find_paths(&grid, Position::new(1, 1), Position::new(4, 4));

        for (i, a) in paths.iter().enumerate() {
            for b in paths.iter().skip(i + 1) {
                if comparable_lengths(a.len(), b.len()) {
                    assert!(
                        jaccard_similarity(a, b) < threshold,
                        "length-similar pair exceeds similarity threshold"
                    );
                }
            }
        }
    }

    #[test]
    fn test_enumerator_empty_on_disconnected_grid() {
        let grid = Grid::from_ascii(
            "#####\n\
             #S#E#\n\
             #####",
        )
        .unwrap();
        let paths =
            PathEnumerator::default().find_paths(&grid, Position::new(1, 1), Position::new(3, 1));
        assert!(paths.is_empty());
    }

    #[test]
    fn test_jaccard_similarity_basics() {
        let a = vec![Position::new(0, 0), Position::new(1, 0)];
        let b = vec![Position::new(0, 0), Position::new(1, 0)];
        let c = vec![Position::new(5, 5), Position::new(6, 5)];
        assert_eq!(jaccard_similarity(&a, &b), 1.0);
        assert_eq!(jaccard_similarity(&a, &c), 0.0);
    }
}
