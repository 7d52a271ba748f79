// MazeRace: Maze Generation and Multi-Agent Navigation Engine
// Procedurally varied mazes, bounded-vision sensing, route-diversity
// analysis, and a round-synchronized race over an injected move oracle.
// Rendering, prompt assembly and credential handling live in the app shell
// that consumes this crate.

// Maze module - grid model, generator, difficulty tables, pathfinding
pub mod maze;

// Navigation module - visibility window, history analysis, move rules
pub mod navigation;

// Race module - agent state, oracle interface, round scheduler
pub mod race;

// Re-export maze types for convenience
pub use maze::{
    shortest_path_length, Cell, Difficulty, DifficultyTable, Direction, GeneratedMaze, Grid,
    MazeConfig, MazeError, MazeGenerator, PathEnumerator, PathError, PathSearchConfig, Position,
};

// Re-export navigation functions
pub use navigation::{
    calculate_new_position, count_visits, detect_loop, is_valid_move, unexplored_directions,
    visible_area, VisibleArea,
};

// Re-export race types
pub use race::{
    AgentContext, AgentProfile, AgentState, AgentStatus, AgentTiming, BoundedHistory, FixedOracle,
    MoveOracle, MoveRecord, NavigationHints, RaceConfig, RaceError, RaceEvent, RaceEventType,
    RaceScheduler, RaceSummary, SchedulerState, ScriptedOracle,
};
