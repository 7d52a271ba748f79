// MazeRace: Bounded Sensing and Move Rules
// What an agent can perceive, what its history implies, and which moves are
// legal. Everything here is pure and side-effect-free.

pub mod analyzer;
pub mod validator;
pub mod visibility;

pub use analyzer::{count_visits, detect_loop, unexplored_directions, DEFAULT_LOOP_WINDOW};
pub use validator::{calculate_new_position, is_valid_move};
pub use visibility::{visible_area, VisibleArea};
