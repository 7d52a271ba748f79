// MazeRace: Difficulty Parameter Tables
// Pure lookup from difficulty to generation and path-analysis budgets.
// Always passed explicitly; nothing here reads ambient state.

use super::{Difficulty, PathSearchConfig};
use serde::{Deserialize, Serialize};

/// Per-difficulty tuning for one difficulty level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyEntry {
    /// Probability that an eligible wall is opened into an extra route
    /// during the generator's complexity-injection pass
    pub extra_path_probability: f64,
    /// Enumerator budget used when analyzing mazes of this difficulty
    pub enumerator: PathSearchConfig,
}

/// The full difficulty-to-parameter table.
///
/// Lower probabilities mean fewer shortcuts and a harder maze: the spanning
/// carve already guarantees exactly one route, and every injected opening
/// adds an alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultyEntry,
    pub medium: DifficultyEntry,
    pub hard: DifficultyEntry,
    pub expert: DifficultyEntry,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyEntry {
                extra_path_probability: 0.08,
                enumerator: PathSearchConfig {
                    max_paths: 3,
                    max_path_length: None,
                    max_revisits: 2,
                    similarity_threshold: 0.85,
                    max_attempts: 2000,
                },
            },
            medium: DifficultyEntry {
                extra_path_probability: 0.04,
                enumerator: PathSearchConfig {
                    max_paths: 5,
                    max_path_length: None,
                    max_revisits: 2,
                    similarity_threshold: 0.85,
                    max_attempts: 5000,
                },
            },
            hard: DifficultyEntry {
                extra_path_probability: 0.015,
                enumerator: PathSearchConfig {
                    max_paths: 8,
                    max_path_length: None,
                    max_revisits: 2,
                    similarity_threshold: 0.80,
                    max_attempts: 5000,
                },
            },
            expert: DifficultyEntry {
                extra_path_probability: 0.005,
                enumerator: PathSearchConfig {
                    max_paths: 10,
                    max_path_length: None,
                    max_revisits: 3,
                    similarity_threshold: 0.75,
                    max_attempts: 8000,
                },
            },
        }
    }
}

impl DifficultyTable {
    pub fn entry(&self, difficulty: Difficulty) -> &DifficultyEntry {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Expert => &self.expert,
        }
    }

    pub fn extra_path_probability(&self, difficulty: Difficulty) -> f64 {
        self.entry(difficulty).extra_path_probability
    }

    pub fn enumerator_preset(&self, difficulty: Difficulty) -> PathSearchConfig {
        self.entry(difficulty).enumerator.clone()
    }
}
