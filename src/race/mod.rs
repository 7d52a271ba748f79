// MazeRace: Race State and Events
// Per-agent racing state, the race configuration, and the structured event
// log consumed by the renderer after each round.

pub mod history;
pub mod oracle;
pub mod scheduler;

pub use history::BoundedHistory;
pub use oracle::{AgentContext, FixedOracle, MoveOracle, NavigationHints, ScriptedOracle};
pub use scheduler::RaceScheduler;

use crate::maze::{Direction, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle of a single agent.
///
/// `Finished`, `Stuck` and `Timeout` are terminal; the scheduler takes no
/// further turns for a terminal agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Waiting,
    Racing,
    Finished,
    Stuck,
    Timeout,
}

impl AgentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentStatus::Finished | AgentStatus::Stuck | AgentStatus::Timeout
        )
    }
}

/// One attempted move, successful or rejected. Appended, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub direction: Direction,
    /// Where the agent ended up: the target cell on success, the unchanged
    /// position on a rejected move
    pub resulting_position: Position,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

/// Roster entry handed to [`RaceScheduler::initialize`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Stable identity; generated when absent
    pub id: Option<String>,
    pub name: String,
}

impl AgentProfile {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }

    pub fn with_id(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
        }
    }
}

/// Wall-clock accounting for one agent's race
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTiming {
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Total time spent waiting on the oracle across all rounds
    pub total_think_ms: u64,
}

/// Everything the scheduler tracks for one agent.
///
/// Owned exclusively by the scheduler for the duration of a race; snapshots
/// handed out to the renderer are clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub status: AgentStatus,
    /// Moves attempted, counting both successful and rejected attempts
    pub step_count: u32,
    pub move_history: BoundedHistory<MoveRecord>,
    /// Every position occupied, including repeats; rejected moves do not
    /// append here
    pub path_taken: BoundedHistory<Position>,
    pub timing: AgentTiming,
}

impl AgentState {
    pub(crate) fn from_profile(profile: &AgentProfile, start: Position, config: &RaceConfig) -> Self {
        let mut path_taken = BoundedHistory::new(config.path_history_cap);
        path_taken.push(start);
        Self {
            id: profile
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: profile.name.clone(),
            position: start,
            status: AgentStatus::Waiting,
            step_count: 0,
            move_history: BoundedHistory::new(config.move_history_cap),
            path_taken,
            timing: AgentTiming::default(),
        }
    }
}

/// Tunables for one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Step cap per agent before a Timeout is declared
    pub max_turns: u32,
    /// Pacing delay between rounds; pacing only, not a correctness knob
    pub base_interval_ms: u64,
    /// Divides the pacing delay; tests typically crank this up
    pub speed_multiplier: f64,
    /// How many recent moves the oracle context carries
    pub move_history_window: usize,
    /// How many recent positions the oracle context carries
    pub path_history_window: usize,
    /// Ring cap for the stored move history
    pub move_history_cap: usize,
    /// Ring cap for the stored path history
    pub path_history_cap: usize,
    /// Window handed to the loop detector when building hints
    pub loop_window: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            max_turns: 100,
            base_interval_ms: 1000,
            speed_multiplier: 1.0,
            move_history_window: 10,
            path_history_window: 200,
            move_history_cap: 200,
            path_history_cap: 1000,
            loop_window: crate::navigation::DEFAULT_LOOP_WINDOW,
        }
    }
}

impl RaceConfig {
    /// Pacing sleep between rounds, `base_interval / speed_multiplier`
    pub fn round_delay(&self) -> Duration {
        if self.base_interval_ms == 0 {
            return Duration::ZERO;
        }
        let multiplier = if self.speed_multiplier > 0.0 {
            self.speed_multiplier
        } else {
            1.0
        };
        Duration::from_millis((self.base_interval_ms as f64 / multiplier) as u64)
    }
}

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Event kinds emitted into the race log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceEventType {
    RaceStarted,
    RoundCompleted,
    MoveApplied,
    MoveRejected,
    AgentFinished,
    AgentStuck,
    AgentTimedOut,
    RacePaused,
    RaceResumed,
    RaceStopped,
    RaceEnded,
}

/// One entry of the race log; the renderer reads these after each round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEvent {
    pub round: u64,
    pub event_type: RaceEventType,
    pub agent_id: Option<String>,
    pub timestamp: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RaceEvent {
    pub(crate) fn new(
        round: u64,
        event_type: RaceEventType,
        agent_id: Option<&str>,
        message: &str,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            round,
            event_type,
            agent_id: agent_id.map(str::to_string),
            timestamp: Utc::now().to_rfc3339(),
            message: message.to_string(),
            data,
        }
    }
}

/// Final report returned by [`RaceScheduler::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSummary {
    pub rounds: u64,
    pub agents: Vec<AgentState>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// True when the race ended through `stop()` rather than every agent
    /// reaching a terminal status
    pub stopped: bool,
}

/// Scheduler misuse; every in-race failure is absorbed per agent instead
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("race has no agents; call initialize first")]
    NotInitialized,

    #[error("race is already running")]
    AlreadyRunning,
}
