// MazeRace: Move Oracle Interface
// The injected decision capability. The scheduler depends only on this
// trait; the production oracle (LLM-backed, with its own prompt assembly
// and timeouts) lives outside the engine.

use super::MoveRecord;
use crate::maze::{Direction, Position};
use crate::navigation::VisibleArea;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Analyzer-derived hints included in the oracle context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationHints {
    /// A short repeating movement pattern was seen in the recent moves
    pub loop_detected: bool,
    /// How often the agent has stood on its current cell
    pub visits_here: usize,
    /// Open adjacent cells the agent has never occupied
    pub unexplored: Vec<Direction>,
}

/// Everything an oracle gets to see for one decision.
///
/// Histories are trimmed to the configured windows; the full state stays
/// with the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub agent_id: String,
    pub agent_name: String,
    pub position: Position,
    pub step_count: u32,
    pub visible: VisibleArea,
    pub recent_moves: Vec<MoveRecord>,
    pub recent_path: Vec<Position>,
    pub hints: NavigationHints,
}

/// Decision provider for one direction per agent per round.
///
/// `Ok(None)` means the oracle had no answer; `Err` means the provider
/// itself failed. The scheduler absorbs both as "no direction" for the one
/// agent involved; a faulty oracle can never take down the other racers.
#[async_trait]
pub trait MoveOracle: Send + Sync {
    fn name(&self) -> &str;

    async fn request_move(&self, ctx: &AgentContext) -> anyhow::Result<Option<Direction>>;
}

/// Oracle that always answers the same direction. Useful for exercising
/// validator rejections and timeouts.
#[derive(Debug, Clone)]
pub struct FixedOracle {
    direction: Direction,
}

impl FixedOracle {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

#[async_trait]
impl MoveOracle for FixedOracle {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn request_move(&self, _ctx: &AgentContext) -> anyhow::Result<Option<Direction>> {
        Ok(Some(self.direction))
    }
}

/// Oracle that replays a per-agent queue of answers, keyed by agent name.
/// An exhausted or missing queue answers `None`.
pub struct ScriptedOracle {
    scripts: Mutex<HashMap<String, VecDeque<Option<Direction>>>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
        }
    }

    /// Queue the answers for one agent, consumed in order
    pub fn script(self, agent_name: &str, moves: Vec<Option<Direction>>) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(agent_name.to_string(), moves.into());
        }
        self
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoveOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request_move(&self, ctx: &AgentContext) -> anyhow::Result<Option<Direction>> {
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|_| anyhow::anyhow!("script table poisoned"))?;
        Ok(scripts
            .get_mut(&ctx.agent_name)
            .and_then(|queue| queue.pop_front())
            .flatten())
    }
}
