// MazeRace: Race Scheduler
// Drives round-synchronized turns: every active agent's oracle call is
// issued concurrently, the round closes only when all of them settle, and
// outcomes are committed all-or-nothing per round.

use super::oracle::{AgentContext, MoveOracle, NavigationHints};
use super::{
    AgentProfile, AgentState, AgentStatus, MoveRecord, RaceConfig, RaceError, RaceEvent,
    RaceEventType, RaceSummary, SchedulerState,
};
use crate::maze::{Direction, Grid, Position};
use crate::navigation::{
    calculate_new_position, count_visits, detect_loop, is_valid_move, unexplored_directions,
    visible_area,
};
use chrono::Utc;
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Notify, RwLock};

/// Idle poll interval while the race is paused
const PAUSE_POLL: Duration = Duration::from_millis(50);

/// Owns all agent state for a race and advances it in lock-step rounds.
///
/// The grid is shared read-only; agent state is mutated only here, after
/// the round's oracle calls have joined. Pause and stop are cooperative
/// flags checked at round boundaries, never preemptive interruption.
pub struct RaceScheduler {
    config: RaceConfig,
    agents: Arc<RwLock<Vec<AgentState>>>,
    state: Arc<RwLock<SchedulerState>>,
    paused: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    cancel_notify: Arc<Notify>,
    round: Arc<AtomicU64>,
    event_log: Arc<RwLock<Vec<RaceEvent>>>,
}

impl RaceScheduler {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            agents: Arc::new(RwLock::new(Vec::new())),
            state: Arc::new(RwLock::new(SchedulerState::Idle)),
            paused: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            cancel_notify: Arc::new(Notify::new()),
            round: Arc::new(AtomicU64::new(0)),
            event_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Reset the roster to Waiting at the shared start position and clear
    /// all race bookkeeping from any previous run.
    pub async fn initialize(&self, roster: &[AgentProfile], start: Position) {
        {
            let mut agents = self.agents.write().await;
            *agents = roster
                .iter()
                .map(|profile| AgentState::from_profile(profile, start, &self.config))
                .collect();
        }
        {
            let mut state = self.state.write().await;
            *state = SchedulerState::Idle;
        }
        self.paused.store(false, Ordering::SeqCst);
        self.cancelled.store(false, Ordering::SeqCst);
        self.round.store(0, Ordering::SeqCst);
        self.event_log.write().await.clear();
        log::debug!(
            "initialized {} agents at ({}, {})",
            roster.len(),
            start.x,
            start.y
        );
    }

    /// Run the race to completion: rounds advance until every agent is
    /// terminal or `stop()` is called. Returns the final summary.
    pub async fn run(
        &self,
        grid: Arc<Grid>,
        exit: Position,
        oracle: Arc<dyn MoveOracle>,
    ) -> Result<RaceSummary, RaceError> {
        {
            let agents = self.agents.read().await;
            if agents.is_empty() {
                return Err(RaceError::NotInitialized);
            }
        }
        {
            let mut state = self.state.write().await;
            match *state {
                SchedulerState::Idle => *state = SchedulerState::Running,
                SchedulerState::Running | SchedulerState::Paused => {
                    return Err(RaceError::AlreadyRunning)
                }
                // A finished race must be re-initialized before running again
                SchedulerState::Stopped => return Err(RaceError::NotInitialized),
            }
        }

        let started_at = Utc::now();
        let roster_size = {
            let mut agents = self.agents.write().await;
            for agent in agents.iter_mut() {
                if agent.status == AgentStatus::Waiting {
                    agent.status = AgentStatus::Racing;
                    agent.timing.started_at = Some(started_at);
                }
            }
            agents.len()
        };
        log::info!(
            "race started: {} agents, oracle '{}', max {} turns",
            roster_size,
            oracle.name(),
            self.config.max_turns
        );
        self.push_event(RaceEvent::new(
            0,
            RaceEventType::RaceStarted,
            None,
            &format!("race started with {} agents", roster_size),
            None,
        ))
        .await;

        let mut stopped = false;
        loop {
            if self.cancelled.load(Ordering::SeqCst) {
                stopped = true;
                break;
            }
            if self.paused.load(Ordering::SeqCst) {
                // Idle-wait; a paused race consumes no rounds
                tokio::time::sleep(PAUSE_POLL).await;
                continue;
            }

            let round = self.round.load(Ordering::SeqCst) + 1;

            // Resolve step-cap timeouts, then snapshot contexts for every
            // agent still racing. Context building is synchronous and only
            // reads the shared grid.
            let mut contexts: Vec<(usize, AgentContext)> = Vec::new();
            let mut events: Vec<RaceEvent> = Vec::new();
            {
                let mut agents = self.agents.write().await;
                for (idx, agent) in agents.iter_mut().enumerate() {
                    if agent.status != AgentStatus::Racing {
                        continue;
                    }
                    if agent.step_count >= self.config.max_turns {
                        agent.status = AgentStatus::Timeout;
                        agent.timing.finished_at = Some(Utc::now());
                        log::info!(
                            "agent {} timed out after {} steps",
                            agent.name,
                            agent.step_count
                        );
                        events.push(RaceEvent::new(
                            round,
                            RaceEventType::AgentTimedOut,
                            Some(&agent.id),
                            &format!("{} timed out after {} steps", agent.name, agent.step_count),
                            None,
                        ));
                        continue;
                    }
                    contexts.push((idx, self.build_context(agent, &grid)));
                }
            }
            self.extend_events(events).await;

            if contexts.is_empty() {
                break;
            }

            // Fan out one oracle call per racing agent and join the full
            // round; no agent advances until every call has settled.
            let calls = contexts.into_iter().map(|(idx, ctx)| {
                let oracle = Arc::clone(&oracle);
                async move {
                    let clock = Instant::now();
                    let decision = oracle.request_move(&ctx).await;
                    (idx, decision, clock.elapsed())
                }
            });
            let joined = join_all(calls);
            tokio::pin!(joined);
            let results = tokio::select! {
                results = &mut joined => results,
                _ = self.cancel_notify.notified() => {
                    stopped = true;
                    break;
                }
            };
            if self.cancelled.load(Ordering::SeqCst) {
                // Cancelled while the round was in flight: commit nothing
                stopped = true;
                break;
            }

            // Commit the round
            let mut events: Vec<RaceEvent> = Vec::new();
            let still_racing;
            {
                let mut agents = self.agents.write().await;
                for (idx, decision, think) in results {
                    let Some(agent) = agents.get_mut(idx) else {
                        continue;
                    };
                    agent.timing.total_think_ms += think.as_millis() as u64;
                    agent.step_count += 1;

                    match decision {
                        Err(err) => {
                            log::warn!(
                                "oracle '{}' failed for agent {}: {:#}",
                                oracle.name(),
                                agent.name,
                                err
                            );
                            mark_stuck(agent, round, &mut events);
                        }
                        Ok(None) => {
                            mark_stuck(agent, round, &mut events);
                        }
                        Ok(Some(direction)) => {
                            apply_move(agent, direction, &grid, exit, round, &mut events);
                        }
                    }
                }
                still_racing = agents
                    .iter()
                    .filter(|a| a.status == AgentStatus::Racing)
                    .count();
            }
            self.round.store(round, Ordering::SeqCst);
            events.push(RaceEvent::new(
                round,
                RaceEventType::RoundCompleted,
                None,
                &format!("round {} complete, {} still racing", round, still_racing),
                None,
            ));
            self.extend_events(events).await;
            log::debug!("round {} committed, {} still racing", round, still_racing);

            // Pacing only; stop() releases the delay immediately
            let delay = self.config.round_delay();
            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = self.cancel_notify.notified() => {}
                }
            }
        }

        {
            let mut state = self.state.write().await;
            *state = SchedulerState::Stopped;
        }
        let ended_at = Utc::now();
        let rounds = self.round.load(Ordering::SeqCst);
        let agents = self.agents.read().await.clone();
        let (event_type, message) = if stopped {
            (RaceEventType::RaceStopped, "race stopped externally")
        } else {
            (RaceEventType::RaceEnded, "race ended, all agents terminal")
        };
        self.push_event(RaceEvent::new(rounds, event_type, None, message, None))
            .await;
        log::info!("{} after {} rounds", message, rounds);

        Ok(RaceSummary {
            rounds,
            agents,
            started_at,
            ended_at,
            stopped,
        })
    }

    /// Suspend round processing at the next round boundary. In-flight
    /// oracle calls for the current round complete first.
    pub async fn pause(&self) {
        let mut state = self.state.write().await;
        if *state == SchedulerState::Running {
            *state = SchedulerState::Paused;
            self.paused.store(true, Ordering::SeqCst);
            drop(state);
            log::info!("race paused");
            self.push_event(RaceEvent::new(
                self.current_round(),
                RaceEventType::RacePaused,
                None,
                "race paused",
                None,
            ))
            .await;
        }
    }

    /// Resume a paused race
    pub async fn resume(&self) {
        let mut state = self.state.write().await;
        if *state == SchedulerState::Paused {
            *state = SchedulerState::Running;
            self.paused.store(false, Ordering::SeqCst);
            drop(state);
            log::info!("race resumed");
            self.push_event(RaceEvent::new(
                self.current_round(),
                RaceEventType::RaceResumed,
                None,
                "race resumed",
                None,
            ))
            .await;
        }
    }

    /// Request cancellation. Checked at round boundaries and inside the
    /// round wait; the round in flight is abandoned uncommitted and any
    /// pacing delay is released immediately.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancel_notify.notify_waiters();
        log::info!("race stop requested");
    }

    /// Snapshot of all agent states (renderer interface)
    pub async fn agents(&self) -> Vec<AgentState> {
        self.agents.read().await.clone()
    }

    pub async fn scheduler_state(&self) -> SchedulerState {
        *self.state.read().await
    }

    /// Number of fully committed rounds
    pub fn current_round(&self) -> u64 {
        self.round.load(Ordering::SeqCst)
    }

    /// Snapshot of the race event log (renderer interface)
    pub async fn event_log(&self) -> Vec<RaceEvent> {
        self.event_log.read().await.clone()
    }

    pub async fn clear_event_log(&self) {
        self.event_log.write().await.clear();
    }

    fn build_context(&self, agent: &AgentState, grid: &Grid) -> AgentContext {
        let visible = visible_area(grid, agent.position);
        let directions: Vec<_> = agent.move_history.iter().map(|m| m.direction).collect();
        let path = agent.path_taken.as_vec();
        let hints = NavigationHints {
            loop_detected: detect_loop(&directions, self.config.loop_window),
            visits_here: count_visits(&path, agent.position),
            unexplored: unexplored_directions(agent.position, &path, &visible),
        };
        AgentContext {
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            position: agent.position,
            step_count: agent.step_count,
            visible,
            recent_moves: agent.move_history.last_n(self.config.move_history_window),
            recent_path: agent.path_taken.last_n(self.config.path_history_window),
            hints,
        }
    }

    async fn push_event(&self, event: RaceEvent) {
        self.event_log.write().await.push(event);
    }

    async fn extend_events(&self, events: Vec<RaceEvent>) {
        if events.is_empty() {
            return;
        }
        self.event_log.write().await.extend(events);
    }
}

/// No direction came back this round: the agent is out of the race
fn mark_stuck(agent: &mut AgentState, round: u64, events: &mut Vec<RaceEvent>) {
    agent.status = AgentStatus::Stuck;
    agent.timing.finished_at = Some(Utc::now());
    log::info!("agent {} is stuck at step {}", agent.name, agent.step_count);
    events.push(RaceEvent::new(
        round,
        RaceEventType::AgentStuck,
        Some(&agent.id),
        &format!("{} gave no direction and is stuck", agent.name),
        None,
    ));
}

/// Validate and apply one returned direction per the per-round outcome
/// rules: illegal moves are recorded and rejected without ending the run,
/// reaching the exit finishes the agent.
fn apply_move(
    agent: &mut AgentState,
    direction: Direction,
    grid: &Grid,
    exit: Position,
    round: u64,
    events: &mut Vec<RaceEvent>,
) {
    let target = calculate_new_position(agent.position, direction);
    let now = Utc::now();

    if is_valid_move(grid, target) {
        agent.position = target;
        agent.path_taken.push(target);
        agent.move_history.push(MoveRecord {
            direction,
            resulting_position: target,
            timestamp: now,
            success: true,
        });
        if target == exit {
            agent.status = AgentStatus::Finished;
            agent.timing.finished_at = Some(now);
            log::info!(
                "agent {} finished in {} steps",
                agent.name,
                agent.step_count
            );
            events.push(RaceEvent::new(
                round,
                RaceEventType::AgentFinished,
                Some(&agent.id),
                &format!("{} reached the exit in {} steps", agent.name, agent.step_count),
                Some(serde_json::json!({ "steps": agent.step_count })),
            ));
        } else {
            events.push(RaceEvent::new(
                round,
                RaceEventType::MoveApplied,
                Some(&agent.id),
                &format!("{} moved {}", agent.name, direction.as_str()),
                Some(serde_json::json!({
                    "direction": direction.as_str(),
                    "x": target.x,
                    "y": target.y,
                })),
            ));
        }
    } else {
        agent.move_history.push(MoveRecord {
            direction,
            resulting_position: agent.position,
            timestamp: now,
            success: false,
        });
        events.push(RaceEvent::new(
            round,
            RaceEventType::MoveRejected,
            Some(&agent.id),
            &format!("{} blocked moving {}", agent.name, direction.as_str()),
            Some(serde_json::json!({ "direction": direction.as_str() })),
        ));
    }
}
