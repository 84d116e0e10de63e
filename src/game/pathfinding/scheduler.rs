use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tidewater_macros::profile;

use crate::game::ai::world::UnitId;
use crate::game::collections::PriorityHeap;
use crate::game::fixed_math::FixedNum;
use crate::profile_log;

use super::types::RequestTicket;

/// Default number of requests executed per tick.
pub const DEFAULT_REQUESTS_PER_TICK: usize = 25;

/// Deferred work executed against the scheduler's host `H`.
pub type PathAction<H> = Box<dyn FnOnce(&mut H) + Send + Sync + 'static>;

struct PathfindingRequest<H> {
    owner: UnitId,
    action: PathAction<H>,
}

/// Lifetime counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub executed: u64,
    pub cancelled: u64,
    pub peak_queue: usize,
}

/// Persisted scheduler state.
///
/// Pending actions are closures and are not saved; owners notice their
/// ticket is gone and re-issue on their next update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    pub budget: usize,
    pub enabled: bool,
    pub next_ticket: u64,
    pub stats: SchedulerStats,
}

/// Priority queue of pathfinding work drained under a per-tick budget.
///
/// # Budget
///
/// Each tick executes at most `budget` requests, lowest priority value first
/// (ties in submission order). Work beyond the budget waits for later ticks.
/// The per-tick counter resets at the end of every tick.
///
/// # Ownership
///
/// At most one request per owner is pending: [`submit`](Self::submit) cancels
/// the owner's previous request first.
///
/// # Activity
///
/// The scheduler is active while it has been fed since it last ran dry.
/// A tick that finds the queue empty before the budget is spent deactivates
/// it, and inactive ticks cost nothing.
///
/// # Failure
///
/// Actions are not wrapped. A panicking action is a programmer error and
/// propagates to the tick driver.
pub struct PathfindingScheduler<H> {
    queue: PriorityHeap<PathfindingRequest<H>, i64>,
    budget: usize,
    executed_this_tick: usize,
    active: bool,
    enabled: bool,
    stats: SchedulerStats,
}

impl<H: 'static> Default for PathfindingScheduler<H> {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_TICK)
    }
}

impl<H: 'static> PathfindingScheduler<H> {
    pub fn new(budget: usize) -> Self {
        Self {
            queue: PriorityHeap::new(),
            budget,
            executed_this_tick: 0,
            active: false,
            enabled: true,
            stats: SchedulerStats::default(),
        }
    }

    /// Queue `action` for `owner`. Lower `priority` executes sooner.
    ///
    /// Any request `owner` already has pending is cancelled first.
    pub fn submit(&mut self, owner: UnitId, action: PathAction<H>, priority: i64) -> RequestTicket {
        self.submit_with(owner, priority, |_| action)
    }

    /// Like [`submit`](Self::submit), but builds the action from the ticket it
    /// is about to receive, so the action can tag its own result.
    pub fn submit_with<F>(
        &mut self,
        owner: UnitId,
        priority: i64,
        make_action: impl FnOnce(RequestTicket) -> F,
    ) -> RequestTicket
    where
        F: FnOnce(&mut H) + Send + Sync + 'static,
    {
        self.cancel(owner);

        let ticket = RequestTicket(self.queue.next_sequence());
        let action: PathAction<H> = Box::new(make_action(ticket));
        let sequence = self.queue.push(PathfindingRequest { owner, action }, priority);
        debug_assert_eq!(sequence, ticket.0);

        self.active = true;
        self.stats.submitted += 1;
        self.stats.peak_queue = self.stats.peak_queue.max(self.queue.len());
        ticket
    }

    /// Remove every pending request of `owner`. Returns how many were removed.
    pub fn cancel(&mut self, owner: UnitId) -> usize {
        let removed = self.queue.remove_all(|request| request.owner == owner);
        self.stats.cancelled += removed as u64;
        removed
    }

    /// Execute up to `budget` requests. Called once per simulation tick.
    #[profile(1)]
    pub fn on_tick(&mut self, host: &mut H, _dt: FixedNum, tick_id: u64) {
        if self.enabled && self.active {
            while self.executed_this_tick < self.budget {
                match self.queue.pop() {
                    Ok(request) => {
                        self.executed_this_tick += 1;
                        self.stats.executed += 1;
                        (request.action)(host);
                    }
                    Err(_) => {
                        debug!("[SCHEDULER] Queue drained at tick {}", tick_id);
                        self.active = false;
                        break;
                    }
                }
            }

            profile_log!(tick_id, "[SCHEDULER] Tick {}: executed {} path requests, {} pending",
                tick_id, self.executed_this_tick, self.queue.len());
        }

        self.executed_this_tick = 0;
    }

    pub fn is_pending(&self, ticket: RequestTicket) -> bool {
        self.queue.contains_sequence(ticket.0)
    }

    pub fn has_pending(&self, owner: UnitId) -> bool {
        self.queue.any(|request| request.owner == owner)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled scheduler keeps its queue but executes nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!("[SCHEDULER] {} ({} pending)", if enabled { "Enabled" } else { "Disabled" }, self.queue.len());
        }
        self.enabled = enabled;
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn set_budget(&mut self, budget: usize) {
        if budget == 0 {
            warn!("[SCHEDULER] Budget set to 0, no path requests will execute");
        }
        self.budget = budget;
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn save(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            budget: self.budget,
            enabled: self.enabled,
            next_ticket: self.queue.next_sequence(),
            stats: self.stats,
        }
    }

    /// Restore persisted settings. The queue starts empty.
    pub fn load(&mut self, snapshot: &SchedulerSnapshot) {
        self.queue.clear();
        self.queue.resume_sequence(snapshot.next_ticket);
        self.budget = snapshot.budget;
        self.enabled = snapshot.enabled;
        self.stats = snapshot.stats;
        self.executed_this_tick = 0;
        self.active = false;
    }
}
