//! Budgeted pathfinding.
//!
//! Path requests are not solved when issued. Behaviors submit them to the
//! [`PathfindingScheduler`], which drains at most `budget` of them per tick
//! in priority order. Each executed request asks the host's solver for a
//! route and posts the result to the [`PathMailbox`], where the owning
//! behavior picks it up by ticket on its next update.

mod types;
mod scheduler;
mod mailbox;
mod requests;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use types::{PathOutcome, PathQuery, RequestTicket};
pub use scheduler::{PathAction, PathfindingScheduler, SchedulerSnapshot, SchedulerStats, DEFAULT_REQUESTS_PER_TICK};
pub use mailbox::PathMailbox;
pub use requests::{request_path, NavHost, NavScheduler};
