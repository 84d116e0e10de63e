use serde::{Deserialize, Serialize};

use crate::game::config::SimAiConfig;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::pathfinding::{self, NavScheduler, PathMailbox, PathOutcome, PathQuery, RequestTicket};

use super::world::{CrowdId, UnitId, UnitWorld};

/// Per-unit blackboard shared by every behavior of one controller.
///
/// Behaviors never talk to each other directly; whatever one leaves here
/// (target, destination, pending ticket) is what the next one sees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AIContext {
    pub unit: UnitId,
    /// Current target. Re-validated with [`UnitWorld::is_alive`] before every use.
    pub target: Option<UnitId>,
    /// Last commanded point, without formation offset.
    pub destination: Option<FixedVec2>,
    /// Cached combat capability. `None` means the unit cannot attack.
    pub attack_range: Option<FixedNum>,
    /// Ticket of the path request the current behavior is waiting on.
    pub pending_path: Option<RequestTicket>,
    pub crowd: Option<CrowdId>,
    pub formation_offset: FixedVec2,
}

impl AIContext {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            target: None,
            destination: None,
            attack_range: None,
            pending_path: None,
            crowd: None,
            formation_offset: FixedVec2::ZERO,
        }
    }

    pub fn refresh_combat<W: UnitWorld>(&mut self, world: &W) {
        self.attack_range = world.attack_range(self.unit);
    }

    /// Point this unit was last sent to, formation offset included.
    pub fn anchor(&self) -> Option<FixedVec2> {
        self.destination.map(|destination| destination + self.formation_offset)
    }
}

/// State of the path request a behavior is waiting on.
#[derive(Debug, PartialEq)]
pub enum PathPoll {
    /// No request outstanding.
    Idle,
    /// Still queued in the scheduler.
    Waiting,
    Ready(PathOutcome),
    /// Nothing queued and nothing delivered: cancelled by a newer request of
    /// this unit, or dropped by a reload. The caller must re-issue.
    Lost,
}

/// Everything a behavior may touch during one tick.
pub struct TickContext<'a, W: UnitWorld> {
    pub world: &'a mut W,
    pub mailbox: &'a mut PathMailbox,
    pub scheduler: &'a mut NavScheduler<W>,
    pub config: &'a SimAiConfig,
    pub tick_id: u64,
}

impl<'a, W: UnitWorld> TickContext<'a, W> {
    /// Submit a path request for the unit and remember its ticket.
    pub fn request_path(&mut self, ai: &mut AIContext, query: PathQuery, priority: i64) -> RequestTicket {
        let ticket = pathfinding::request_path(self.scheduler, ai.unit, query, priority);
        ai.pending_path = Some(ticket);
        ticket
    }

    pub fn poll_path(&mut self, ai: &mut AIContext) -> PathPoll {
        let Some(ticket) = ai.pending_path else {
            return PathPoll::Idle;
        };
        if let Some(outcome) = self.mailbox.take(ai.unit, ticket) {
            ai.pending_path = None;
            PathPoll::Ready(outcome)
        } else if self.scheduler.is_pending(ticket) {
            PathPoll::Waiting
        } else {
            ai.pending_path = None;
            PathPoll::Lost
        }
    }

    /// Drop whatever the unit has queued or waiting in the mailbox.
    pub fn cancel_path(&mut self, ai: &mut AIContext) {
        if ai.pending_path.take().is_some() {
            self.scheduler.cancel(ai.unit);
            self.mailbox.discard(ai.unit);
        }
    }
}
