use bevy::prelude::*;

use crate::game::ai::world::{UnitId, UnitWorld};

use super::mailbox::PathMailbox;
use super::scheduler::PathfindingScheduler;
use super::types::{PathOutcome, PathQuery, RequestTicket};

/// What scheduled path requests execute against: the host world (for the
/// solver and unit positions) and the mailbox results are posted to.
pub struct NavHost<W> {
    pub world: W,
    pub mailbox: PathMailbox,
}

impl<W: UnitWorld> NavHost<W> {
    pub fn new(world: W) -> Self {
        Self { world, mailbox: PathMailbox::default() }
    }
}

pub type NavScheduler<W> = PathfindingScheduler<NavHost<W>>;

/// Submit a path request for `owner` and return its ticket.
///
/// When executed, the request solves `query` (starting from the owner's
/// position at that moment unless `query.start` is set) and posts the outcome
/// to the mailbox under the returned ticket. A dead owner gets `NoPath`.
pub fn request_path<W: UnitWorld>(
    scheduler: &mut NavScheduler<W>,
    owner: UnitId,
    query: PathQuery,
    priority: i64,
) -> RequestTicket {
    scheduler.submit_with(owner, priority, move |ticket| {
        move |host: &mut NavHost<W>| {
            let start = query.start.or_else(|| host.world.position(owner));
            let outcome = match start {
                Some(start) if host.world.is_alive(owner) => {
                    match host.world.request_path(start, query.goal, query.crowd) {
                        Some(waypoints) => PathOutcome::Found(waypoints),
                        None => {
                            debug!("[PATHFINDING] No path for {:?} to {:?}", owner, query.goal);
                            PathOutcome::NoPath
                        }
                    }
                }
                _ => PathOutcome::NoPath,
            };
            host.mailbox.deliver(owner, ticket, outcome);
        }
    })
}
