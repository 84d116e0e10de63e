use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, PathPoll, TickContext};
use crate::game::ai::world::{CrowdId, MovementState, PathFollow, UnitWorld};
use crate::game::fixed_math::FixedVec2;
use crate::game::pathfinding::{PathOutcome, PathQuery};

/// A move command as handed to MoveToPosition-style behaviors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveOrder {
    pub destination: FixedVec2,
    /// Formation slot offset added to every waypoint.
    pub offset: FixedVec2,
    /// Solve the path from here instead of the unit's own position.
    pub start_hint: Option<FixedVec2>,
    pub crowd: Option<CrowdId>,
    /// Precomputed route. Skips the path request unless `force_repath` is set.
    pub waypoints: Option<Vec<FixedVec2>>,
    pub force_repath: bool,
}

impl MoveOrder {
    pub fn to(destination: FixedVec2) -> Self {
        Self {
            destination,
            offset: FixedVec2::ZERO,
            start_hint: None,
            crowd: None,
            waypoints: None,
            force_repath: false,
        }
    }

    pub fn with_offset(mut self, offset: FixedVec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_start_hint(mut self, start: Option<FixedVec2>) -> Self {
        self.start_hint = start;
        self
    }

    pub fn with_crowd(mut self, crowd: Option<CrowdId>) -> Self {
        self.crowd = crowd;
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<FixedVec2>) -> Self {
        self.waypoints = Some(waypoints);
        self
    }

    pub fn forcing_repath(mut self) -> Self {
        self.force_repath = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveState {
    WaitingForPath,
    MoveTowardsPoint,
    ReachedDestination,
}

/// Drives one unit to a point: request a path, follow it, stop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointMover {
    order: MoveOrder,
    desired: MoveState,
    current: MoveState,
}

impl PointMover {
    pub fn new(order: MoveOrder) -> Self {
        Self {
            order,
            desired: MoveState::WaitingForPath,
            current: MoveState::WaitingForPath,
        }
    }

    pub fn order(&self) -> &MoveOrder {
        &self.order
    }

    pub fn state(&self) -> MoveState {
        self.current
    }

    /// Arrival has been detected and will be acted on next update.
    pub fn is_arriving(&self) -> bool {
        self.desired == MoveState::ReachedDestination
    }

    pub fn begin<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        self.claim(ai);
        match self.order.waypoints.take() {
            Some(waypoints) if !self.order.force_repath => {
                self.follow(ai, tick, waypoints);
                self.desired = MoveState::MoveTowardsPoint;
                self.current = MoveState::MoveTowardsPoint;
            }
            _ => {
                self.issue(ai, tick);
                self.desired = MoveState::WaitingForPath;
                self.current = MoveState::WaitingForPath;
            }
        }
    }

    /// Make the next update request a fresh path from wherever the unit is.
    ///
    /// Owners call this when they are suspended: whatever runs on top may
    /// stop the unit or move it away, so the old route cannot be trusted.
    pub fn rearm(&mut self) {
        self.order.start_hint = None;
        self.order.waypoints = None;
        self.current = MoveState::MoveTowardsPoint;
        self.desired = MoveState::WaitingForPath;
    }

    /// Returns true on the single update where arrival is acted on.
    pub fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) -> bool {
        if self.desired != self.current {
            self.current = self.desired;
            match self.current {
                MoveState::WaitingForPath => {
                    self.claim(ai);
                    self.issue(ai, tick);
                }
                MoveState::MoveTowardsPoint => {}
                MoveState::ReachedDestination => {
                    tick.world.stop(ai.unit);
                    tick.cancel_path(ai);
                    return true;
                }
            }
        }

        match self.current {
            MoveState::WaitingForPath => match tick.poll_path(ai) {
                PathPoll::Waiting => {}
                PathPoll::Ready(PathOutcome::Found(waypoints)) => {
                    self.follow(ai, tick, waypoints);
                    self.desired = MoveState::MoveTowardsPoint;
                }
                PathPoll::Ready(PathOutcome::NoPath) => {
                    warn!("[AI] {:?} has no path to {:?}, giving up", ai.unit, self.order.destination);
                    self.desired = MoveState::ReachedDestination;
                }
                PathPoll::Idle | PathPoll::Lost => self.issue(ai, tick),
            },
            MoveState::MoveTowardsPoint => {
                if tick.world.movement_state(ai.unit) == MovementState::Idle {
                    self.desired = MoveState::ReachedDestination;
                }
            }
            MoveState::ReachedDestination => {}
        }
        false
    }

    fn claim(&self, ai: &mut AIContext) {
        ai.destination = Some(self.order.destination);
        ai.formation_offset = self.order.offset;
        ai.crowd = self.order.crowd;
    }

    fn issue<W: UnitWorld>(&self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        let query = PathQuery {
            start: self.order.start_hint,
            goal: self.order.destination,
            crowd: self.order.crowd,
        };
        let priority = tick.config.order_path_priority;
        tick.request_path(ai, query, priority);
    }

    fn follow<W: UnitWorld>(&self, ai: &AIContext, tick: &mut TickContext<'_, W>, waypoints: Vec<FixedVec2>) {
        tick.world.follow_path(
            ai.unit,
            PathFollow {
                waypoints,
                offset: self.order.offset,
                crowd: self.order.crowd,
            },
        );
    }
}
