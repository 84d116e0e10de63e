use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, PathPoll, TickContext};
use crate::game::ai::world::{MovementState, PathFollow, UnitId, UnitWorld};
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::pathfinding::{PathOutcome, PathQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuitState {
    MovingTowardsTarget,
    CloseToTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuitStatus {
    TargetLost,
    Chasing,
    InRange,
}

/// Follows a moving unit until it is within range, and keeps following.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pursuit {
    desired: PursuitState,
    current: PursuitState,
    /// Target position used for the last path request.
    last_goal: Option<FixedVec2>,
    repath_timer: FixedNum,
}

impl Default for Pursuit {
    fn default() -> Self {
        Self {
            desired: PursuitState::MovingTowardsTarget,
            current: PursuitState::MovingTowardsTarget,
            last_goal: None,
            repath_timer: FixedNum::ZERO,
        }
    }
}

impl Pursuit {
    pub fn state(&self) -> PursuitState {
        self.current
    }

    /// Start chasing `target` right away.
    pub fn begin<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, target: UnitId) {
        self.desired = PursuitState::MovingTowardsTarget;
        self.current = PursuitState::MovingTowardsTarget;
        if let Some(goal) = tick.world.position(target) {
            self.chase(ai, tick, goal);
        }
    }

    pub fn update<W: UnitWorld>(
        &mut self,
        ai: &mut AIContext,
        tick: &mut TickContext<'_, W>,
        dt: FixedNum,
        target: UnitId,
        range: FixedNum,
    ) -> PursuitStatus {
        if !tick.world.is_alive(target) {
            return PursuitStatus::TargetLost;
        }
        let (Some(own), Some(goal)) = (tick.world.position(ai.unit), tick.world.position(target)) else {
            return PursuitStatus::TargetLost;
        };

        if self.desired != self.current {
            self.current = self.desired;
            match self.current {
                PursuitState::CloseToTarget => {
                    tick.world.stop(ai.unit);
                    tick.cancel_path(ai);
                }
                PursuitState::MovingTowardsTarget => self.chase(ai, tick, goal),
            }
        }

        let in_range = own.distance_squared(goal) <= range * range;
        match self.current {
            PursuitState::CloseToTarget => {
                if in_range {
                    return PursuitStatus::InRange;
                }
                self.desired = PursuitState::MovingTowardsTarget;
            }
            PursuitState::MovingTowardsTarget => {
                if in_range {
                    self.desired = PursuitState::CloseToTarget;
                    return PursuitStatus::Chasing;
                }
                self.repath_timer += dt;
                match tick.poll_path(ai) {
                    PathPoll::Waiting => {}
                    PathPoll::Ready(PathOutcome::Found(waypoints)) => {
                        tick.world.follow_path(
                            ai.unit,
                            PathFollow { waypoints, offset: FixedVec2::ZERO, crowd: None },
                        );
                    }
                    // Left idle; the repath timer tries again
                    PathPoll::Ready(PathOutcome::NoPath) => {}
                    PathPoll::Lost => self.chase(ai, tick, goal),
                    PathPoll::Idle => {
                        let target_moved = self
                            .last_goal
                            .map_or(true, |last| last.distance_squared(goal) > tick.config.repath_distance_sq);
                        let timer_due = self.repath_timer >= tick.config.repath_interval
                            && tick.world.movement_state(ai.unit) == MovementState::Idle;
                        if target_moved || timer_due {
                            self.chase(ai, tick, goal);
                        }
                    }
                }
            }
        }
        PursuitStatus::Chasing
    }

    fn chase<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, goal: FixedVec2) {
        self.last_goal = Some(goal);
        self.repath_timer = FixedNum::ZERO;
        let priority = tick.config.pursuit_path_priority;
        tick.request_path(ai, PathQuery::to(goal), priority);
    }
}
