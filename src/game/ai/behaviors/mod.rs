//! Unit behaviors.
//!
//! Every behavior is a small two-phase state machine: `update` records the
//! *desired* state, and the side effect of entering it (stopping, requesting
//! a path) runs at the start of the next update. Shared pieces live in
//! [`PointMover`] (go to a point) and [`Pursuit`] (follow a unit).
//!
//! Behaviors never reference each other. They ask the controller for stack
//! changes by returning a [`Transition`] and share data through the
//! [`AIContext`].

use serde::{Deserialize, Serialize};

use crate::game::fixed_math::FixedNum;

use super::context::{AIContext, TickContext};
use super::search::SearchForEnemy;
use super::world::{UnitId, UnitWorld};

mod attack;
mod attack_move;
mod board_to_shore;
mod idle;
mod move_to_position;
mod move_to_target;
mod point_mover;
mod pursuit;

#[cfg(test)]
mod tests;

pub use attack::Attack;
pub use attack_move::AttackMove;
pub use board_to_shore::BoardToShore;
pub use idle::Idle;
pub use move_to_position::MoveToPosition;
pub use move_to_target::MoveToTarget;
pub use point_mover::{MoveOrder, MoveState, PointMover};
pub use pursuit::{Pursuit, PursuitState, PursuitStatus};

/// Stack change requested by a behavior's update.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    None,
    /// Exit and resume the previous behavior.
    Revert,
    /// Suspend the current behavior on the stack and enter a new one.
    Push(Behavior),
    /// Exit the current behavior and enter a new one in its place.
    Replace(Behavior),
    /// Drop the whole stack and fall back to the default.
    Clear,
}

pub trait UnitBehavior {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>);
    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>);
    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, dt: FixedNum) -> Transition;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    Idle,
    MoveToPosition,
    MoveToTarget,
    Attack,
    AttackMove,
    BoardToShore,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Idle(Idle),
    MoveToPosition(MoveToPosition),
    MoveToTarget(MoveToTarget),
    Attack(Attack),
    AttackMove(AttackMove),
    BoardToShore(BoardToShore),
}

impl Behavior {
    pub fn idle() -> Self {
        Behavior::Idle(Idle::passive())
    }

    pub fn idle_scanning(line_of_sight: FixedNum, interval: FixedNum) -> Self {
        Behavior::Idle(Idle::scanning(SearchForEnemy::new(line_of_sight, interval)))
    }

    pub fn move_to(order: MoveOrder) -> Self {
        Behavior::MoveToPosition(MoveToPosition::new(order))
    }

    pub fn move_to_target(target: UnitId, range: FixedNum) -> Self {
        Behavior::MoveToTarget(MoveToTarget::new(target, range))
    }

    pub fn attack(target: UnitId) -> Self {
        Behavior::Attack(Attack::ordered(target))
    }

    pub fn attack_move(order: MoveOrder, line_of_sight: FixedNum, interval: FixedNum) -> Self {
        Behavior::AttackMove(AttackMove::new(order, SearchForEnemy::new(line_of_sight, interval)))
    }

    pub fn board_to_shore(order: MoveOrder) -> Self {
        Behavior::BoardToShore(BoardToShore::new(order))
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Idle(_) => BehaviorKind::Idle,
            Behavior::MoveToPosition(_) => BehaviorKind::MoveToPosition,
            Behavior::MoveToTarget(_) => BehaviorKind::MoveToTarget,
            Behavior::Attack(_) => BehaviorKind::Attack,
            Behavior::AttackMove(_) => BehaviorKind::AttackMove,
            Behavior::BoardToShore(_) => BehaviorKind::BoardToShore,
        }
    }
}

impl UnitBehavior for Behavior {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        match self {
            Behavior::Idle(b) => b.enter(ai, tick),
            Behavior::MoveToPosition(b) => b.enter(ai, tick),
            Behavior::MoveToTarget(b) => b.enter(ai, tick),
            Behavior::Attack(b) => b.enter(ai, tick),
            Behavior::AttackMove(b) => b.enter(ai, tick),
            Behavior::BoardToShore(b) => b.enter(ai, tick),
        }
    }

    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        match self {
            Behavior::Idle(b) => b.exit(ai, tick),
            Behavior::MoveToPosition(b) => b.exit(ai, tick),
            Behavior::MoveToTarget(b) => b.exit(ai, tick),
            Behavior::Attack(b) => b.exit(ai, tick),
            Behavior::AttackMove(b) => b.exit(ai, tick),
            Behavior::BoardToShore(b) => b.exit(ai, tick),
        }
    }

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, dt: FixedNum) -> Transition {
        match self {
            Behavior::Idle(b) => b.update(ai, tick, dt),
            Behavior::MoveToPosition(b) => b.update(ai, tick, dt),
            Behavior::MoveToTarget(b) => b.update(ai, tick, dt),
            Behavior::Attack(b) => b.update(ai, tick, dt),
            Behavior::AttackMove(b) => b.update(ai, tick, dt),
            Behavior::BoardToShore(b) => b.update(ai, tick, dt),
        }
    }
}
