use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, TickContext};
use crate::game::ai::world::{UnitId, UnitWorld};
use crate::game::fixed_math::FixedNum;

use super::pursuit::{Pursuit, PursuitStatus};
use super::{Transition, UnitBehavior};

/// Stay within `range` of another unit for as long as it lives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveToTarget {
    target: UnitId,
    range: FixedNum,
    pursuit: Pursuit,
}

impl MoveToTarget {
    pub fn new(target: UnitId, range: FixedNum) -> Self {
        Self { target, range, pursuit: Pursuit::default() }
    }

    pub fn target(&self) -> UnitId {
        self.target
    }

    pub fn pursuit(&self) -> &Pursuit {
        &self.pursuit
    }
}

impl UnitBehavior for MoveToTarget {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        ai.target = Some(self.target);
        self.pursuit.begin(ai, tick, self.target);
    }

    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        tick.cancel_path(ai);
    }

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, dt: FixedNum) -> Transition {
        match self.pursuit.update(ai, tick, dt, self.target, self.range) {
            PursuitStatus::TargetLost => Transition::Revert,
            PursuitStatus::Chasing | PursuitStatus::InRange => Transition::None,
        }
    }
}
