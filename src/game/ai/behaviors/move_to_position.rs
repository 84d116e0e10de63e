use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, TickContext};
use crate::game::ai::world::UnitWorld;
use crate::game::fixed_math::FixedNum;

use super::point_mover::{MoveOrder, PointMover};
use super::{Transition, UnitBehavior};

/// Go to a point, then hand control back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveToPosition {
    mover: PointMover,
}

impl MoveToPosition {
    pub fn new(order: MoveOrder) -> Self {
        Self { mover: PointMover::new(order) }
    }

    pub fn mover(&self) -> &PointMover {
        &self.mover
    }
}

impl UnitBehavior for MoveToPosition {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        self.mover.begin(ai, tick);
    }

    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        tick.cancel_path(ai);
        self.mover.rearm();
    }

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, _dt: FixedNum) -> Transition {
        if self.mover.update(ai, tick) {
            Transition::Revert
        } else {
            Transition::None
        }
    }
}
