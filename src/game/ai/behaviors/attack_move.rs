use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, TickContext};
use crate::game::ai::search::SearchForEnemy;
use crate::game::ai::world::UnitWorld;
use crate::game::fixed_math::FixedNum;

use super::point_mover::{MoveOrder, PointMover};
use super::{Attack, Behavior, Transition, UnitBehavior};

/// Move to a point, engaging enemies spotted on the way.
///
/// An engagement is pushed on top of this behavior. When it ends, this
/// behavior resumes and requests a fresh path from wherever the fight left
/// the unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackMove {
    mover: PointMover,
    search: SearchForEnemy,
}

impl AttackMove {
    pub fn new(order: MoveOrder, search: SearchForEnemy) -> Self {
        Self { mover: PointMover::new(order), search }
    }

    pub fn mover(&self) -> &PointMover {
        &self.mover
    }
}

impl UnitBehavior for AttackMove {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        self.search.reset();
        self.mover.begin(ai, tick);
    }

    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        tick.cancel_path(ai);
        self.mover.rearm();
    }

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, dt: FixedNum) -> Transition {
        if self.mover.update(ai, tick) {
            return Transition::Revert;
        }
        if self.mover.is_arriving() || ai.attack_range.is_none() {
            return Transition::None;
        }

        match self.search.poll(ai, &*tick.world, dt) {
            Some(enemy) => {
                let rescan = SearchForEnemy::new(self.search.line_of_sight, self.search.interval);
                Transition::Push(Behavior::Attack(Attack::unordered(enemy, rescan)))
            }
            None => Transition::None,
        }
    }
}
