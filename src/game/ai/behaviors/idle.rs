use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, TickContext};
use crate::game::ai::search::SearchForEnemy;
use crate::game::ai::world::UnitWorld;
use crate::game::fixed_math::FixedNum;

use super::{Attack, Behavior, Transition, UnitBehavior};

/// Stand still. With a line of sight configured, watch for enemies and
/// engage the closest one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Idle {
    search: Option<SearchForEnemy>,
}

impl Idle {
    pub fn passive() -> Self {
        Self { search: None }
    }

    pub fn scanning(search: SearchForEnemy) -> Self {
        Self { search: Some(search) }
    }

    pub fn search(&self) -> Option<&SearchForEnemy> {
        self.search.as_ref()
    }
}

impl UnitBehavior for Idle {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        tick.world.stop(ai.unit);
        if let Some(search) = self.search.as_mut() {
            search.reset();
        }
    }

    fn exit<W: UnitWorld>(&mut self, _ai: &mut AIContext, _tick: &mut TickContext<'_, W>) {}

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, dt: FixedNum) -> Transition {
        let Some(search) = self.search.as_mut() else {
            return Transition::None;
        };
        if ai.attack_range.is_none() {
            return Transition::None;
        }
        match search.poll(ai, &*tick.world, dt) {
            Some(enemy) => {
                let pursuit_search = SearchForEnemy::new(search.line_of_sight, search.interval);
                Transition::Push(Behavior::Attack(Attack::unordered(enemy, pursuit_search)))
            }
            None => Transition::None,
        }
    }
}
