use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, TickContext};
use crate::game::ai::world::{UnitKind, UnitWorld};
use crate::game::fixed_math::FixedNum;

use super::point_mover::{MoveOrder, PointMover};
use super::{Transition, UnitBehavior};

/// Sail to a point, then dock if any navigation link reaches the shore.
///
/// The dock check runs one tick after arrival so the mover has settled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardToShore {
    mover: PointMover,
    /// Tick on which the dock check runs.
    pending_dock: Option<u64>,
}

impl BoardToShore {
    pub fn new(order: MoveOrder) -> Self {
        Self { mover: PointMover::new(order), pending_dock: None }
    }

    pub fn pending_dock(&self) -> Option<u64> {
        self.pending_dock
    }

    fn try_dock<W: UnitWorld>(&self, ai: &AIContext, tick: &mut TickContext<'_, W>) -> bool {
        let radius = tick.config.dock_sample_radius;
        for link in tick.world.navigation_links(ai.unit) {
            if let Some(shore) = tick.world.sample_navigable(link, radius) {
                tick.world.set_docked(ai.unit, true);
                info!("[AI] {:?} docked at ({:.2}, {:.2})", ai.unit, shore.x.to_num::<f32>(), shore.y.to_num::<f32>());
                return true;
            }
        }
        false
    }
}

impl UnitBehavior for BoardToShore {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        self.pending_dock = None;
        self.mover.begin(ai, tick);
    }

    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        self.pending_dock = None;
        tick.cancel_path(ai);
        self.mover.rearm();
    }

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, _dt: FixedNum) -> Transition {
        if let Some(due) = self.pending_dock {
            if tick.tick_id < due {
                return Transition::None;
            }
            self.pending_dock = None;
            if !self.try_dock(ai, tick) {
                debug!("[AI] {:?} found no shore link to dock at", ai.unit);
            }
            return Transition::Revert;
        }

        if !self.mover.update(ai, tick) {
            return Transition::None;
        }
        let is_ship = tick.world.kind(ai.unit) == Some(UnitKind::Ship);
        if is_ship && !tick.world.is_docked(ai.unit) {
            self.pending_dock = Some(tick.tick_id + 1);
            Transition::None
        } else {
            Transition::Revert
        }
    }
}
