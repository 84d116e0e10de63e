use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::ai::context::{AIContext, TickContext};
use crate::game::ai::search::SearchForEnemy;
use crate::game::ai::world::{UnitId, UnitWorld};
use crate::game::fixed_math::FixedNum;

use super::pursuit::{Pursuit, PursuitStatus};
use super::{Transition, UnitBehavior};

/// Chase a unit into weapon range and attack it whenever the cooldown allows.
///
/// An ordered attack sticks to its target and reverts when it dies. An
/// unordered one (started by a scan) keeps scanning and switches to whatever
/// is closest, including when its target dies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    target: UnitId,
    pursuit: Pursuit,
    /// `None` for explicitly ordered attacks.
    rescan: Option<SearchForEnemy>,
}

impl Attack {
    pub fn ordered(target: UnitId) -> Self {
        Self { target, pursuit: Pursuit::default(), rescan: None }
    }

    pub fn unordered(target: UnitId, rescan: SearchForEnemy) -> Self {
        Self { target, pursuit: Pursuit::default(), rescan: Some(rescan) }
    }

    pub fn target(&self) -> UnitId {
        self.target
    }

    pub fn is_ordered(&self) -> bool {
        self.rescan.is_none()
    }

    pub fn pursuit(&self) -> &Pursuit {
        &self.pursuit
    }

    fn retarget<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, target: UnitId) {
        debug!("[AI] {:?} switches target {:?} -> {:?}", ai.unit, self.target, target);
        self.target = target;
        ai.target = Some(target);
        self.pursuit.begin(ai, tick, target);
    }
}

impl UnitBehavior for Attack {
    fn enter<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        ai.target = Some(self.target);
        ai.refresh_combat(&*tick.world);
        self.pursuit.begin(ai, tick, self.target);
    }

    fn exit<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>) {
        tick.cancel_path(ai);
        tick.world.stop(ai.unit);
    }

    fn update<W: UnitWorld>(&mut self, ai: &mut AIContext, tick: &mut TickContext<'_, W>, dt: FixedNum) -> Transition {
        let Some(range) = ai.attack_range else {
            warn!("[AI] {:?} cannot attack, dropping attack on {:?}", ai.unit, self.target);
            return Transition::Revert;
        };

        let mut next_target = None;
        if let Some(rescan) = self.rescan.as_mut() {
            if !tick.world.is_alive(self.target) {
                match rescan.scan(ai, &*tick.world) {
                    Some(found) => next_target = Some(found),
                    None => return Transition::Revert,
                }
            } else if let Some(found) = rescan.poll(ai, &*tick.world, dt) {
                if found != self.target {
                    next_target = Some(found);
                }
            }
        } else if !tick.world.is_alive(self.target) {
            return Transition::Revert;
        }
        if let Some(found) = next_target {
            self.retarget(ai, tick, found);
        }

        match self.pursuit.update(ai, tick, dt, self.target, range) {
            PursuitStatus::TargetLost => Transition::Revert,
            PursuitStatus::Chasing => Transition::None,
            PursuitStatus::InRange => {
                if let Some(point) = tick.world.position(self.target) {
                    tick.world.face_towards(ai.unit, point);
                }
                if tick.world.attack_ready(ai.unit) && !tick.world.is_playing_action(ai.unit) {
                    tick.world.start_attack(ai.unit, self.target);
                }
                Transition::None
            }
        }
    }
}
