use serde::{Deserialize, Serialize};

use crate::game::collections::PriorityHeap;
use crate::game::fixed_math::FixedNum;

use super::context::AIContext;
use super::world::{UnitId, UnitKind, UnitWorld};

/// Periodic scan for the closest hostile mobile unit.
///
/// The timer accumulates `dt`; once it exceeds `interval` it resets to zero
/// (the excess is dropped) and the scan fires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchForEnemy {
    timer: FixedNum,
    pub line_of_sight: FixedNum,
    pub interval: FixedNum,
}

impl SearchForEnemy {
    pub fn new(line_of_sight: FixedNum, interval: FixedNum) -> Self {
        Self { timer: FixedNum::ZERO, line_of_sight, interval }
    }

    /// Advance the timer. Returns true when a scan is due.
    pub fn tick(&mut self, dt: FixedNum) -> bool {
        self.timer += dt;
        if self.timer > self.interval {
            self.timer = FixedNum::ZERO;
            true
        } else {
            false
        }
    }

    /// Make the next [`tick`](Self::tick) fire regardless of elapsed time.
    pub fn force_fire(&mut self) {
        self.timer = self.interval + FixedNum::DELTA;
    }

    pub fn reset(&mut self) {
        self.timer = FixedNum::ZERO;
    }

    pub fn elapsed(&self) -> FixedNum {
        self.timer
    }

    /// Tick and, if due, scan. `None` when not due or nothing was found.
    pub fn poll<W: UnitWorld>(&mut self, ai: &AIContext, world: &W, dt: FixedNum) -> Option<UnitId> {
        if self.tick(dt) {
            self.scan(ai, world)
        } else {
            None
        }
    }

    /// Closest living mobile unit of another faction within line of sight.
    ///
    /// Ties on distance go to the lower id, so the result does not depend on
    /// the order the spatial index returns candidates in.
    pub fn scan<W: UnitWorld>(&self, ai: &AIContext, world: &W) -> Option<UnitId> {
        let origin = world.position(ai.unit)?;
        let faction = world.faction(ai.unit)?;

        let mut candidates = Vec::new();
        world.query_in_radius(origin, self.line_of_sight, &mut candidates);

        let mut closest: PriorityHeap<UnitId, (FixedNum, UnitId)> = PriorityHeap::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate == ai.unit
                || world.kind(candidate) != Some(UnitKind::Mobile)
                || !world.is_alive(candidate)
                || world.faction(candidate) == Some(faction)
            {
                continue;
            }
            let Some(position) = world.position(candidate) else {
                continue;
            };
            closest.push(candidate, (origin.distance_squared(position), candidate));
        }

        closest.pop().ok()
    }
}
