use bevy::prelude::*;

use crate::game::ai::world::UnitWorld;

use super::driver::AiSimulation;
use super::resources::SimTick;

/// Advance the deterministic tick counter.
///
/// Runs first in every FixedUpdate so the rest of the tick sees the current
/// value for deterministic logic and conditional logging.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

/// Run one AI tick with the fixed tick delta.
///
/// `dt` comes from the simulation config, never from wall-clock time.
pub fn run_ai_tick<W: UnitWorld>(tick: Res<SimTick>, simulation: Option<ResMut<AiSimulation<W>>>) {
    let Some(mut simulation) = simulation else {
        return;
    };
    let dt = simulation.config().tick_delta;
    simulation.on_tick(dt, tick.get());
}
