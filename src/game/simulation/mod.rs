/// Simulation layer: drives the AI once per fixed step.
///
/// This module is organized into:
/// - **driver**: [`AiSimulation`], the explicit owner of all AI state
/// - **resources**: tick counter
/// - **systems**: the fixed-step systems the plugin registers

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::game::ai::world::UnitWorld;
use crate::game::config::{AiConfig, SimAiConfig, DEFAULT_CONFIG_PATH};

// Module declarations
pub mod driver;
pub mod resources;
pub mod systems;

// Re-export commonly used items
pub use driver::AiSimulation;
pub use resources::*;

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum AiSet {
    /// Advance the tick counter, then the scheduler and every controller.
    Tick,
    /// Host world integration (movement, combat resolution) after the AI decided.
    World,
}

/// Runs an [`AiSimulation<W>`] every `FixedUpdate`.
///
/// The plugin installs the configuration, the fixed timestep and the tick
/// counter. The simulation itself needs the host world, so the app inserts
/// the `AiSimulation<W>` resource; ticks run only while it exists.
pub struct AiPlugin<W> {
    config: AiConfig,
    _world: PhantomData<fn() -> W>,
}

impl<W> AiPlugin<W> {
    pub fn new(config: AiConfig) -> Self {
        Self { config, _world: PhantomData }
    }

    /// Load the configuration from a RON file, falling back to defaults.
    pub fn from_file(path: &str) -> Self {
        Self::new(AiConfig::load_or_default(path))
    }
}

impl<W> Default for AiPlugin<W> {
    fn default() -> Self {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }
}

impl<W: UnitWorld> Plugin for AiPlugin<W> {
    fn build(&self, app: &mut App) {
        let sim_config: SimAiConfig = self.config.to_sim();

        // Configure FixedUpdate timestep
        app.insert_resource(Time::<Fixed>::from_hz(sim_config.tick_rate));

        app.insert_resource(self.config.clone());
        app.insert_resource(sim_config);
        app.init_resource::<SimTick>();

        app.configure_sets(FixedUpdate, (AiSet::Tick, AiSet::World).chain());

        app.add_systems(FixedUpdate, (
            // Increment tick counter first (before all other systems)
            systems::increment_sim_tick,
            systems::run_ai_tick::<W>,
        ).chain().in_set(AiSet::Tick));
    }
}
