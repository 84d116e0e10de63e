use bevy::prelude::*;

/// Deterministic tick counter, incremented once per fixed step before any
/// AI work runs. The first simulated tick is 1.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}
