pub mod ai;
pub mod collections;
pub mod config;
pub mod fixed_math;
pub mod formation;
pub mod pathfinding;
pub mod sandbox;
pub mod simulation;
pub mod snapshot;
pub mod spatial_hash;

pub use ai::{Behavior, UnitAIController, UnitId, UnitWorld};
pub use config::{AiConfig, SimAiConfig};
pub use simulation::{AiPlugin, AiSet, AiSimulation, SimTick};
