//! Unit AI: per-unit behavior stacks driven once per simulation tick.
//!
//! - **world**: the collaborator interface to the host simulation
//! - **context**: per-unit blackboard and the per-tick borrow bundle
//! - **search**: periodic spatial scan for enemies
//! - **behaviors**: the behavior state machines
//! - **controller**: the behavior stack

pub mod behaviors;
pub mod context;
pub mod controller;
pub mod search;
pub mod world;

pub use behaviors::{Behavior, BehaviorKind, MoveOrder, Transition, UnitBehavior};
pub use context::{AIContext, PathPoll, TickContext};
pub use controller::{ControllerSnapshot, ControllerStats, UnitAIController};
pub use search::SearchForEnemy;
pub use world::{CrowdId, FactionId, MovementState, PathFollow, UnitId, UnitKind, UnitWorld};
