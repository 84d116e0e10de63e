//! Collaborator interface between the AI core and the host simulation.
//!
//! Everything behind [`UnitWorld`] is owned by the host game: unit storage,
//! the spatial index, the path solver, movement, combat and docking. The AI
//! core only asks questions and issues orders through this trait, so it can
//! run inside a Bevy app, a headless server, or a test harness unchanged.

use serde::{Deserialize, Serialize};

use crate::game::fixed_math::{FixedNum, FixedVec2};

/// Opaque identity of a simulated unit.
///
/// Ordered so that every map keyed by units iterates identically on all
/// lockstep participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Team/owner a unit fights for. Units of different factions are hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u8);

/// Token grouping units that coordinate local avoidance during one move order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CrowdId(pub u32);

/// Broad category of an entity returned by the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Mobile combat unit. The only kind the enemy search targets.
    Mobile,
    /// Naval unit. Can board to shore.
    Ship,
    Structure,
    Resource,
}

/// Coarse state reported by the host's mover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    Idle,
    Moving,
}

/// Route handed to the mover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathFollow {
    pub waypoints: Vec<FixedVec2>,
    /// Formation offset added to every waypoint.
    pub offset: FixedVec2,
    pub crowd: Option<CrowdId>,
}

/// Host-side services the AI core depends on.
///
/// All methods must be deterministic given identical simulation state.
/// Queries about dead or unknown units return `None`/`false` rather than panicking.
pub trait UnitWorld: Send + Sync + 'static {
    // ------------------------------------------------------------------
    // Liveness and identity
    // ------------------------------------------------------------------

    /// Liveness/validity predicate: the unit exists and is not dead/removed.
    fn is_alive(&self, unit: UnitId) -> bool;
    fn position(&self, unit: UnitId) -> Option<FixedVec2>;
    fn faction(&self, unit: UnitId) -> Option<FactionId>;
    fn kind(&self, unit: UnitId) -> Option<UnitKind>;

    // ------------------------------------------------------------------
    // Spatial index
    // ------------------------------------------------------------------

    /// Populate `out` with every entity within `radius` of `center`.
    /// Clears `out` first. Result order carries no meaning.
    fn query_in_radius(&self, center: FixedVec2, radius: FixedNum, out: &mut Vec<UnitId>);

    // ------------------------------------------------------------------
    // Path solver
    // ------------------------------------------------------------------

    /// Solve a route. `None` means no path exists.
    fn request_path(&mut self, start: FixedVec2, goal: FixedVec2, crowd: Option<CrowdId>) -> Option<Vec<FixedVec2>>;

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    fn follow_path(&mut self, unit: UnitId, path: PathFollow);
    fn stop(&mut self, unit: UnitId);
    fn movement_state(&self, unit: UnitId) -> MovementState;

    // ------------------------------------------------------------------
    // Actions and combat
    // ------------------------------------------------------------------

    /// An action (attack swing, ability, animation lock) is in progress.
    fn is_playing_action(&self, unit: UnitId) -> bool;
    /// Attack cooldown has elapsed.
    fn attack_ready(&self, unit: UnitId) -> bool;
    /// Maximum attack range, or `None` if the unit cannot attack.
    fn attack_range(&self, unit: UnitId) -> Option<FixedNum>;
    fn face_towards(&mut self, unit: UnitId, point: FixedVec2);
    /// Begin an attack action. Returns false if the host refused it.
    fn start_attack(&mut self, unit: UnitId, target: UnitId) -> bool;

    // ------------------------------------------------------------------
    // Naval docking
    // ------------------------------------------------------------------

    fn is_docked(&self, _unit: UnitId) -> bool {
        false
    }

    fn set_docked(&mut self, _unit: UnitId, _docked: bool) {}

    /// Endpoints of navigation links registered to a ship (shore connections).
    fn navigation_links(&self, _unit: UnitId) -> Vec<FixedVec2> {
        Vec::new()
    }

    /// Nearest point on the navigable surface within `max_distance` of `point`.
    fn sample_navigable(&self, _point: FixedVec2, _max_distance: FixedNum) -> Option<FixedVec2> {
        None
    }
}
