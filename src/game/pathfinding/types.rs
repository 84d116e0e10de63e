use serde::{Deserialize, Serialize};

use crate::game::ai::world::CrowdId;
use crate::game::fixed_math::FixedVec2;

/// Identifies one submitted request.
///
/// Tickets are the scheduler's insertion sequence numbers, so they are unique
/// for the lifetime of a scheduler (including across save/load).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestTicket(pub u64);

/// What to solve when the request is executed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathQuery {
    /// Explicit start. `None` uses the owner's position at execution time.
    pub start: Option<FixedVec2>,
    pub goal: FixedVec2,
    pub crowd: Option<CrowdId>,
}

impl PathQuery {
    pub fn to(goal: FixedVec2) -> Self {
        Self { start: None, goal, crowd: None }
    }
}

/// Result delivered to the owner of an executed request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathOutcome {
    Found(Vec<FixedVec2>),
    NoPath,
}
