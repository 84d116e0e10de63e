use crate::game::ai::world::UnitId;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use super::SpatialHash;

impl SpatialHash {
    /// All units within `radius` of `pos` (inclusive), excluding `exclude`.
    ///
    /// Populates `out` instead of allocating. Clears `out` first. Results
    /// come in cell order, which callers must not rely on.
    pub fn query_radius(&self, pos: FixedVec2, radius: FixedNum, exclude: Option<UnitId>, out: &mut Vec<UnitId>) {
        out.clear();
        let radius_sq = radius * radius;

        for (col, row) in self.cells_in_radius(pos, radius) {
            let idx = row * self.cols() + col;
            for &(unit, unit_pos) in &self.cells()[idx] {
                if Some(unit) != exclude && pos.distance_squared(unit_pos) <= radius_sq {
                    out.push(unit);
                }
            }
        }
    }
}
