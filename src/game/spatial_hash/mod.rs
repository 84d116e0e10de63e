use crate::game::ai::world::UnitId;
use crate::game::fixed_math::{FixedNum, FixedVec2};

mod grid;
mod query;

/// Spatial partitioning grid for proximity queries in 2D space.
///
/// The spatial hash divides the world into a uniform grid of cells, allowing
/// O(1) insertion and radius queries that only visit the cells overlapping
/// the query circle.
///
/// # Example
///
/// ```rust
/// use tidewater::game::ai::world::UnitId;
/// use tidewater::game::fixed_math::{FixedNum, FixedVec2};
/// use tidewater::game::spatial_hash::SpatialHash;
///
/// let mut hash = SpatialHash::new(
///     FixedNum::from_num(100.0), // map width
///     FixedNum::from_num(100.0), // map height
///     FixedNum::from_num(5.0)    // cell size
/// );
///
/// hash.insert(UnitId(1), FixedVec2::from_int(10, 20));
///
/// let mut nearby = Vec::new();
/// hash.query_radius(FixedVec2::from_int(12, 20), FixedNum::from_num(5.0), None, &mut nearby);
/// assert_eq!(nearby, vec![UnitId(1)]);
/// ```
///
/// # Implementation Notes
///
/// - Uses fixed-point math for deterministic cross-platform behavior
/// - Cells use `Vec` instead of `HashSet` for cache locality and stable order
/// - Origin is at the map center; coordinates span `[-width/2, width/2)`
#[derive(Clone, Debug)]
pub struct SpatialHash {
    cell_size: FixedNum,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<(UnitId, FixedVec2)>>,
    map_width: FixedNum,
    map_height: FixedNum,
}

impl SpatialHash {
    pub fn new(map_width: FixedNum, map_height: FixedNum, cell_size: FixedNum) -> Self {
        let cols = (map_width / cell_size).ceil().to_num::<usize>() + 1;
        let rows = (map_height / cell_size).ceil().to_num::<usize>() + 1;

        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            map_width,
            map_height,
        }
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Count the total number of entries across all cells.
    pub fn total_entries(&self) -> usize {
        self.cells.iter().map(|cell| cell.len()).sum()
    }

    pub fn non_empty_cells(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    // Getters for grid parameters
    pub fn cell_size(&self) -> FixedNum { self.cell_size }
    pub fn map_width(&self) -> FixedNum { self.map_width }
    pub fn map_height(&self) -> FixedNum { self.map_height }
    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }

    // Internal accessors for submodules
    pub(crate) fn cells(&self) -> &Vec<Vec<(UnitId, FixedVec2)>> {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<Vec<(UnitId, FixedVec2)>> {
        &mut self.cells
    }
}
