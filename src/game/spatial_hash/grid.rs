use crate::game::ai::world::UnitId;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use super::SpatialHash;

impl SpatialHash {
    /// Whether `pos` lies inside the mapped area.
    pub fn contains(&self, pos: FixedVec2) -> bool {
        self.get_cell_idx(pos).is_some()
    }

    pub(crate) fn get_cell_idx(&self, pos: FixedVec2) -> Option<usize> {
        // Map is centered at 0,0. Coordinates are [-half_w, half_w].
        // Shift to [0, w]
        let half_w = self.map_width() / FixedNum::from_num(2);
        let half_h = self.map_height() / FixedNum::from_num(2);

        let x = pos.x + half_w;
        let y = pos.y + half_h;

        if x < FixedNum::ZERO || x >= self.map_width() || y < FixedNum::ZERO || y >= self.map_height() {
            return None;
        }

        let col = (x / self.cell_size()).to_num::<usize>();
        let row = (y / self.cell_size()).to_num::<usize>();

        if col >= self.cols() || row >= self.rows() {
            return None;
        }

        Some(row * self.cols() + col)
    }

    /// Returns false (and stores nothing) when `pos` is off the map.
    pub fn insert(&mut self, unit: UnitId, pos: FixedVec2) -> bool {
        match self.get_cell_idx(pos) {
            Some(idx) => {
                self.cells_mut()[idx].push((unit, pos));
                true
            }
            None => false,
        }
    }

    /// Remove `unit` from the cell covering `pos`.
    pub fn remove(&mut self, unit: UnitId, pos: FixedVec2) {
        if let Some(idx) = self.get_cell_idx(pos) {
            self.cells_mut()[idx].retain(|&(u, _)| u != unit);
        }
    }

    /// Move `unit` from `old` to `new`, touching only the affected cells.
    pub fn update(&mut self, unit: UnitId, old: FixedVec2, new: FixedVec2) {
        let old_idx = self.get_cell_idx(old);
        let new_idx = self.get_cell_idx(new);

        if old_idx == new_idx {
            if let Some(idx) = new_idx {
                for entry in self.cells_mut()[idx].iter_mut().filter(|(u, _)| *u == unit) {
                    entry.1 = new;
                }
            }
            return;
        }

        if let Some(idx) = old_idx {
            self.cells_mut()[idx].retain(|&(u, _)| u != unit);
        }
        if let Some(idx) = new_idx {
            self.cells_mut()[idx].push((unit, new));
        }
    }

    /// Cells whose bounds overlap the square around a circle, row-major.
    pub fn cells_in_radius(&self, pos: FixedVec2, radius: FixedNum) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();

        let half_w = self.map_width() / FixedNum::from_num(2);
        let half_h = self.map_height() / FixedNum::from_num(2);

        let min_x = pos.x - radius + half_w;
        let max_x = pos.x + radius + half_w;
        let min_y = pos.y - radius + half_h;
        let max_y = pos.y + radius + half_h;

        // Clamp to 0 after min() to avoid usize underflow
        let min_col = (min_x / self.cell_size()).floor().to_num::<isize>().max(0) as usize;
        let max_col = (max_x / self.cell_size()).floor().to_num::<isize>().min((self.cols() as isize) - 1).max(0) as usize;
        let min_row = (min_y / self.cell_size()).floor().to_num::<isize>().max(0) as usize;
        let max_row = (max_y / self.cell_size()).floor().to_num::<isize>().min((self.rows() as isize) - 1).max(0) as usize;

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                cells.push((col, row));
            }
        }

        cells
    }
}
