use crate::game::fixed_math::{ceil_sqrt, FixedNum, FixedVec2};

/// Slot offsets of a square-ish grid for `count` units, centered on the origin.
///
/// `ceil(sqrt(count))` columns; every row (including a short last row) is
/// centered horizontally and the block of rows is centered vertically.
pub fn grid_offsets(count: usize, spacing: FixedNum) -> Vec<FixedVec2> {
    if count == 0 {
        return Vec::new();
    }
    let columns = ceil_sqrt(count);
    let rows = count.div_ceil(columns);
    let half = spacing / FixedNum::from_num(2);

    (0..count)
        .map(|index| {
            let row = index / columns;
            let col = index % columns;
            let in_row = columns.min(count - row * columns);

            let x = (2 * col as i64) - (in_row as i64 - 1);
            let y = (2 * row as i64) - (rows as i64 - 1);
            FixedVec2::new(half * FixedNum::from_num(x), half * FixedNum::from_num(y))
        })
        .collect()
}
