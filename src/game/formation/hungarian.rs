use fixedbitset::FixedBitSet;

/// Minimum-cost perfect matching on a square cost matrix (Kuhn-Munkres with
/// potentials, O(n^3)).
///
/// Returns `assignment` where row `i` is matched to column `assignment[i]`.
/// Costs are integers so every participant finds the same matching; ties are
/// broken by scan order, which is fixed.
pub fn solve(cost: &[Vec<i64>]) -> Vec<usize> {
    let n = cost.len();
    if n == 0 {
        return Vec::new();
    }
    debug_assert!(cost.iter().all(|row| row.len() == n), "cost matrix must be square");

    const INF: i64 = i64::MAX / 4;

    // 1-based; column 0 is the virtual source of each augmenting search
    let mut row_potential = vec![0i64; n + 1];
    let mut col_potential = vec![0i64; n + 1];
    let mut matched_row = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        matched_row[0] = row;
        let mut col0 = 0usize;
        let mut min_slack = vec![INF; n + 1];
        let mut used = FixedBitSet::with_capacity(n + 1);

        loop {
            used.insert(col0);
            let row0 = matched_row[col0];
            let mut delta = INF;
            let mut col1 = 0usize;

            for col in 1..=n {
                if used.contains(col) {
                    continue;
                }
                let slack = cost[row0 - 1][col - 1] - row_potential[row0] - col_potential[col];
                if slack < min_slack[col] {
                    min_slack[col] = slack;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }

            for col in 0..=n {
                if used.contains(col) {
                    row_potential[matched_row[col]] += delta;
                    col_potential[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            col0 = col1;
            if matched_row[col0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let col1 = way[col0];
            matched_row[col0] = matched_row[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for col in 1..=n {
        if matched_row[col] != 0 {
            assignment[matched_row[col] - 1] = col - 1;
        }
    }
    assignment
}

/// Total cost of an assignment produced by [`solve`].
pub fn total_cost(cost: &[Vec<i64>], assignment: &[usize]) -> i64 {
    assignment.iter().enumerate().map(|(row, &col)| cost[row][col]).sum()
}
