use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::game::fixed_math::{FixedNum, FixedVec2};

/// Split points into groups where every point is within `radius` of at
/// least one other point of its group (breadth-first flood).
///
/// Groups come out ordered by their lowest index, and indices within a group
/// are ascending, so the result depends only on the input order.
pub fn connected_groups(positions: &[FixedVec2], radius: FixedNum) -> Vec<Vec<usize>> {
    let radius_sq = radius * radius;
    let mut visited = FixedBitSet::with_capacity(positions.len());
    let mut groups = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..positions.len() {
        if visited.contains(seed) {
            continue;
        }
        visited.insert(seed);
        queue.push_back(seed);

        let mut group = Vec::new();
        while let Some(current) = queue.pop_front() {
            group.push(current);
            for other in 0..positions.len() {
                if !visited.contains(other) && positions[current].distance_squared(positions[other]) <= radius_sq {
                    visited.insert(other);
                    queue.push_back(other);
                }
            }
        }

        group.sort_unstable();
        groups.push(group);
    }

    groups
}
