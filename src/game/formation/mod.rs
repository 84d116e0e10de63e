//! Formation moves.
//!
//! A group move order is planned in three steps:
//!
//! 1. **Clustering**: units within `cluster_radius` of each other (transitively)
//!    move as one formation. Far-apart groups each form their own.
//! 2. **Slots**: each cluster gets a centered grid of slot offsets around the
//!    destination.
//! 3. **Assignment**: units are matched to slots minimizing the total squared
//!    travel distance (Hungarian algorithm, integer costs).
//!
//! Every cluster shares a fresh [`CrowdId`]; singletons get no offset and no crowd.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::ai::behaviors::MoveOrder;
use crate::game::ai::world::{CrowdId, UnitId};
use crate::game::config::SimAiConfig;
use crate::game::fixed_math::{FixedNum, FixedVec2};

pub mod cluster;
pub mod hungarian;
pub mod slots;

#[cfg(test)]
mod tests;

/// Hands out crowd ids. Persisted with the simulation so ids never repeat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdAllocator {
    next: u32,
}

impl CrowdAllocator {
    pub fn allocate(&mut self) -> CrowdId {
        let id = CrowdId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    pub fn peek_next(&self) -> CrowdId {
        CrowdId(self.next)
    }
}

/// One unit taking part in a group order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationMember {
    pub unit: UnitId,
    pub position: FixedVec2,
    /// Point of the unit's previous order (formation offset included), if any.
    pub anchor: Option<FixedVec2>,
}

/// Planned move for one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationOrder {
    pub unit: UnitId,
    pub offset: FixedVec2,
    pub crowd: Option<CrowdId>,
    /// Path start shared by the cluster. `None` paths from the unit itself.
    pub start_hint: Option<FixedVec2>,
}

impl FormationOrder {
    pub fn to_move_order(&self, destination: FixedVec2) -> MoveOrder {
        MoveOrder::to(destination)
            .with_offset(self.offset)
            .with_crowd(self.crowd)
            .with_start_hint(self.start_hint)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationPlanner {
    pub cluster_radius: FixedNum,
    /// Unit width plus spacing.
    pub slot_spacing: FixedNum,
    /// A unit whose new slot is this close (squared) to its previous anchor
    /// just shuffles locally instead of pathing from the cluster centroid.
    pub fast_rearrange_distance_sq: FixedNum,
}

impl Default for FormationPlanner {
    fn default() -> Self {
        Self::from_config(&SimAiConfig::default())
    }
}

impl FormationPlanner {
    pub fn from_config(config: &SimAiConfig) -> Self {
        Self {
            cluster_radius: config.formation_cluster_radius,
            slot_spacing: config.formation_slot_spacing,
            fast_rearrange_distance_sq: config.fast_rearrange_distance_sq,
        }
    }

    /// Plan a group move to `destination`. Pure apart from crowd allocation.
    ///
    /// Orders come back sorted by unit id.
    pub fn plan(&self, members: &[FormationMember], destination: FixedVec2, crowds: &mut CrowdAllocator) -> Vec<FormationOrder> {
        let mut members = members.to_vec();
        members.sort_by_key(|member| member.unit);
        members.dedup_by_key(|member| member.unit);

        let positions: Vec<FixedVec2> = members.iter().map(|member| member.position).collect();
        let groups = cluster::connected_groups(&positions, self.cluster_radius);

        let mut orders = Vec::with_capacity(members.len());
        for group in &groups {
            if let [single] = group.as_slice() {
                orders.push(FormationOrder {
                    unit: members[*single].unit,
                    offset: FixedVec2::ZERO,
                    crowd: None,
                    start_hint: None,
                });
                continue;
            }
            self.plan_cluster(&members, group, destination, crowds, &mut orders);
        }

        info!("[FORMATION] {} units in {} clusters heading to ({:.2}, {:.2})",
            members.len(), groups.len(), destination.x.to_num::<f32>(), destination.y.to_num::<f32>());

        orders.sort_by_key(|order| order.unit);
        orders
    }

    fn plan_cluster(
        &self,
        members: &[FormationMember],
        group: &[usize],
        destination: FixedVec2,
        crowds: &mut CrowdAllocator,
        orders: &mut Vec<FormationOrder>,
    ) {
        let offsets = slots::grid_offsets(group.len(), self.slot_spacing);
        let cost: Vec<Vec<i64>> = group
            .iter()
            .map(|&index| {
                offsets
                    .iter()
                    .map(|&offset| members[index].position.distance_squared(destination + offset).to_bits())
                    .collect()
            })
            .collect();
        let assignment = hungarian::solve(&cost);

        let crowd = crowds.allocate();
        let mut sum = FixedVec2::ZERO;
        for &index in group {
            sum += members[index].position;
        }
        let centroid = sum / FixedNum::from_num(group.len());

        for (row, &index) in group.iter().enumerate() {
            let member = &members[index];
            let offset = offsets[assignment[row]];
            let slot = destination + offset;
            let rearranging = member
                .anchor
                .is_some_and(|anchor| anchor.distance_squared(slot) <= self.fast_rearrange_distance_sq);

            orders.push(FormationOrder {
                unit: member.unit,
                offset,
                crowd: Some(crowd),
                start_hint: if rearranging { None } else { Some(centroid) },
            });
        }
    }
}
