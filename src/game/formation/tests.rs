use super::*;

fn fx(value: f32) -> FixedNum {
    FixedNum::from_num(value)
}

fn member(id: u32, x: i32, y: i32) -> FormationMember {
    FormationMember { unit: UnitId(id), position: FixedVec2::from_int(x, y), anchor: None }
}

#[test]
fn test_grid_offsets_are_centered() {
    let four = slots::grid_offsets(4, fx(1.5));
    assert_eq!(four, vec![
        FixedVec2::new(fx(-0.75), fx(-0.75)),
        FixedVec2::new(fx(0.75), fx(-0.75)),
        FixedVec2::new(fx(-0.75), fx(0.75)),
        FixedVec2::new(fx(0.75), fx(0.75)),
    ]);

    // Three columns; the short second row is centered on its own
    let five = slots::grid_offsets(5, fx(1.5));
    assert_eq!(five[0], FixedVec2::new(fx(-1.5), fx(-0.75)));
    assert_eq!(five[2], FixedVec2::new(fx(1.5), fx(-0.75)));
    assert_eq!(five[3], FixedVec2::new(fx(-0.75), fx(0.75)));
    assert_eq!(five[4], FixedVec2::new(fx(0.75), fx(0.75)));

    assert_eq!(slots::grid_offsets(1, fx(1.5)), vec![FixedVec2::ZERO]);
    assert!(slots::grid_offsets(0, fx(1.5)).is_empty());
}

#[test]
fn test_clusters_are_transitive() {
    // 0-1-2 chain within 5 of each neighbor, 3 far away
    let positions = [
        FixedVec2::from_int(0, 0),
        FixedVec2::from_int(4, 0),
        FixedVec2::from_int(8, 0),
        FixedVec2::from_int(50, 50),
    ];
    let groups = cluster::connected_groups(&positions, fx(5.0));
    assert_eq!(groups, vec![vec![0, 1, 2], vec![3]]);
}

#[test]
fn test_hungarian_matches_brute_force() {
    let mut rng = fastrand::Rng::with_seed(7);
    for size in 1..=6 {
        for _ in 0..20 {
            let cost: Vec<Vec<i64>> = (0..size).map(|_| (0..size).map(|_| rng.i64(0..1000)).collect()).collect();
            let assignment = hungarian::solve(&cost);

            let mut seen = vec![false; size];
            for &col in &assignment {
                assert!(!seen[col], "each column used once");
                seen[col] = true;
            }
            assert_eq!(hungarian::total_cost(&cost, &assignment), brute_force_min(&cost));
        }
    }
}

fn brute_force_min(cost: &[Vec<i64>]) -> i64 {
    fn permute(cost: &[Vec<i64>], row: usize, used: &mut Vec<bool>, acc: i64, best: &mut i64) {
        if row == cost.len() {
            *best = (*best).min(acc);
            return;
        }
        for col in 0..cost.len() {
            if !used[col] {
                used[col] = true;
                permute(cost, row + 1, used, acc + cost[row][col], best);
                used[col] = false;
            }
        }
    }
    let mut best = i64::MAX;
    permute(cost, 0, &mut vec![false; cost.len()], 0, &mut best);
    best
}

#[test]
fn test_assignment_never_worse_than_identity() {
    let planner = FormationPlanner::default();
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..25 {
        let count = rng.usize(2..12);
        let positions: Vec<FixedVec2> = (0..count)
            .map(|_| FixedVec2::new(fx(rng.f32() * 4.0), fx(rng.f32() * 4.0)))
            .collect();
        let destination = FixedVec2::new(fx(rng.f32() * 40.0 - 20.0), fx(rng.f32() * 40.0 - 20.0));

        let offsets = slots::grid_offsets(count, planner.slot_spacing);
        let cost: Vec<Vec<i64>> = positions
            .iter()
            .map(|&p| offsets.iter().map(|&o| p.distance_squared(destination + o).to_bits()).collect())
            .collect();
        let identity: Vec<usize> = (0..count).collect();
        let optimal = hungarian::solve(&cost);
        assert!(hungarian::total_cost(&cost, &optimal) <= hungarian::total_cost(&cost, &identity));
    }
}

#[test]
fn test_plan_gives_each_cluster_its_own_crowd() {
    let planner = FormationPlanner::default();
    let mut crowds = CrowdAllocator::default();
    let members = [
        member(4, 0, 0),
        member(2, 2, 0),
        member(9, 100, 100),
        member(7, 101, 100),
        member(5, -80, 0),
    ];
    let destination = FixedVec2::from_int(20, 20);
    let orders = planner.plan(&members, destination, &mut crowds);

    let ids: Vec<UnitId> = orders.iter().map(|o| o.unit).collect();
    assert_eq!(ids, vec![UnitId(2), UnitId(4), UnitId(5), UnitId(7), UnitId(9)]);

    let by_id = |id: u32| orders.iter().find(|o| o.unit == UnitId(id)).copied().unwrap();
    assert_eq!(by_id(2).crowd, by_id(4).crowd);
    assert_eq!(by_id(7).crowd, by_id(9).crowd);
    assert_ne!(by_id(2).crowd, by_id(7).crowd);

    // Lone unit walks straight to the destination
    let lone = by_id(5);
    assert_eq!(lone.offset, FixedVec2::ZERO);
    assert_eq!(lone.crowd, None);
    assert_eq!(lone.start_hint, None);

    // Cluster members path from their centroid and take distinct slots
    assert_eq!(by_id(2).start_hint, Some(FixedVec2::from_int(1, 0)));
    assert_ne!(by_id(2).offset, by_id(4).offset);
    assert_eq!(crowds.peek_next(), CrowdId(2));
}

#[test]
fn test_fast_rearrange_drops_start_hint_near_previous_anchor() {
    let planner = FormationPlanner::default();
    let mut crowds = CrowdAllocator::default();
    let destination = FixedVec2::from_int(0, 30);
    let near_anchor = Some(destination);
    let far_anchor = Some(FixedVec2::from_int(0, 0));

    let members = [
        FormationMember { unit: UnitId(1), position: FixedVec2::from_int(0, 0), anchor: near_anchor },
        FormationMember { unit: UnitId(2), position: FixedVec2::from_int(1, 0), anchor: far_anchor },
    ];
    let orders = planner.plan(&members, destination, &mut crowds);

    assert_eq!(orders[0].start_hint, None, "slot within threshold of the old anchor");
    assert!(orders[1].start_hint.is_some());
}

#[test]
fn test_units_take_the_slot_on_their_side() {
    let planner = FormationPlanner { slot_spacing: fx(2.0), ..FormationPlanner::default() };
    let mut crowds = CrowdAllocator::default();
    // Left unit listed with the higher id so identity order would cross paths
    let members = [member(1, 2, 0), member(2, -2, 0)];
    let orders = planner.plan(&members, FixedVec2::ZERO, &mut crowds);

    assert!(orders[0].crowd.is_some(), "both units within the cluster radius");
    assert_eq!(orders[0].crowd, orders[1].crowd);

    assert_eq!(orders[0].offset, FixedVec2::new(fx(1.0), FixedNum::ZERO));
    assert_eq!(orders[1].offset, FixedVec2::new(fx(-1.0), FixedNum::ZERO));
}
