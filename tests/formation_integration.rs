use tidewater::game::ai::behaviors::BehaviorKind;
use tidewater::game::ai::world::{FactionId, MovementState, UnitId, UnitWorld};
use tidewater::game::fixed_math::FixedVec2;
use tidewater::game::sandbox::UnitSpec;
use tidewater::game::Behavior;

mod common;
use common::{empty_simulation, kind, run};

#[test]
fn test_clustered_group_gets_distinct_slots_and_shared_crowd() {
    let mut sim = empty_simulation();
    let units: Vec<UnitId> = [(10, 10), (11, 10), (10, 11), (11, 11)]
        .into_iter()
        .map(|(x, y)| {
            let unit = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(x, y)));
            sim.add_unit(unit, Some(Behavior::idle()));
            unit
        })
        .collect();

    let destination = FixedVec2::from_int(30, 30);
    let orders = sim.issue_formation_move(&units, destination);
    assert_eq!(orders.len(), 4);

    let crowd = orders[0].crowd;
    assert!(crowd.is_some());
    assert!(orders.iter().all(|order| order.crowd == crowd));
    for (i, a) in orders.iter().enumerate() {
        for b in &orders[i + 1..] {
            assert_ne!(a.offset, b.offset, "{:?} and {:?} share a slot", a.unit, b.unit);
        }
    }

    run(&mut sim, 200);

    for order in &orders {
        assert_eq!(sim.world().position(order.unit), Some(destination + order.offset));
        assert_eq!(sim.world().movement_state(order.unit), MovementState::Idle);
        assert_eq!(kind(&sim, order.unit), Some(BehaviorKind::Idle));
    }
}

#[test]
fn test_scattered_units_move_alone() {
    let mut sim = empty_simulation();
    let near = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(10, 10)));
    let far = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(90, 90)));
    sim.add_unit(near, Some(Behavior::idle()));
    sim.add_unit(far, Some(Behavior::idle()));

    let destination = FixedVec2::from_int(50, 50);
    let orders = sim.issue_formation_move(&[far, near, far], destination);
    assert_eq!(orders.len(), 2, "duplicates are planned once");
    for order in &orders {
        assert_eq!(order.offset, FixedVec2::ZERO);
        assert_eq!(order.crowd, None);
        assert_eq!(order.start_hint, None);
    }
}

#[test]
fn test_units_without_controller_or_dead_are_left_out() {
    let mut sim = empty_simulation();
    let controlled = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(10, 10)));
    let uncontrolled = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(11, 10)));
    let dead = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(10, 11)));
    sim.add_unit(controlled, Some(Behavior::idle()));
    sim.add_unit(dead, Some(Behavior::idle()));
    sim.world_mut().kill(dead);

    let orders = sim.issue_formation_move(&[controlled, uncontrolled, dead], FixedVec2::from_int(40, 40));
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].unit, controlled);
}

#[test]
fn test_formation_attack_move_engages_then_reaches_slots() {
    let mut sim = empty_simulation();
    let squad: Vec<UnitId> = [(10, 50), (11, 50), (10, 51)]
        .into_iter()
        .map(|(x, y)| {
            let unit = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(x, y)));
            sim.add_unit(unit, Some(Behavior::idle()));
            unit
        })
        .collect();
    let enemy = sim.world_mut().spawn(
        UnitSpec::mobile(FactionId(1), FixedVec2::from_int(30, 50)).with_attack(None),
    );

    let destination = FixedVec2::from_int(50, 50);
    let orders = sim.issue_formation_attack_move(&squad, destination, common::fx(8.0));

    // 100 hp, 10 damage every 10 ticks from three attackers
    run(&mut sim, 600);

    assert!(!sim.world().is_alive(enemy));
    assert!(squad.iter().any(|&unit| sim.world().attacks_started(unit) > 0));
    for order in &orders {
        assert_eq!(sim.world().position(order.unit), Some(destination + order.offset));
        assert_eq!(kind(&sim, order.unit), Some(BehaviorKind::Idle));
    }
}
