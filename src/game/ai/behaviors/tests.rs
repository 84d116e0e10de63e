use crate::game::ai::behaviors::{Behavior, BehaviorKind, MoveOrder, PursuitState};
use crate::game::ai::world::{FactionId, MovementState, UnitId, UnitWorld};
use crate::game::config::SimAiConfig;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::sandbox::{run_tick, AttackSpec, SandboxWorld, UnitSpec};
use crate::game::simulation::AiSimulation;

fn fx(value: f32) -> FixedNum {
    FixedNum::from_num(value)
}

fn simulation() -> AiSimulation<SandboxWorld> {
    let world = SandboxWorld::new(fx(200.0), fx(200.0), fx(10.0));
    AiSimulation::new(world, SimAiConfig::default())
}

fn run(sim: &mut AiSimulation<SandboxWorld>, ticks: u64) {
    let start = sim.tick() + 1;
    for tick in start..start + ticks {
        run_tick(sim, tick);
    }
}

fn kind(sim: &AiSimulation<SandboxWorld>, unit: UnitId) -> Option<BehaviorKind> {
    sim.controller(unit).and_then(|controller| controller.current_kind())
}

fn pursuit_state(sim: &AiSimulation<SandboxWorld>, unit: UnitId) -> Option<PursuitState> {
    match sim.controller(unit)?.current()? {
        Behavior::MoveToTarget(follow) => Some(follow.pursuit().state()),
        _ => None,
    }
}

fn spawn(sim: &mut AiSimulation<SandboxWorld>, spec: UnitSpec, default: Option<Behavior>) -> UnitId {
    let unit = sim.world_mut().spawn(spec);
    sim.add_unit(unit, default);
    unit
}

#[test]
fn test_move_to_position_arrives_and_reverts_once() {
    let mut sim = simulation();
    let unit = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));

    sim.order_move(unit, MoveOrder::to(FixedVec2::from_int(5, 0)));
    assert_eq!(kind(&sim, unit), Some(BehaviorKind::MoveToPosition));

    run(&mut sim, 100);

    assert_eq!(sim.world().position(unit), Some(FixedVec2::from_int(5, 0)));
    assert_eq!(kind(&sim, unit), Some(BehaviorKind::Idle));
    let stats = sim.controller(unit).unwrap().stats();
    // Idle, the move, then a fresh Idle
    assert_eq!(stats.enters, 3);
    assert_eq!(stats.exits, 2);
    assert_eq!(sim.world().path_requests(), 1);
}

#[test]
fn test_precomputed_waypoints_skip_the_scheduler() {
    let mut sim = simulation();
    let unit = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), None);

    let order = MoveOrder::to(FixedVec2::from_int(3, 0)).with_waypoints(vec![FixedVec2::from_int(3, 0)]);
    sim.order_move(unit, order);
    assert_eq!(sim.world().movement_state(unit), MovementState::Moving);
    assert_eq!(sim.scheduler().pending_count(), 0);

    run(&mut sim, 60);
    assert_eq!(sim.world().path_requests(), 0);
    assert_eq!(sim.world().position(unit), Some(FixedVec2::from_int(3, 0)));
    assert!(sim.controller(unit).unwrap().is_inert(), "no default to fall back to");
}

#[test]
fn test_no_path_leaves_unit_idle_and_reverts() {
    let mut sim = simulation();
    let unit = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    sim.world_mut().add_blocked_region(FixedVec2::from_int(20, 0), fx(3.0));

    sim.order_move(unit, MoveOrder::to(FixedVec2::from_int(20, 0)));
    run(&mut sim, 3);

    assert_eq!(kind(&sim, unit), Some(BehaviorKind::Idle));
    assert_eq!(sim.world().position(unit), Some(FixedVec2::ZERO));
    assert_eq!(sim.world().path_requests(), 1, "failed paths are not retried");
}

#[test]
fn test_cancelled_request_is_reissued() {
    let mut sim = simulation();
    let unit = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), None);

    sim.order_move(unit, MoveOrder::to(FixedVec2::from_int(4, 0)));
    assert_eq!(sim.scheduler_mut().cancel(unit), 1);

    // Tick 1 notices the ticket is gone and resubmits, tick 2 solves it
    run(&mut sim, 2);
    assert_eq!(sim.world().path_requests(), 1);
    assert_eq!(sim.world().movement_state(unit), MovementState::Moving);
}

#[test]
fn test_idle_detects_enemy_and_attacks() {
    let mut sim = simulation();
    let interval = sim.config().enemy_scan_interval;
    let me = spawn(
        &mut sim,
        UnitSpec::mobile(FactionId(0), FixedVec2::ZERO),
        Some(Behavior::idle_scanning(fx(10.0), interval)),
    );
    let enemy = sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(6, 0)).with_attack(None));

    // Well inside the first scan interval
    run(&mut sim, 8);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Idle));

    let mut ticks = 0;
    while kind(&sim, me) != Some(BehaviorKind::Attack) {
        run(&mut sim, 1);
        ticks += 1;
        assert!(ticks <= 5, "scan should fire right after the interval");
    }
    let controller = sim.controller(me).unwrap();
    assert_eq!(controller.stack_depth(), 1, "Idle waits underneath");
    assert_eq!(controller.context().target, Some(enemy));
    assert!(sim.scheduler().has_pending(me), "chase path requested on entry");

    // Next tick the path is solved and handed to the mover
    run(&mut sim, 1);
    assert_eq!(sim.world().movement_state(me), MovementState::Moving);
    assert_eq!(sim.world().route(me), &[FixedVec2::from_int(6, 0)]);

    run(&mut sim, 40);
    assert!(sim.world().attacks_started(me) >= 1);
    let facing = sim.world().facing(me).unwrap();
    assert!(facing.x > fx(0.99), "turned towards the enemy");
}

#[test]
fn test_ordered_attack_reverts_when_target_dies() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let enemy = sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(8, 0)));
    let other = sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(0, 3)));

    sim.order_attack(me, enemy);
    run(&mut sim, 5);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Attack));

    sim.world_mut().kill(enemy);
    run(&mut sim, 1);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Idle), "ordered attacks never pick a new target");
    assert!(sim.world().is_alive(other));
}

#[test]
fn test_unordered_attack_retargets_when_target_dies() {
    let mut sim = simulation();
    let interval = sim.config().enemy_scan_interval;
    let me = spawn(
        &mut sim,
        UnitSpec::mobile(FactionId(0), FixedVec2::ZERO).with_attack(Some(AttackSpec { range: fx(1.0), ..AttackSpec::default() })),
        Some(Behavior::idle_scanning(fx(10.0), interval)),
    );
    let first = sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(3, 0)).with_attack(None));
    let second = sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(0, -4)).with_attack(None));

    run(&mut sim, 15);
    let attack_target = |sim: &AiSimulation<SandboxWorld>| match sim.controller(me).unwrap().current() {
        Some(Behavior::Attack(attack)) => Some(attack.target()),
        _ => None,
    };
    assert_eq!(attack_target(&sim), Some(first));

    sim.world_mut().kill(first);
    run(&mut sim, 1);
    assert_eq!(attack_target(&sim), Some(second));
    assert_eq!(sim.controller(me).unwrap().stack_depth(), 1);
}

#[test]
fn test_move_to_target_follows_and_reverts_on_death() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let leader = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(10, 0)));

    sim.command(me, Behavior::move_to_target(leader, fx(2.0)));
    run(&mut sim, 5);
    let before = sim.world().path_requests();

    // Leader jumps well past the repath threshold
    sim.world_mut().set_position(leader, FixedVec2::from_int(10, 10));
    run(&mut sim, 120);

    assert!(sim.world().path_requests() > before);
    let gap = sim.world().position(me).unwrap().distance_squared(FixedVec2::from_int(10, 10));
    assert!(gap <= fx(4.0), "within range of the leader's new spot");
    assert_eq!(sim.world().movement_state(me), MovementState::Idle);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::MoveToTarget));

    sim.world_mut().kill(leader);
    run(&mut sim, 1);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Idle));
}

#[test]
fn test_attack_move_engages_then_resumes_to_destination() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let enemy = sim.world_mut().spawn(
        UnitSpec::mobile(FactionId(1), FixedVec2::from_int(12, 3)).with_health(10).with_attack(None),
    );

    let interval = sim.config().enemy_scan_interval;
    sim.command(me, Behavior::attack_move(MoveOrder::to(FixedVec2::from_int(30, 0)), fx(6.0), interval));

    let mut saw_attack_on_top = false;
    for _ in 0..400 {
        run(&mut sim, 1);
        let controller = sim.controller(me).unwrap();
        if controller.current_kind() == Some(BehaviorKind::Attack) {
            saw_attack_on_top = true;
            assert_eq!(controller.stack_depth(), 1, "AttackMove suspended underneath");
        }
    }

    assert!(saw_attack_on_top);
    assert!(!sim.world().is_alive(enemy));
    assert_eq!(sim.world().attacks_started(me), 1);
    assert_eq!(sim.world().position(me), Some(FixedVec2::from_int(30, 0)));
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Idle));
    assert!(sim.world().path_requests() >= 3, "initial path, chase, and resumed path");
}

#[test]
fn test_ship_docks_one_tick_after_arrival() {
    let mut sim = simulation();
    let ship = spawn(&mut sim, UnitSpec::ship(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    sim.world_mut().add_navigation_link(FixedVec2::from_int(10, 2));

    sim.command(ship, Behavior::board_to_shore(MoveOrder::to(FixedVec2::from_int(10, 0))));

    let mut pending_seen = false;
    for _ in 0..120 {
        run(&mut sim, 1);
        let tick = sim.tick();
        if let Some(Behavior::BoardToShore(board)) = sim.controller(ship).unwrap().current() {
            if let Some(due) = board.pending_dock() {
                pending_seen = true;
                assert_eq!(due, tick + 1);
                assert!(!sim.world().is_docked(ship));
            }
        }
    }

    assert!(pending_seen);
    assert!(sim.world().is_docked(ship));
    assert_eq!(kind(&sim, ship), Some(BehaviorKind::Idle));
}

#[test]
fn test_land_unit_boarding_reverts_on_arrival() {
    let mut sim = simulation();
    let unit = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    sim.world_mut().add_navigation_link(FixedVec2::from_int(4, 1));

    sim.command(unit, Behavior::board_to_shore(MoveOrder::to(FixedVec2::from_int(4, 0))));
    run(&mut sim, 60);

    assert_eq!(kind(&sim, unit), Some(BehaviorKind::Idle));
    assert!(!sim.world().is_docked(unit));
}

#[test]
fn test_idle_without_line_of_sight_never_scans() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(1, 0)));

    run(&mut sim, 50);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Idle));
    assert_eq!(sim.world().path_requests(), 0);
}

#[test]
fn test_move_to_target_retries_on_timer_while_idle() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let leader = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(10, 0)));
    sim.world_mut().add_blocked_region(FixedVec2::from_int(5, 0), fx(2.0));

    sim.command(me, Behavior::move_to_target(leader, fx(2.0)));
    run(&mut sim, 5);
    assert_eq!(sim.world().path_requests(), 1, "no retry before the repath interval");

    // Static target, unit stuck idle: one retry roughly every 0.5 s
    run(&mut sim, 45);
    let requests = sim.world().path_requests();
    assert!((4..=6).contains(&requests), "got {} path requests", requests);
    assert_eq!(sim.world().position(me), Some(FixedVec2::ZERO));
    assert_eq!(kind(&sim, me), Some(BehaviorKind::MoveToTarget));
}

#[test]
fn test_move_to_target_chases_again_when_target_leaves_range() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let leader = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(4, 0)));

    sim.command(me, Behavior::move_to_target(leader, fx(2.0)));
    run(&mut sim, 40);
    assert_eq!(pursuit_state(&sim, me), Some(PursuitState::CloseToTarget));
    assert_eq!(sim.world().movement_state(me), MovementState::Idle);
    let before = sim.world().path_requests();

    sim.world_mut().set_position(leader, FixedVec2::from_int(12, 0));
    run(&mut sim, 2);
    assert_eq!(pursuit_state(&sim, me), Some(PursuitState::MovingTowardsTarget));
    run(&mut sim, 1);
    assert_eq!(sim.world().path_requests(), before + 1);

    run(&mut sim, 80);
    assert_eq!(pursuit_state(&sim, me), Some(PursuitState::CloseToTarget));
    let gap = sim.world().position(me).unwrap().distance_squared(FixedVec2::from_int(12, 0));
    assert!(gap <= fx(4.0));
    assert_eq!(sim.world().movement_state(me), MovementState::Idle);
}

#[test]
fn test_resumed_move_to_position_finishes_its_route() {
    let mut sim = simulation();
    let me = spawn(&mut sim, UnitSpec::mobile(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let friend = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(0, 10)));
    let destination = FixedVec2::from_int(30, 0);

    sim.order_move(me, MoveOrder::to(destination));
    run(&mut sim, 5);
    sim.set_ai(me, Behavior::move_to_target(friend, fx(2.0)), true);
    run(&mut sim, 20);

    sim.world_mut().kill(friend);
    run(&mut sim, 1);
    assert_eq!(kind(&sim, me), Some(BehaviorKind::MoveToPosition), "resumed, not finished");
    assert_eq!(sim.controller(me).unwrap().context().destination, Some(destination));

    run(&mut sim, 300);
    assert_eq!(sim.world().position(me), Some(destination));
    assert_eq!(kind(&sim, me), Some(BehaviorKind::Idle));
}

#[test]
fn test_resumed_boarding_docks_only_at_its_destination() {
    let mut sim = simulation();
    let ship = spawn(&mut sim, UnitSpec::ship(FactionId(0), FixedVec2::ZERO), Some(Behavior::idle()));
    let escort = sim.world_mut().spawn(UnitSpec::mobile(FactionId(0), FixedVec2::from_int(0, 10)));
    sim.world_mut().add_navigation_link(FixedVec2::from_int(30, 2));
    let destination = FixedVec2::from_int(30, 0);

    sim.command(ship, Behavior::board_to_shore(MoveOrder::to(destination)));
    run(&mut sim, 5);
    sim.set_ai(ship, Behavior::move_to_target(escort, fx(2.0)), true);
    run(&mut sim, 20);
    sim.world_mut().kill(escort);

    run(&mut sim, 300);
    assert_eq!(sim.world().position(ship), Some(destination));
    assert!(sim.world().is_docked(ship));
    assert_eq!(kind(&sim, ship), Some(BehaviorKind::Idle));
}

#[test]
fn test_unarmed_units_never_engage() {
    let mut sim = simulation();
    let interval = sim.config().enemy_scan_interval;
    let watcher = spawn(
        &mut sim,
        UnitSpec::mobile(FactionId(0), FixedVec2::ZERO).with_attack(None),
        Some(Behavior::idle_scanning(fx(10.0), interval)),
    );
    let marcher = spawn(
        &mut sim,
        UnitSpec::mobile(FactionId(0), FixedVec2::from_int(0, -6)).with_attack(None),
        Some(Behavior::idle()),
    );
    sim.world_mut().spawn(UnitSpec::mobile(FactionId(1), FixedVec2::from_int(3, 0)));

    sim.command(marcher, Behavior::attack_move(MoveOrder::to(FixedVec2::from_int(20, -6)), fx(10.0), interval));
    for _ in 0..200 {
        run(&mut sim, 1);
        assert_ne!(kind(&sim, watcher), Some(BehaviorKind::Attack));
        assert_ne!(kind(&sim, marcher), Some(BehaviorKind::Attack));
    }

    assert_eq!(sim.controller(watcher).unwrap().stats().enters, 1);
    assert_eq!(sim.world().position(marcher), Some(FixedVec2::from_int(20, -6)));
    assert_eq!(kind(&sim, marcher), Some(BehaviorKind::Idle));
}
