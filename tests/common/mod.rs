#![allow(dead_code)]

use tidewater::game::ai::behaviors::BehaviorKind;
use tidewater::game::ai::world::{FactionId, UnitId, UnitWorld};
use tidewater::game::fixed_math::{FixedNum, FixedVec2};
use tidewater::game::sandbox::{run_tick, SandboxWorld, UnitSpec};
use tidewater::game::{AiSimulation, Behavior, SimAiConfig};

pub fn fx(value: f32) -> FixedNum {
    FixedNum::from_num(value)
}

pub fn empty_simulation() -> AiSimulation<SandboxWorld> {
    let world = SandboxWorld::new(fx(200.0), fx(200.0), fx(10.0));
    AiSimulation::new(world, SimAiConfig::default())
}

/// Run `ticks` ticks continuing from the simulation's last tick.
pub fn run(sim: &mut AiSimulation<SandboxWorld>, ticks: u64) {
    let start = sim.tick() + 1;
    for tick in start..start + ticks {
        run_tick(sim, tick);
    }
}

pub fn kind(sim: &AiSimulation<SandboxWorld>, unit: UnitId) -> Option<BehaviorKind> {
    sim.controller(unit).and_then(|controller| controller.current_kind())
}

/// Two seeded squads marching at each other in formation.
pub fn battle(seed: u64, squad_size: usize) -> (AiSimulation<SandboxWorld>, Vec<UnitId>, Vec<UnitId>) {
    let mut sim = empty_simulation();
    let mut rng = fastrand::Rng::with_seed(seed);
    let line_of_sight = fx(12.0);
    let interval = sim.config().enemy_scan_interval;

    let mut squad = |sim: &mut AiSimulation<SandboxWorld>, faction: FactionId, center: FixedVec2| -> Vec<UnitId> {
        (0..squad_size)
            .map(|_| {
                let jitter = FixedVec2::from_int(rng.i32(-4..=4), rng.i32(-4..=4));
                let unit = sim.world_mut().spawn(UnitSpec::mobile(faction, center + jitter));
                sim.add_unit(unit, Some(Behavior::idle_scanning(line_of_sight, interval)));
                unit
            })
            .collect()
    };

    let west = FixedVec2::from_int(-40, 0);
    let east = FixedVec2::from_int(40, 0);
    let blue = squad(&mut sim, FactionId(0), west);
    let red = squad(&mut sim, FactionId(1), east);

    sim.issue_formation_attack_move(&blue, east, line_of_sight);
    sim.issue_formation_attack_move(&red, west, line_of_sight);
    (sim, blue, red)
}

/// Per-unit world state, for comparing two runs.
pub fn world_state(sim: &AiSimulation<SandboxWorld>) -> Vec<(UnitId, Option<FixedVec2>, Option<i32>)> {
    let world = sim.world();
    world
        .unit_ids()
        .map(|unit| (unit, world.position(unit), world.health(unit)))
        .collect()
}
