//! In-memory [`UnitWorld`] used by the demo binary and the test suite.
//!
//! Deliberately simple: straight-line paths that fail when they cross a
//! blocked circle, constant-speed movement, instant-hit attacks with
//! cooldowns and action locks, and ships that can dock at registered shore
//! links. Everything iterates in `UnitId` order so two sandboxes fed the
//! same commands stay identical.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::game::ai::world::{CrowdId, FactionId, MovementState, PathFollow, UnitId, UnitKind, UnitWorld};
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::simulation::{AiSet, AiSimulation};
use crate::game::spatial_hash::SpatialHash;


/// Ships see navigation links whose endpoint is at most this far away.
pub const LINK_REACH: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackSpec {
    pub range: FixedNum,
    pub damage: i32,
    /// Ticks between attack starts.
    pub cooldown_ticks: u32,
    /// Ticks the attacker is locked in the swing.
    pub action_ticks: u32,
}

impl Default for AttackSpec {
    fn default() -> Self {
        Self {
            range: FixedNum::from_num(2),
            damage: 10,
            cooldown_ticks: 10,
            action_ticks: 2,
        }
    }
}

/// Blueprint for [`SandboxWorld::spawn`].
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSpec {
    pub faction: FactionId,
    pub kind: UnitKind,
    pub position: FixedVec2,
    /// Units per second.
    pub speed: FixedNum,
    pub health: i32,
    pub attack: Option<AttackSpec>,
}

impl UnitSpec {
    pub fn mobile(faction: FactionId, position: FixedVec2) -> Self {
        Self {
            faction,
            kind: UnitKind::Mobile,
            position,
            speed: FixedNum::from_num(5),
            health: 100,
            attack: Some(AttackSpec::default()),
        }
    }

    pub fn ship(faction: FactionId, position: FixedVec2) -> Self {
        Self { kind: UnitKind::Ship, attack: None, ..Self::mobile(faction, position) }
    }

    pub fn structure(faction: FactionId, position: FixedVec2) -> Self {
        Self {
            kind: UnitKind::Structure,
            speed: FixedNum::ZERO,
            attack: None,
            ..Self::mobile(faction, position)
        }
    }

    pub fn with_speed(mut self, speed: FixedNum) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_attack(mut self, attack: Option<AttackSpec>) -> Self {
        self.attack = attack;
        self
    }
}

#[derive(Clone, Debug)]
struct SandboxUnit {
    spec: UnitSpec,
    position: FixedVec2,
    alive: bool,
    health: i32,
    route: Vec<FixedVec2>,
    route_index: usize,
    crowd: Option<CrowdId>,
    facing: FixedVec2,
    cooldown_left: u32,
    action_left: u32,
    docked: bool,
    attacks_started: u32,
}

impl SandboxUnit {
    fn is_moving(&self) -> bool {
        self.route_index < self.route.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BlockedRegion {
    center: FixedVec2,
    radius: FixedNum,
}

/// Reference collaborator world. See the module docs.
#[derive(Clone, Debug)]
pub struct SandboxWorld {
    units: BTreeMap<UnitId, SandboxUnit>,
    hash: SpatialHash,
    blocked: Vec<BlockedRegion>,
    links: Vec<FixedVec2>,
    next_id: u32,
    path_requests: u64,
}

impl SandboxWorld {
    pub fn new(width: FixedNum, height: FixedNum, cell_size: FixedNum) -> Self {
        Self {
            units: BTreeMap::new(),
            hash: SpatialHash::new(width, height, cell_size),
            blocked: Vec::new(),
            links: Vec::new(),
            next_id: 1,
            path_requests: 0,
        }
    }

    pub fn spawn(&mut self, spec: UnitSpec) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;

        if !self.hash.insert(id, spec.position) {
            warn!("[SANDBOX] {:?} spawned off the map at ({:.2}, {:.2})",
                id, spec.position.x.to_num::<f32>(), spec.position.y.to_num::<f32>());
        }
        self.units.insert(id, SandboxUnit {
            position: spec.position,
            alive: true,
            health: spec.health,
            route: Vec::new(),
            route_index: 0,
            crowd: None,
            facing: FixedVec2::new(FixedNum::ONE, FixedNum::ZERO),
            cooldown_left: 0,
            action_left: 0,
            docked: false,
            attacks_started: 0,
            spec,
        });
        id
    }

    pub fn kill(&mut self, unit: UnitId) {
        if let Some(state) = self.units.get_mut(&unit) {
            if state.alive {
                state.alive = false;
                state.route.clear();
                state.route_index = 0;
                self.hash.remove(unit, state.position);
            }
        }
    }

    /// Teleport, keeping the spatial index in sync.
    pub fn set_position(&mut self, unit: UnitId, position: FixedVec2) {
        if let Some(state) = self.units.get_mut(&unit) {
            if state.alive {
                self.hash.update(unit, state.position, position);
            }
            state.position = position;
        }
    }

    /// Circle no path may cross or end in.
    pub fn add_blocked_region(&mut self, center: FixedVec2, radius: FixedNum) {
        self.blocked.push(BlockedRegion { center, radius });
    }

    /// Register a shore connection ships can dock through.
    pub fn add_navigation_link(&mut self, endpoint: FixedVec2) {
        self.links.push(endpoint);
    }

    /// Advance movement, cooldowns and action locks by one tick.
    pub fn step(&mut self, dt: FixedNum) {
        let mut moved = Vec::new();

        for (&id, state) in self.units.iter_mut() {
            if !state.alive {
                continue;
            }
            state.cooldown_left = state.cooldown_left.saturating_sub(1);
            state.action_left = state.action_left.saturating_sub(1);

            let mut budget = state.spec.speed * dt;
            let start = state.position;
            while budget > FixedNum::ZERO && state.is_moving() {
                let waypoint = state.route[state.route_index];
                let remaining = state.position.distance(waypoint);
                if remaining <= budget {
                    state.position = waypoint;
                    state.route_index += 1;
                    budget -= remaining;
                } else {
                    state.position = state.position.move_towards(waypoint, budget);
                    budget = FixedNum::ZERO;
                }
            }
            if !state.is_moving() && !state.route.is_empty() {
                state.route.clear();
                state.route_index = 0;
                state.crowd = None;
            }
            if state.position != start {
                moved.push((id, start, state.position));
            }
        }

        for (id, from, to) in moved {
            self.hash.update(id, from, to);
        }
    }

    pub fn attacks_started(&self, unit: UnitId) -> u32 {
        self.units.get(&unit).map_or(0, |state| state.attacks_started)
    }

    pub fn health(&self, unit: UnitId) -> Option<i32> {
        self.units.get(&unit).map(|state| state.health)
    }

    pub fn facing(&self, unit: UnitId) -> Option<FixedVec2> {
        self.units.get(&unit).map(|state| state.facing)
    }

    /// Remaining route of a moving unit, formation offset applied.
    pub fn route(&self, unit: UnitId) -> &[FixedVec2] {
        self.units
            .get(&unit)
            .map(|state| &state.route[state.route_index.min(state.route.len())..])
            .unwrap_or(&[])
    }

    pub fn crowd(&self, unit: UnitId) -> Option<CrowdId> {
        self.units.get(&unit).and_then(|state| state.crowd)
    }

    /// Number of times the path solver has run.
    pub fn path_requests(&self) -> u64 {
        self.path_requests
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.keys().copied()
    }

    pub fn alive_count(&self, faction: FactionId) -> usize {
        self.units.values().filter(|state| state.alive && state.spec.faction == faction).count()
    }

    fn is_blocked(&self, point: FixedVec2) -> bool {
        self.blocked.iter().any(|region| point.distance_squared(region.center) < region.radius * region.radius)
    }

    fn segment_blocked(&self, from: FixedVec2, to: FixedVec2) -> bool {
        let segment = to - from;
        let length_sq = segment.length_squared();
        self.blocked.iter().any(|region| {
            let closest = if length_sq == FixedNum::ZERO {
                from
            } else {
                let t = ((region.center - from).dot(segment) / length_sq).clamp(FixedNum::ZERO, FixedNum::ONE);
                from + segment * t
            };
            closest.distance_squared(region.center) < region.radius * region.radius
        })
    }

    fn alive(&self, unit: UnitId) -> Option<&SandboxUnit> {
        self.units.get(&unit).filter(|state| state.alive)
    }
}

/// Steps the sandbox world after every AI tick.
pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, step_sandbox.in_set(AiSet::World));
    }
}

pub fn step_sandbox(simulation: Option<ResMut<AiSimulation<SandboxWorld>>>) {
    if let Some(mut simulation) = simulation {
        let dt = simulation.config().tick_delta;
        simulation.world_mut().step(dt);
    }
}

/// One full tick outside Bevy: AI first, then the world.
pub fn run_tick(simulation: &mut AiSimulation<SandboxWorld>, tick_id: u64) {
    let dt = simulation.config().tick_delta;
    simulation.on_tick(dt, tick_id);
    simulation.world_mut().step(dt);
}

impl UnitWorld for SandboxWorld {
    fn is_alive(&self, unit: UnitId) -> bool {
        self.alive(unit).is_some()
    }

    fn position(&self, unit: UnitId) -> Option<FixedVec2> {
        self.alive(unit).map(|state| state.position)
    }

    fn faction(&self, unit: UnitId) -> Option<FactionId> {
        self.alive(unit).map(|state| state.spec.faction)
    }

    fn kind(&self, unit: UnitId) -> Option<UnitKind> {
        self.alive(unit).map(|state| state.spec.kind)
    }

    fn query_in_radius(&self, center: FixedVec2, radius: FixedNum, out: &mut Vec<UnitId>) {
        self.hash.query_radius(center, radius, None, out);
    }

    fn request_path(&mut self, start: FixedVec2, goal: FixedVec2, _crowd: Option<CrowdId>) -> Option<Vec<FixedVec2>> {
        self.path_requests += 1;
        if !self.hash.contains(goal) || self.is_blocked(goal) || self.segment_blocked(start, goal) {
            return None;
        }
        Some(vec![goal])
    }

    fn follow_path(&mut self, unit: UnitId, path: PathFollow) {
        if let Some(state) = self.units.get_mut(&unit).filter(|state| state.alive) {
            state.route = path.waypoints.iter().map(|&waypoint| waypoint + path.offset).collect();
            state.route_index = 0;
            state.crowd = path.crowd;
            state.docked = false;
        }
    }

    fn stop(&mut self, unit: UnitId) {
        if let Some(state) = self.units.get_mut(&unit) {
            state.route.clear();
            state.route_index = 0;
            state.crowd = None;
        }
    }

    fn movement_state(&self, unit: UnitId) -> MovementState {
        match self.alive(unit) {
            Some(state) if state.is_moving() => MovementState::Moving,
            _ => MovementState::Idle,
        }
    }

    fn is_playing_action(&self, unit: UnitId) -> bool {
        self.alive(unit).is_some_and(|state| state.action_left > 0)
    }

    fn attack_ready(&self, unit: UnitId) -> bool {
        self.alive(unit).is_some_and(|state| state.spec.attack.is_some() && state.cooldown_left == 0)
    }

    fn attack_range(&self, unit: UnitId) -> Option<FixedNum> {
        self.alive(unit).and_then(|state| state.spec.attack).map(|attack| attack.range)
    }

    fn face_towards(&mut self, unit: UnitId, point: FixedVec2) {
        if let Some(state) = self.units.get_mut(&unit) {
            let direction = (point - state.position).normalize();
            if direction != FixedVec2::ZERO {
                state.facing = direction;
            }
        }
    }

    fn start_attack(&mut self, unit: UnitId, target: UnitId) -> bool {
        let (Some(attacker), Some(victim)) = (self.alive(unit), self.alive(target)) else {
            return false;
        };
        let Some(attack) = attacker.spec.attack else {
            return false;
        };
        if attacker.cooldown_left > 0
            || attacker.action_left > 0
            || attacker.position.distance_squared(victim.position) > attack.range * attack.range
        {
            return false;
        }

        if let Some(state) = self.units.get_mut(&unit) {
            state.cooldown_left = attack.cooldown_ticks;
            state.action_left = attack.action_ticks;
            state.attacks_started += 1;
        }
        let killed = match self.units.get_mut(&target) {
            Some(state) => {
                state.health -= attack.damage;
                state.health <= 0
            }
            None => false,
        };
        if killed {
            debug!("[SANDBOX] {:?} killed {:?}", unit, target);
            self.kill(target);
        }
        true
    }

    fn is_docked(&self, unit: UnitId) -> bool {
        self.alive(unit).is_some_and(|state| state.docked)
    }

    fn set_docked(&mut self, unit: UnitId, docked: bool) {
        if let Some(state) = self.units.get_mut(&unit) {
            state.docked = docked;
        }
    }

    fn navigation_links(&self, unit: UnitId) -> Vec<FixedVec2> {
        let Some(position) = self.position(unit) else {
            return Vec::new();
        };
        let reach = FixedNum::from_num(LINK_REACH);
        let mut links: Vec<FixedVec2> = self
            .links
            .iter()
            .copied()
            .filter(|link| link.distance_squared(position) <= reach * reach)
            .collect();
        links.sort_by_key(|link| (link.distance_squared(position), *link));
        links
    }

    fn sample_navigable(&self, point: FixedVec2, max_distance: FixedNum) -> Option<FixedVec2> {
        let navigable = |candidate: FixedVec2| self.hash.contains(candidate) && !self.is_blocked(candidate);
        if navigable(point) {
            return Some(point);
        }
        let axes = [
            FixedVec2::new(max_distance, FixedNum::ZERO),
            FixedVec2::new(-max_distance, FixedNum::ZERO),
            FixedVec2::new(FixedNum::ZERO, max_distance),
            FixedVec2::new(FixedNum::ZERO, -max_distance),
        ];
        axes.into_iter().map(|axis| point + axis).find(|&candidate| navigable(candidate))
    }
}
