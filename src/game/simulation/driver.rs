use std::collections::BTreeMap;

use bevy::prelude::*;
use rustc_hash::FxHashSet;
use tidewater_macros::profile;

use crate::game::ai::behaviors::{Behavior, MoveOrder};
use crate::game::ai::context::TickContext;
use crate::game::ai::controller::UnitAIController;
use crate::game::ai::world::{UnitId, UnitWorld};
use crate::game::config::SimAiConfig;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::formation::{CrowdAllocator, FormationMember, FormationOrder, FormationPlanner};
use crate::game::pathfinding::{NavHost, NavScheduler, PathMailbox, PathfindingScheduler};
use crate::game::snapshot::{AiSnapshot, SNAPSHOT_VERSION};

/// The AI layer of one match: path scheduler, mailbox, every unit's
/// controller, and the host world they act on.
///
/// # Tick Order
///
/// [`on_tick`](Self::on_tick) first drains the path scheduler, then updates
/// every controller in ascending [`UnitId`] order. Nothing else mutates AI
/// state during a tick, so all lockstep participants stay in step.
#[derive(Resource)]
pub struct AiSimulation<W: UnitWorld> {
    nav: NavHost<W>,
    scheduler: NavScheduler<W>,
    controllers: BTreeMap<UnitId, UnitAIController>,
    crowds: CrowdAllocator,
    planner: FormationPlanner,
    config: SimAiConfig,
    tick: u64,
}

impl<W: UnitWorld> AiSimulation<W> {
    pub fn new(world: W, config: SimAiConfig) -> Self {
        Self {
            nav: NavHost::new(world),
            scheduler: PathfindingScheduler::new(config.path_requests_per_tick),
            controllers: BTreeMap::new(),
            crowds: CrowdAllocator::default(),
            planner: FormationPlanner::from_config(&config),
            config,
            tick: 0,
        }
    }

    pub fn world(&self) -> &W {
        &self.nav.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.nav.world
    }

    pub fn config(&self) -> &SimAiConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &NavScheduler<W> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut NavScheduler<W> {
        &mut self.scheduler
    }

    pub fn mailbox(&self) -> &PathMailbox {
        &self.nav.mailbox
    }

    pub fn planner(&self) -> &FormationPlanner {
        &self.planner
    }

    /// Last tick passed to [`on_tick`](Self::on_tick).
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn controller(&self, unit: UnitId) -> Option<&UnitAIController> {
        self.controllers.get(&unit)
    }

    pub fn controllers(&self) -> impl Iterator<Item = &UnitAIController> {
        self.controllers.values()
    }

    /// Attach a controller to `unit` and enter its default behavior.
    pub fn add_unit(&mut self, unit: UnitId, default: Option<Behavior>) {
        let mut controller = match default {
            Some(default) => UnitAIController::with_default(unit, default),
            None => UnitAIController::new(unit),
        };
        let (mut tick, controllers) = self.split();
        controller.start(&mut tick);
        if controllers.insert(unit, controller).is_some() {
            warn!("[AI] Replaced existing controller of {:?}", unit);
        }
    }

    /// Detach `unit`, exiting its behavior and dropping its queued paths.
    pub fn remove_unit(&mut self, unit: UnitId) -> bool {
        let (mut tick, controllers) = self.split();
        let Some(mut controller) = controllers.remove(&unit) else {
            return false;
        };
        controller.shutdown(&mut tick);
        tick.scheduler.cancel(unit);
        tick.mailbox.discard(unit);
        true
    }

    pub fn set_ai(&mut self, unit: UnitId, behavior: Behavior, push_previous: bool) -> bool {
        self.with_controller(unit, |controller, tick| controller.set_ai(behavior, push_previous, tick))
            .is_some()
    }

    pub fn revert_to_previous_ai(&mut self, unit: UnitId) -> bool {
        self.with_controller(unit, |controller, tick| controller.revert_to_previous_ai(tick))
            .is_some()
    }

    pub fn clear_ai(&mut self, unit: UnitId) -> bool {
        self.with_controller(unit, |controller, tick| controller.clear_ai(tick))
            .is_some()
    }

    /// Replace whatever `unit` is doing with `behavior`.
    pub fn command(&mut self, unit: UnitId, behavior: Behavior) -> bool {
        self.with_controller(unit, |controller, tick| controller.command(behavior, tick))
            .is_some()
    }

    pub fn order_move(&mut self, unit: UnitId, order: MoveOrder) -> bool {
        self.command(unit, Behavior::move_to(order))
    }

    pub fn order_attack(&mut self, unit: UnitId, target: UnitId) -> bool {
        self.command(unit, Behavior::attack(target))
    }

    /// Move a group to `destination` in formation.
    ///
    /// Dead units and units without a controller are left out.
    pub fn issue_formation_move(&mut self, units: &[UnitId], destination: FixedVec2) -> Vec<FormationOrder> {
        let orders = self.plan_formation(units, destination);
        for order in &orders {
            self.command(order.unit, Behavior::move_to(order.to_move_order(destination)));
        }
        orders
    }

    /// Like [`issue_formation_move`](Self::issue_formation_move), engaging
    /// enemies seen within `line_of_sight` on the way.
    pub fn issue_formation_attack_move(
        &mut self,
        units: &[UnitId],
        destination: FixedVec2,
        line_of_sight: FixedNum,
    ) -> Vec<FormationOrder> {
        let orders = self.plan_formation(units, destination);
        let interval = self.config.enemy_scan_interval;
        for order in &orders {
            let behavior = Behavior::attack_move(order.to_move_order(destination), line_of_sight, interval);
            self.command(order.unit, behavior);
        }
        orders
    }

    /// Advance the AI layer by one tick.
    #[profile(2)]
    pub fn on_tick(&mut self, dt: FixedNum, tick_id: u64) {
        self.tick = tick_id;
        self.scheduler.on_tick(&mut self.nav, dt, tick_id);

        let (mut tick, controllers) = self.split();
        for controller in controllers.values_mut() {
            controller.update(dt, &mut tick);
        }
    }

    pub fn save(&self) -> AiSnapshot {
        AiSnapshot {
            version: SNAPSHOT_VERSION,
            tick: self.tick,
            scheduler: self.scheduler.save(),
            controllers: self.controllers.values().map(UnitAIController::save).collect(),
            mailbox: self.nav.mailbox.clone(),
            crowds: self.crowds,
        }
    }

    /// Restore AI state saved with [`save`](Self::save). The world must
    /// already be in the matching state.
    pub fn load(&mut self, snapshot: AiSnapshot) {
        self.tick = snapshot.tick;
        self.scheduler.load(&snapshot.scheduler);
        self.nav.mailbox = snapshot.mailbox;
        self.crowds = snapshot.crowds;
        self.controllers = snapshot
            .controllers
            .into_iter()
            .map(|saved| {
                let controller = UnitAIController::load(saved);
                (controller.unit(), controller)
            })
            .collect();

        let (mut tick, controllers) = self.split();
        for controller in controllers.values_mut() {
            controller.post_load(&mut tick);
        }
        info!("[AI] Loaded {} controllers at tick {}", self.controllers.len(), self.tick);
    }

    fn plan_formation(&mut self, units: &[UnitId], destination: FixedVec2) -> Vec<FormationOrder> {
        let mut seen = FxHashSet::default();
        let members: Vec<FormationMember> = units
            .iter()
            .filter(|&&unit| seen.insert(unit))
            .filter_map(|&unit| {
                let controller = self.controllers.get(&unit)?;
                let position = self.nav.world.position(unit)?;
                Some(FormationMember { unit, position, anchor: controller.context().anchor() })
            })
            .collect();
        self.planner.plan(&members, destination, &mut self.crowds)
    }

    fn with_controller<R>(
        &mut self,
        unit: UnitId,
        f: impl FnOnce(&mut UnitAIController, &mut TickContext<'_, W>) -> R,
    ) -> Option<R> {
        let (mut tick, controllers) = self.split();
        let controller = controllers.get_mut(&unit)?;
        Some(f(controller, &mut tick))
    }

    fn split(&mut self) -> (TickContext<'_, W>, &mut BTreeMap<UnitId, UnitAIController>) {
        let tick = TickContext {
            world: &mut self.nav.world,
            mailbox: &mut self.nav.mailbox,
            scheduler: &mut self.scheduler,
            config: &self.config,
            tick_id: self.tick,
        };
        (tick, &mut self.controllers)
    }
}
