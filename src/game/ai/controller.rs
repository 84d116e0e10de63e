use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::fixed_math::FixedNum;

use super::behaviors::{Behavior, BehaviorKind, Transition, UnitBehavior};
use super::context::{AIContext, TickContext};
use super::world::{UnitId, UnitWorld};

/// Lifetime counters for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStats {
    pub enters: u64,
    pub exits: u64,
    /// Stack pops that resumed a suspended behavior without re-entering it.
    pub resumes: u64,
}

/// Persisted controller state. Behaviors are plain data, so this captures
/// exactly where every state machine was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub ai: AIContext,
    pub stack: Vec<Behavior>,
    pub current: Option<Behavior>,
    pub default: Option<Behavior>,
    pub stats: ControllerStats,
}

/// Suspended behaviors. Orders rarely nest more than a couple deep.
type BehaviorStack = SmallVec<[Behavior; 4]>;

/// Stack-based behavior driver for one unit.
///
/// # Stack Discipline
///
/// - Exactly one behavior is current, or none (the unit is inert).
/// - Pushing suspends the current behavior with its state intact. Reverting
///   resumes it *without* calling `enter` again.
/// - When the stack runs out, a fresh clone of the default behavior is
///   installed and entered. Without a default the unit goes inert.
pub struct UnitAIController {
    ai: AIContext,
    stack: BehaviorStack,
    current: Option<Behavior>,
    default: Option<Behavior>,
    stats: ControllerStats,
}

impl UnitAIController {
    pub fn new(unit: UnitId) -> Self {
        Self {
            ai: AIContext::new(unit),
            stack: BehaviorStack::new(),
            current: None,
            default: None,
            stats: ControllerStats::default(),
        }
    }

    pub fn with_default(unit: UnitId, default: Behavior) -> Self {
        let mut controller = Self::new(unit);
        controller.default = Some(default);
        controller
    }

    pub fn unit(&self) -> UnitId {
        self.ai.unit
    }

    pub fn context(&self) -> &AIContext {
        &self.ai
    }

    pub fn current(&self) -> Option<&Behavior> {
        self.current.as_ref()
    }

    pub fn current_kind(&self) -> Option<BehaviorKind> {
        self.current.as_ref().map(Behavior::kind)
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_inert(&self) -> bool {
        self.current.is_none()
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn default_behavior(&self) -> Option<&Behavior> {
        self.default.as_ref()
    }

    /// Replace the default template. Does not touch the running behavior.
    pub fn set_default(&mut self, default: Option<Behavior>) {
        self.default = default;
    }

    /// Cache the unit's combat capability and enter the default behavior if
    /// nothing is running yet.
    pub fn start<W: UnitWorld>(&mut self, tick: &mut TickContext<'_, W>) {
        self.ai.refresh_combat(&*tick.world);
        if self.current.is_none() {
            self.install_default(tick);
        }
    }

    /// Make `behavior` current.
    ///
    /// With `push_previous` the outgoing behavior is kept on the stack and
    /// resumes when `behavior` reverts; otherwise it is discarded. Either
    /// way it is exited first.
    pub fn set_ai<W: UnitWorld>(&mut self, behavior: Behavior, push_previous: bool, tick: &mut TickContext<'_, W>) {
        if let Some(mut previous) = self.current.take() {
            previous.exit(&mut self.ai, tick);
            self.stats.exits += 1;
            if push_previous {
                self.stack.push(previous);
            }
        }
        self.install(behavior, tick);
    }

    /// Exit the current behavior and resume the one beneath it.
    ///
    /// Falls back to the default when the stack is empty. Safe to call with
    /// nothing to revert.
    pub fn revert_to_previous_ai<W: UnitWorld>(&mut self, tick: &mut TickContext<'_, W>) {
        if let Some(mut outgoing) = self.current.take() {
            outgoing.exit(&mut self.ai, tick);
            self.stats.exits += 1;
        }

        match self.stack.pop() {
            Some(resumed) => {
                debug!("[AI] {:?} resumes {:?}", self.ai.unit, resumed.kind());
                self.current = Some(resumed);
                self.stats.resumes += 1;
            }
            None => self.install_default(tick),
        }
    }

    /// Run a fresh order: drop every suspended behavior and make `behavior`
    /// current, so that finishing it lands back on the default.
    pub fn command<W: UnitWorld>(&mut self, behavior: Behavior, tick: &mut TickContext<'_, W>) {
        self.stack.clear();
        self.set_ai(behavior, false, tick);
    }

    /// Drop every suspended behavior and restart from the default.
    pub fn clear_ai<W: UnitWorld>(&mut self, tick: &mut TickContext<'_, W>) {
        self.shutdown(tick);
        self.install_default(tick);
    }

    /// Exit the current behavior and drop the stack without falling back to
    /// the default. The controller is inert afterwards.
    pub fn shutdown<W: UnitWorld>(&mut self, tick: &mut TickContext<'_, W>) {
        self.stack.clear();
        if let Some(mut outgoing) = self.current.take() {
            outgoing.exit(&mut self.ai, tick);
            self.stats.exits += 1;
        }
    }

    /// Run the current behavior for one tick.
    ///
    /// Dead units and units locked in an action are skipped.
    pub fn update<W: UnitWorld>(&mut self, dt: FixedNum, tick: &mut TickContext<'_, W>) {
        let unit = self.ai.unit;
        if !tick.world.is_alive(unit) || tick.world.is_playing_action(unit) {
            return;
        }
        let Some(current) = self.current.as_mut() else {
            return;
        };

        let transition = current.update(&mut self.ai, tick, dt);
        self.apply(transition, tick);
    }

    pub fn apply<W: UnitWorld>(&mut self, transition: Transition, tick: &mut TickContext<'_, W>) {
        match transition {
            Transition::None => {}
            Transition::Revert => self.revert_to_previous_ai(tick),
            Transition::Push(behavior) => self.set_ai(behavior, true, tick),
            Transition::Replace(behavior) => self.set_ai(behavior, false, tick),
            Transition::Clear => self.clear_ai(tick),
        }
    }

    pub fn save(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            ai: self.ai.clone(),
            stack: self.stack.to_vec(),
            current: self.current.clone(),
            default: self.default.clone(),
            stats: self.stats,
        }
    }

    pub fn load(snapshot: ControllerSnapshot) -> Self {
        Self {
            ai: snapshot.ai,
            stack: BehaviorStack::from_vec(snapshot.stack),
            current: snapshot.current,
            default: snapshot.default,
            stats: snapshot.stats,
        }
    }

    /// Re-sync cached world data after [`load`](Self::load).
    ///
    /// Only live units are refreshed, so a reload against the matching world
    /// reproduces the saved state exactly. Targets are left as saved; every
    /// use re-checks liveness. Pending path tickets are kept: a behavior
    /// whose request did not survive the reload sees it as lost and re-issues it.
    pub fn post_load<W: UnitWorld>(&mut self, tick: &mut TickContext<'_, W>) {
        if tick.world.is_alive(self.ai.unit) {
            self.ai.refresh_combat(&*tick.world);
        }
    }

    fn install<W: UnitWorld>(&mut self, mut behavior: Behavior, tick: &mut TickContext<'_, W>) {
        behavior.enter(&mut self.ai, tick);
        self.stats.enters += 1;
        self.current = Some(behavior);
    }

    fn install_default<W: UnitWorld>(&mut self, tick: &mut TickContext<'_, W>) {
        match self.default.clone() {
            Some(default) => self.install(default, tick),
            None => debug!("[AI] {:?} has nothing to run, going inert", self.ai.unit),
        }
    }
}
