use ai_core::events::{
    Injured, Killed, LandOnGround, LeaveGround, LostSight, MoveToFailure, MoveToSuccess, Sight,
    Stuck, Unstuck,
};
use ai_core::{short_type_name, Agent, AsAny, TickContext};

use crate::{ActionId, ActionResult, EventResult, Subscriptions};

/// Another action, as seen from inside a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionRef {
    pub id: ActionId,
    pub name: &'static str,
}

/// One unit of behavior.
///
/// An action is inert until the runtime starts it. Every callback has a default that does
/// nothing and returns `Continue`, so a concrete action overrides only what it needs.
///
/// Lifecycle, for one start/end pair:
///
/// * `initial_contained_action` once, to spawn a background child;
/// * `on_start`; if it requests a transition, `update` may never run;
/// * `update` once per tick while the action is the active top of its stack;
/// * `on_suspend` / `on_resume` when another action covers it and later finishes;
/// * `on_end` exactly once, for any reason.
pub trait Action<A: Agent>: AsAny {
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Register handlers for custom events and queries. Called once, when the runtime takes
    /// ownership of the action. Built-in events are already wired to the `on_*` callbacks below;
    /// subscribing to one of them replaces that wiring.
    fn subscribe(&self, _subscriptions: &mut Subscriptions<A>) {}

    fn initial_contained_action(&mut self, _me: &mut A) -> Option<Box<dyn Action<A>>> {
        None
    }

    fn on_start(&mut self, _me: &mut A, _prior: Option<ActionRef>) -> ActionResult<A> {
        ActionResult::Continue
    }

    fn update(&mut self, _me: &mut A, _ctx: &TickContext) -> ActionResult<A> {
        ActionResult::Continue
    }

    fn on_end(&mut self, _me: &mut A, _next: Option<ActionRef>) {}

    /// Returning `Done` opts out of suspension: the action is ended instead of buried.
    /// Any other result is ignored.
    fn on_suspend(&mut self, _me: &mut A, _interrupting: Option<ActionRef>) -> ActionResult<A> {
        ActionResult::Continue
    }

    fn on_resume(&mut self, _me: &mut A, _interrupting: Option<ActionRef>) -> ActionResult<A> {
        ActionResult::Continue
    }

    fn on_killed(&mut self, _me: &mut A, _event: &Killed) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_injured(&mut self, _me: &mut A, _event: &Injured) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_stuck(&mut self, _me: &mut A, _event: &Stuck) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_unstuck(&mut self, _me: &mut A, _event: &Unstuck) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_move_to_success(&mut self, _me: &mut A, _event: &MoveToSuccess) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_move_to_failure(&mut self, _me: &mut A, _event: &MoveToFailure) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_sight(&mut self, _me: &mut A, _event: &Sight) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_lost_sight(&mut self, _me: &mut A, _event: &LostSight) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_leave_ground(&mut self, _me: &mut A, _event: &LeaveGround) -> EventResult<A> {
        EventResult::try_continue()
    }

    fn on_land_on_ground(&mut self, _me: &mut A, _event: &LandOnGround) -> EventResult<A> {
        EventResult::try_continue()
    }
}
