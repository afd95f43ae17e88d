use ai_core::{Agent, Component, Responder, TickContext};

use crate::{Action, ActionError, Behavior, BehaviorConfig};

/// The decision-making component of an agent: a [`Behavior`] that can be rebuilt from its
/// initial action.
pub struct Intention<A: Agent> {
    behavior: Behavior<A>,
    initial: Box<dyn Fn() -> Box<dyn Action<A>>>,
    config: BehaviorConfig,
    last_error: Option<ActionError>,
}

impl<A: Agent> Intention<A> {
    pub fn new(initial: impl Fn() -> Box<dyn Action<A>> + 'static) -> Self {
        Self::with_config(initial, BehaviorConfig::default())
    }

    pub fn with_config(
        initial: impl Fn() -> Box<dyn Action<A>> + 'static,
        config: BehaviorConfig,
    ) -> Self {
        let behavior = Behavior::with_config(initial(), config);
        Self {
            behavior,
            initial: Box::new(initial),
            config,
            last_error: None,
        }
    }

    pub fn behavior(&self) -> &Behavior<A> {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut Behavior<A> {
        &mut self.behavior
    }

    /// The most recent contract violation reported by the behavior, if any.
    pub fn last_error(&self) -> Option<&ActionError> {
        self.last_error.as_ref()
    }
}

impl<A: Agent> Component<A> for Intention<A> {
    fn update(&mut self, me: &mut A, ctx: &TickContext) {
        if let Err(err) = self.behavior.update(me, ctx) {
            tracing::error!(agent = me.stable_id(), tick = ctx.tick, "{err}");
            self.last_error = Some(err);
        }
    }

    /// Stop the current behavior and start over from a fresh initial action. Diagnostics carry
    /// over to the new behavior.
    fn reset(&mut self, me: &mut A) {
        self.behavior.stop(me);
        let diagnostics = std::mem::take(self.behavior.stack_mut().diagnostics_mut());
        self.behavior = Behavior::with_diagnostics((self.initial)(), self.config, diagnostics);
        self.last_error = None;
    }
}

impl<A: Agent> Responder<A> for Intention<A> {
    fn contained_responder(&self, index: usize) -> Option<&dyn Responder<A>> {
        (index == 0).then_some(&self.behavior as &dyn Responder<A>)
    }

    fn contained_responder_mut(&mut self, index: usize) -> Option<&mut dyn Responder<A>> {
        (index == 0).then_some(&mut self.behavior as &mut dyn Responder<A>)
    }
}
