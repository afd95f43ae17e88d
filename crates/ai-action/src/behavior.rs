use std::any::Any;

use ai_core::{downcast_answer, Agent, Event, Query, Responder, TickContext};
use ai_tools::{DebugFlags, Diagnostics};

use crate::{Action, ActionError, ActionId, ActionStack, BehaviorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorStatus {
    Running,
    /// The root slot ran out of actions.
    Complete,
}

/// Drives one agent's action stack: owns the root action, updates it once per tick, routes
/// events and queries into it and tears it down on stop.
pub struct Behavior<A: Agent> {
    stack: ActionStack<A>,
    root: Option<ActionId>,
}

impl<A: Agent> Behavior<A> {
    pub fn new(initial: Box<dyn Action<A>>) -> Self {
        Self::with_config(initial, BehaviorConfig::default())
    }

    pub fn with_config(initial: Box<dyn Action<A>>, config: BehaviorConfig) -> Self {
        Self::from_stack(initial, ActionStack::new(config))
    }

    /// `diagnostics` keeps its own flags; `config.debug` is not applied on top.
    pub fn with_diagnostics(
        initial: Box<dyn Action<A>>,
        config: BehaviorConfig,
        diagnostics: Diagnostics,
    ) -> Self {
        Self::from_stack(initial, ActionStack::with_diagnostics(config, diagnostics))
    }

    fn from_stack(initial: Box<dyn Action<A>>, mut stack: ActionStack<A>) -> Self {
        let root = stack.insert(initial);
        Self {
            stack,
            root: Some(root),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The action currently on top of the root slot.
    pub fn root(&self) -> Option<ActionId> {
        self.root
    }

    pub fn stack(&self) -> &ActionStack<A> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut ActionStack<A> {
        &mut self.stack
    }

    /// Run one tick: the root starts on its first update, then every update honors pending
    /// event results, updates the contained child chain and finally the root itself.
    ///
    /// An `Err` reports a contract violation (runaway chained transitions); the stack is left
    /// settled on the action where the chain was cut and keeps running.
    pub fn update(
        &mut self,
        me: &mut A,
        ctx: &TickContext,
    ) -> Result<BehaviorStatus, ActionError> {
        let Some(root) = self.root else {
            return Ok(BehaviorStatus::Complete);
        };
        if !me.is_valid() {
            return Ok(BehaviorStatus::Running);
        }

        self.stack.tick = ctx.tick;
        self.stack.agent = me.stable_id();

        let transition = self.stack.invoke_update(me, root, ctx);
        self.root = self.stack.apply_transition(me, root, transition);
        self.stack.collect_garbage(self.root);

        if self.root.is_some() && self.stack.diagnostics.is_debugging(DebugFlags::BEHAVIOR) {
            for line in self.debug_lines() {
                self.stack.msg(DebugFlags::BEHAVIOR, |_| line);
            }
        }

        if let Some(err) = self.stack.overflow.take() {
            return Err(err);
        }

        Ok(match self.root {
            Some(_) => BehaviorStatus::Running,
            None => BehaviorStatus::Complete,
        })
    }

    /// Deliver an externally raised event to the root slot and then down the active contained
    /// child chain. Results are only recorded here; they are applied on the next update.
    ///
    /// Every contained child slot sees the event, not only the root slot, so a child can react
    /// even when nothing above it handles the event.
    pub fn on_event(&mut self, me: &mut A, event: &dyn Event) {
        self.stack.agent = me.stable_id();

        let mut slot = self.root;
        while let Some(top) = slot {
            self.stack.on_event(me, top, event);
            slot = self.stack.get(top).and_then(|n| n.child);
        }
    }

    /// Ask the action stacks (root slot first, then contained children) without the query's
    /// pre/post hooks. Use [`ai_core::invoke_query`] for a full responder-tree query.
    pub fn query<Q: Query<A>>(&self, me: &A, query: &Q) -> Option<Q::Answer> {
        self.query_slots(me, query as &dyn Any)
            .and_then(downcast_answer::<A, Q>)
    }

    fn query_slots(&self, me: &A, query: &dyn Any) -> Option<Box<dyn Any>> {
        let mut slot = self.root;
        while let Some(top) = slot {
            if let Some(answer) = self.stack.on_query(me, top, query) {
                return Some(answer);
            }
            slot = self.stack.get(top).and_then(|n| n.child);
        }
        None
    }

    /// End every action of the root slot, bottom first, and discard them.
    pub fn stop(&mut self, me: &mut A) {
        if let Some(root) = self.root.take() {
            let mut bottom = root;
            while let Some(buried) = self.stack.get(bottom).and_then(|n| n.buried_under) {
                bottom = buried;
            }
            self.stack.agent = me.stable_id();
            self.stack.invoke_on_end(me, bottom, None);
        }
        self.stack.collect_garbage(None);
    }

    /// `Actions:` followed by one line per containment level, each listing the top action and
    /// what it buries: `- Chase ( << Patrol << Idle )`.
    pub fn debug_lines(&self) -> Vec<String> {
        let mut lines = vec!["Actions:".to_string()];

        let mut slot = self.root;
        while let Some(top) = slot {
            let Some(node) = self.stack.get(top) else {
                break;
            };

            let mut line = format!("- {}", node.name());
            if node.buried_under().is_some() {
                line.push_str(" (");
                let mut buried = node.buried_under();
                while let Some(id) = buried {
                    line.push_str(" << ");
                    line.push_str(self.stack.name_of(Some(id)));
                    buried = self.stack.get(id).and_then(|n| n.buried_under());
                }
                line.push_str(" )");
            }
            lines.push(line);

            slot = node.child();
        }

        lines
    }
}

impl<A: Agent> Responder<A> for Behavior<A> {
    fn on_event(&mut self, me: &mut A, event: &dyn Event) {
        Behavior::on_event(self, me, event);
    }

    fn on_query(&self, me: &A, query: &dyn Any) -> Option<Box<dyn Any>> {
        self.query_slots(me, query)
    }
}
