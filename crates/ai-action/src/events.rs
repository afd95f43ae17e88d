use std::mem;

use ai_core::{Agent, Event};
use ai_tools::DebugFlags;

use crate::stack::{ActionNode, Transition};
use crate::{ActionId, ActionStack, EventResult, Priority};

impl<A: Agent> ActionStack<A> {
    /// Offer `event` to the stack whose top is `top`, walking down through buried actions.
    ///
    /// The first action whose handler responds with anything other than `Continue` wins; its
    /// result is arbitrated into that action's own pending slot and deeper actions are not
    /// consulted.
    pub fn on_event(&mut self, me: &mut A, top: ActionId, event: &dyn Event) {
        if !self.get(top).is_some_and(|n| n.started) {
            return;
        }

        let mut cursor = Some(top);
        while let Some(id) = cursor {
            self.msg(DebugFlags::EVENTS, |s| {
                format!(
                    "{} has received event {}",
                    s.name_of(Some(id)),
                    event.name()
                )
            });

            let Some(ActionNode {
                action,
                subscriptions,
                ..
            }) = self.node_mut(id)
            else {
                return;
            };
            let result = subscriptions.dispatch_event(action.as_mut(), me, event);

            if !result.is_continue() {
                self.msg(DebugFlags::EVENTS, |s| {
                    format!(
                        "{} responded to event {} with {} ({})",
                        s.name_of(Some(id)),
                        event.name(),
                        result.kind(),
                        result.reason
                    )
                });
                self.store_pending_event_result(id, result, event.name());
                return;
            }

            cursor = self.get(id).and_then(|n| n.buried_under);
        }
    }

    /// Record `result` in `id`'s pending slot if it is at least as important as what is
    /// already there. Overwriting a `Critical` result is reported as a collision.
    pub fn store_pending_event_result(
        &mut self,
        id: ActionId,
        result: EventResult<A>,
        event_name: &str,
    ) {
        if result.is_continue() {
            return;
        }

        let Some(node) = self.node_mut(id) else {
            return;
        };
        if result.priority < node.pending.priority {
            return;
        }

        let collision = node.pending.priority == Priority::Critical;
        node.pending = result;

        if collision && self.diagnostics.is_debugging(DebugFlags::EVENTS) {
            let message = format!(
                "{} {event_name} - critical events collision!",
                self.name_of(Some(id))
            );
            self.diagnostics
                .msg_warning(DebugFlags::EVENTS, self.tick, self.agent, message);
        }
    }

    /// Take the deferred event transition to honor before `id` updates, if any.
    ///
    /// `id`'s own pending change wins. Otherwise the first buried action with a pending
    /// `SuspendFor` gets it applied in place, pushing a new action on top of the stack.
    pub(crate) fn process_pending_events(&mut self, id: ActionId) -> Transition {
        if let Some(node) = self.node_mut(id) {
            if node.pending.is_requesting_change() {
                // Cleared in case this is a suspend and we later resume.
                let result = mem::replace(&mut node.pending, EventResult::none());
                return self.admit(result.into_action_result());
            }
        }

        let mut under = self.get(id).and_then(|n| n.buried_under);
        while let Some(current) = under {
            let Some(node) = self.node_mut(current) else {
                break;
            };
            if node.pending.is_suspend_for() {
                let result = mem::replace(&mut node.pending, EventResult::none());
                return self.admit(result.into_action_result());
            }
            under = node.buried_under;
        }

        Transition::Continue
    }

    /// Has something `id` buried asked to change or finish? Then `id` is about to lose its
    /// foundation and should finish itself instead of updating.
    pub fn is_out_of_scope(&self, id: ActionId) -> bool {
        let mut under = self.get(id).and_then(|n| n.buried_under);
        while let Some(current) = under {
            let Some(node) = self.get(current) else {
                break;
            };
            if node.pending.is_change_to() || node.pending.is_done() {
                return true;
            }
            under = node.buried_under;
        }
        false
    }
}
