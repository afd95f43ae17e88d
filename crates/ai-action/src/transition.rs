use ai_core::{Agent, TickContext};
use ai_tools::DebugFlags;

use crate::stack::Transition;
use crate::{ActionError, ActionId, ActionResult, ActionStack, Reason};

impl<A: Agent> ActionStack<A> {
    /// Apply the result action `id` just produced and return the action now at the top of
    /// `id`'s slot, or `None` when the slot has run out of actions.
    pub fn apply_result(
        &mut self,
        me: &mut A,
        id: ActionId,
        result: ActionResult<A>,
    ) -> Option<ActionId> {
        let transition = self.admit(result);
        self.apply_transition(me, id, transition)
    }

    pub(crate) fn apply_transition(
        &mut self,
        me: &mut A,
        mut id: ActionId,
        mut transition: Transition,
    ) -> Option<ActionId> {
        let entry_depth = self.depth;

        let settled = loop {
            // Counted before any callback runs, so a contained child started from inside this
            // step sees the raised depth.
            if !matches!(transition, Transition::Continue) {
                self.depth += 1;
                if self.depth > self.config.max_transition_depth {
                    let target = match &transition {
                        Transition::ChangeTo(next, _) | Transition::SuspendFor(next, _) => *next,
                        _ => id,
                    };
                    self.report_overflow(target);
                    // An action that never started is left for garbage collection.
                    break self.get(id).filter(|n| n.started).map(|_| id);
                }
            }

            let (next, next_transition) = match transition {
                Transition::Continue => break Some(id),

                Transition::ChangeTo(next, reason) => {
                    self.invoke_on_end(me, id, Some(next));

                    let (buried, parent) = match self.get(id) {
                        Some(node) => (node.buried_under, node.parent),
                        None => (None, None),
                    };
                    let started = self.invoke_on_start(me, next, Some(id), buried, parent);

                    if next == id {
                        self.msg(DebugFlags::BEHAVIOR, |s| {
                            format!("Started: {} ({reason})", s.name_of(Some(next)))
                        });
                    } else {
                        self.msg(DebugFlags::BEHAVIOR, |s| {
                            format!(
                                "Changed: {} -> {} ({reason})",
                                s.name_of(Some(id)),
                                s.name_of(Some(next))
                            )
                        });
                    }
                    (next, started)
                }

                Transition::SuspendFor(next, reason) => {
                    // The interrupting action always goes on the top of the stack.
                    let mut top = id;
                    while let Some(covering) = self.get(top).and_then(|n| n.covering) {
                        top = covering;
                    }

                    let top = self.invoke_on_suspend(me, top, next);
                    let started = self.invoke_on_start(me, next, top, top, None);

                    self.msg(DebugFlags::BEHAVIOR, |s| {
                        format!(
                            "Suspended: {} for {} ({reason})",
                            s.name_of(Some(id)),
                            s.name_of(Some(next))
                        )
                    });
                    (next, started)
                }

                Transition::Done(reason) => {
                    let resumed = self.get(id).and_then(|n| n.buried_under);
                    self.invoke_on_end(me, id, resumed);

                    let Some(resumed) = resumed else {
                        self.msg(DebugFlags::BEHAVIOR, |s| {
                            format!("Finished: {} ({reason})", s.name_of(Some(id)))
                        });
                        break None;
                    };

                    // `id` is gone even if the resume below is refused.
                    if let Some(node) = self.node_mut(resumed) {
                        node.covering = None;
                    }
                    let result = self.invoke_on_resume(me, resumed, Some(id));

                    self.msg(DebugFlags::BEHAVIOR, |s| {
                        format!(
                            "Resumed: {} (interrupted by {}) ({reason})",
                            s.name_of(Some(resumed)),
                            s.name_of(Some(id))
                        )
                    });
                    (resumed, result)
                }
            };

            id = next;
            transition = next_transition;
        };

        self.depth = entry_depth;
        settled
    }

    /// Bind `id` to the agent, splice it into its slot and start its contained child.
    pub(crate) fn invoke_on_start(
        &mut self,
        me: &mut A,
        id: ActionId,
        prior: Option<ActionId>,
        buried_under: Option<ActionId>,
        parent: Option<ActionId>,
    ) -> Transition {
        let agent = me.stable_id();
        let Some(node) = self.node_mut(id) else {
            return Transition::Continue;
        };

        // Flags and links must be valid before any callback runs, in case a child suspends.
        node.started = true;
        node.suspended = false;
        node.agent = Some(agent);
        node.parent = parent;
        node.buried_under = buried_under;
        // Always the top of the stack: whatever covered `prior` was ended with it.
        node.covering = None;
        node.child = None;

        if let Some(node) = parent.and_then(|p| self.node_mut(p)) {
            node.child = Some(id);
        }
        if let Some(node) = buried_under.and_then(|b| self.node_mut(b)) {
            node.covering = Some(id);
        }

        let contained = match self.node_mut(id) {
            Some(node) => node.action.initial_contained_action(me),
            None => None,
        };
        if let Some(contained) = contained {
            let child = self.insert(contained);
            if let Some(node) = self.node_mut(child) {
                node.parent = Some(id);
            }
            let top = self.apply_transition(
                me,
                child,
                Transition::ChangeTo(child, Reason::Borrowed("Starting child Action")),
            );
            if let Some(node) = self.node_mut(id) {
                node.child = top;
            }
        }

        let prior = if prior == Some(id) {
            None
        } else {
            self.action_ref(prior)
        };
        let result = match self.node_mut(id) {
            Some(node) => node.action.on_start(me, prior),
            None => ActionResult::Continue,
        };
        self.admit(result)
    }

    /// One tick of `id`: out-of-scope guard, deferred event results, contained child, then the
    /// action itself.
    pub(crate) fn invoke_update(
        &mut self,
        me: &mut A,
        id: ActionId,
        ctx: &TickContext,
    ) -> Transition {
        if self.is_out_of_scope(id) {
            return Transition::Done(Reason::Borrowed("Out of scope"));
        }

        let Some(node) = self.get(id) else {
            return Transition::Continue;
        };
        if !node.started {
            return Transition::ChangeTo(id, Reason::Borrowed("Starting Action"));
        }

        let pending = self.process_pending_events(id);
        if !matches!(pending, Transition::Continue) {
            return pending;
        }

        // The contained child has the most specific behavior, so it updates first.
        if let Some(child) = self.get(id).and_then(|n| n.child) {
            let result = self.invoke_update(me, child, ctx);
            let top = self.apply_transition(me, child, result);
            if let Some(node) = self.node_mut(id) {
                node.child = top;
            }
        }

        let result = match self.node_mut(id) {
            Some(node) => node.action.update(me, ctx),
            None => ActionResult::Continue,
        };
        self.admit(result)
    }

    /// End `id`, its contained children and everything stacked on top of it. No-op if `id` is
    /// not started.
    pub(crate) fn invoke_on_end(&mut self, me: &mut A, id: ActionId, next: Option<ActionId>) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if !node.started {
            return;
        }
        node.started = false;

        // End the child chain without disturbing its links.
        let mut child = node.child;
        while let Some(current) = child {
            child = self.get(current).and_then(|n| n.buried_under);
            self.invoke_on_end(me, current, next);
        }

        let next_ref = self.action_ref(next);
        if let Some(node) = self.node_mut(id) {
            node.action.on_end(me, next_ref);
        }

        if let Some(covering) = self.get(id).and_then(|n| n.covering) {
            self.invoke_on_end(me, covering, next);
        }
    }

    /// Suspend `id` (children first) for `interrupting`. Returns the action that ends up on
    /// top: `id` itself, or whatever it buried if it opted out by returning `Done`.
    pub(crate) fn invoke_on_suspend(
        &mut self,
        me: &mut A,
        id: ActionId,
        interrupting: ActionId,
    ) -> Option<ActionId> {
        if let Some(child) = self.get(id).and_then(|n| n.child) {
            let top = self.invoke_on_suspend(me, child, interrupting);
            if let Some(node) = self.node_mut(id) {
                node.child = top;
            }
        }

        let interrupting = self.action_ref(Some(interrupting));
        let Some(node) = self.node_mut(id) else {
            return None;
        };
        node.suspended = true;
        let result = node.action.on_suspend(me, interrupting);

        if result.is_done() {
            // Replaced instead of suspended.
            node.suspended = false;
            let buried = node.buried_under;
            self.invoke_on_end(me, id, None);
            self.msg(DebugFlags::BEHAVIOR, |s| {
                format!("Ended instead of suspended: {}", s.name_of(Some(id)))
            });
            return buried;
        }

        Some(id)
    }

    /// Make `id` active again after whatever covered it finished.
    pub(crate) fn invoke_on_resume(
        &mut self,
        me: &mut A,
        id: ActionId,
        interrupting: Option<ActionId>,
    ) -> Transition {
        let Some(node) = self.node_mut(id) else {
            return Transition::Continue;
        };
        if !node.suspended {
            return Transition::Continue;
        }
        // A change requested by an earlier event is about to abandon this action anyway.
        if node.pending.is_requesting_change() {
            return Transition::Continue;
        }

        node.suspended = false;
        node.covering = None;
        let (parent, child) = (node.parent, node.child);

        if let Some(node) = parent.and_then(|p| self.node_mut(p)) {
            node.child = Some(id);
        }

        if let Some(child) = child {
            let result = self.invoke_on_resume(me, child, interrupting);
            let top = self.apply_transition(me, child, result);
            if let Some(node) = self.node_mut(id) {
                node.child = top;
            }
        }

        let interrupting = self.action_ref(interrupting);
        let result = match self.node_mut(id) {
            Some(node) => node.action.on_resume(me, interrupting),
            None => ActionResult::Continue,
        };
        self.admit(result)
    }

    fn report_overflow(&mut self, id: ActionId) {
        let err = ActionError::TransitionDepthExceeded {
            action: self.name_of(Some(id)),
            limit: self.config.max_transition_depth,
        };
        tracing::error!(agent = self.agent, tick = self.tick, "{err}");
        self.diagnostics
            .msg_error(DebugFlags::BEHAVIOR, self.tick, self.agent, err.to_string());

        if self.config.panic_on_depth_exceeded {
            panic!("{err}");
        }
        self.overflow.get_or_insert(err);
    }

    pub(crate) fn msg(&mut self, flag: DebugFlags, message: impl FnOnce(&Self) -> String) {
        if !self.diagnostics.is_debugging(flag) {
            return;
        }
        let message = message(self);
        self.diagnostics.msg(flag, self.tick, self.agent, message);
    }
}
