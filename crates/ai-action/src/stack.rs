use std::collections::HashSet;

use ai_core::Agent;
use ai_tools::Diagnostics;

use crate::{
    Action, ActionError, ActionRef, ActionResult, BehaviorConfig, EventResult, Reason,
    Subscriptions,
};

/// Generational handle to an action owned by an [`ActionStack`].
///
/// Handles to discarded actions never alias a newer action that reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId {
    index: u32,
    generation: u32,
}

/// An action plus the links that place it on a suspension stack and in the containment tree.
pub struct ActionNode<A: Agent> {
    pub(crate) action: Box<dyn Action<A>>,
    pub(crate) subscriptions: Subscriptions<A>,
    pub(crate) name: &'static str,

    pub(crate) buried_under: Option<ActionId>,
    pub(crate) covering: Option<ActionId>,
    pub(crate) parent: Option<ActionId>,
    pub(crate) child: Option<ActionId>,

    pub(crate) started: bool,
    pub(crate) suspended: bool,
    pub(crate) pending: EventResult<A>,
    pub(crate) agent: Option<u64>,
}

impl<A: Agent> ActionNode<A> {
    fn new(action: Box<dyn Action<A>>) -> Self {
        let mut subscriptions = Subscriptions::with_builtin_events();
        action.subscribe(&mut subscriptions);
        let name = action.name();

        Self {
            action,
            subscriptions,
            name,
            buried_under: None,
            covering: None,
            parent: None,
            child: None,
            started: false,
            suspended: false,
            pending: EventResult::none(),
            agent: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn action(&self) -> &dyn Action<A> {
        self.action.as_ref()
    }

    pub fn downcast<T: Action<A>>(&self) -> Option<&T> {
        (*self.action).as_any().downcast_ref::<T>()
    }

    /// The action this one is suspending.
    pub fn buried_under(&self) -> Option<ActionId> {
        self.buried_under
    }

    /// The action suspending this one.
    pub fn covering(&self) -> Option<ActionId> {
        self.covering
    }

    /// The action whose containment slot created this one.
    pub fn parent(&self) -> Option<ActionId> {
        self.parent
    }

    /// Top of this action's containment slot.
    pub fn child(&self) -> Option<ActionId> {
        self.child
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn is_active(&self) -> bool {
        self.started && !self.suspended
    }

    /// The arbitrated, not yet applied, event outcome.
    pub fn pending(&self) -> &EventResult<A> {
        &self.pending
    }

    /// Stable id of the agent this action was started for.
    pub fn agent(&self) -> Option<u64> {
        self.agent
    }
}

struct Slot<A: Agent> {
    generation: u32,
    node: Option<ActionNode<A>>,
}

/// Internal form of [`ActionResult`]: target actions already live in the arena.
pub(crate) enum Transition {
    Continue,
    ChangeTo(ActionId, Reason),
    SuspendFor(ActionId, Reason),
    Done(Reason),
}

/// Arena owning every action of one behavior.
///
/// Links between actions are plain [`ActionId`]s and are only rewritten by the transition and
/// event protocols, which keep `covering`/`buried_under` mutual inverses.
pub struct ActionStack<A: Agent> {
    slots: Vec<Slot<A>>,
    free: Vec<u32>,
    len: usize,

    pub(crate) config: BehaviorConfig,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) depth: usize,
    pub(crate) overflow: Option<ActionError>,
    pub(crate) tick: u64,
    pub(crate) agent: u64,
}

impl<A: Agent> ActionStack<A> {
    pub fn new(config: BehaviorConfig) -> Self {
        Self::with_diagnostics(config, Diagnostics::new(config.debug))
    }

    pub fn with_diagnostics(config: BehaviorConfig, diagnostics: Diagnostics) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            config,
            diagnostics,
            depth: 0,
            overflow: None,
            tick: 0,
            agent: 0,
        }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Number of live actions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionNode<A>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn try_get(&self, id: ActionId) -> Result<&ActionNode<A>, ActionError> {
        self.get(id).ok_or(ActionError::UnknownAction(id))
    }

    /// The concrete action behind `id`, if it is a `T`.
    pub fn action<T: Action<A>>(&self, id: ActionId) -> Option<&T> {
        self.get(id)?.downcast::<T>()
    }

    /// First live action (in slot order) with the given name.
    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.ids().find(|&id| self.get(id).is_some_and(|n| n.name == name))
    }

    /// Handles of every live action, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|_| ActionId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// Check the stack/tree link invariants over every live action.
    pub fn validate(&self) -> Result<(), ActionError> {
        for id in self.ids() {
            let node = self.try_get(id)?;

            if let Some(covering) = node.covering {
                let other = self.get(covering).ok_or(ActionError::BrokenLink {
                    link: "covering",
                    from: id,
                    to: covering,
                })?;
                if other.buried_under != Some(id) {
                    return Err(ActionError::BrokenLink {
                        link: "covering",
                        from: id,
                        to: covering,
                    });
                }
            }

            if let Some(buried) = node.buried_under {
                let other = self.get(buried).ok_or(ActionError::BrokenLink {
                    link: "buried_under",
                    from: id,
                    to: buried,
                })?;
                if other.covering != Some(id) {
                    return Err(ActionError::BrokenLink {
                        link: "buried_under",
                        from: id,
                        to: buried,
                    });
                }
            }

            if let Some(child) = node.child {
                if !self.contains(child) {
                    return Err(ActionError::BrokenLink {
                        link: "child",
                        from: id,
                        to: child,
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, action: Box<dyn Action<A>>) -> ActionId {
        let node = ActionNode::new(action);
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return ActionId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ActionId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    fn remove(&mut self, id: ActionId) {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return;
        };
        if slot.generation != id.generation || slot.node.is_none() {
            return;
        }
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
    }

    /// Discard every action not reachable from `root` through `buried_under` and `child` links.
    pub(crate) fn collect_garbage(&mut self, root: Option<ActionId>) {
        let mut reachable = HashSet::new();
        let mut pending: Vec<ActionId> = root.into_iter().collect();

        while let Some(id) = pending.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if !reachable.insert(id) {
                continue;
            }
            pending.extend(node.buried_under);
            pending.extend(node.child);
        }

        let dead: Vec<ActionId> = self.ids().filter(|id| !reachable.contains(id)).collect();
        for id in dead {
            self.remove(id);
        }

        // Survivors must not point at discarded actions.
        for id in reachable {
            let Some(node) = self.get(id) else {
                continue;
            };
            let covering_dead = node.covering.is_some_and(|c| !self.contains(c));
            let parent_dead = node.parent.is_some_and(|p| !self.contains(p));
            if let Some(node) = self.node_mut(id) {
                if covering_dead {
                    node.covering = None;
                }
                if parent_dead {
                    node.parent = None;
                }
            }
        }
    }

    pub(crate) fn node_mut(&mut self, id: ActionId) -> Option<&mut ActionNode<A>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn action_ref(&self, id: Option<ActionId>) -> Option<ActionRef> {
        let id = id?;
        self.get(id).map(|node| ActionRef {
            id,
            name: node.name,
        })
    }

    pub(crate) fn name_of(&self, id: Option<ActionId>) -> &'static str {
        id.and_then(|id| self.get(id)).map_or("none", |n| n.name)
    }

    /// Move the boxed actions of a callback result into the arena.
    pub(crate) fn admit(&mut self, result: ActionResult<A>) -> Transition {
        match result {
            ActionResult::Continue => Transition::Continue,
            ActionResult::ChangeTo(action, reason) => {
                Transition::ChangeTo(self.insert(action), reason)
            }
            ActionResult::SuspendFor(action, reason) => {
                Transition::SuspendFor(self.insert(action), reason)
            }
            ActionResult::Done(reason) => Transition::Done(reason),
        }
    }
}
