use crate::{Agent, Controller, TickContext};

pub struct RegisteredAgent<A: Agent> {
    pub agent: A,
    pub controller: Controller<A>,
}

/// The set of live agents a driver ticks every scheduler step.
///
/// Owned by the driver and passed around explicitly; there is no process-wide registry.
pub struct Registry<A: Agent> {
    entries: Vec<RegisteredAgent<A>>,
}

impl<A: Agent> Default for Registry<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: Agent> Registry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (and drops the arguments) if an agent with the same stable id is already
    /// registered.
    pub fn register(&mut self, agent: A, controller: Controller<A>) -> bool {
        if self.is_registered(agent.stable_id()) {
            return false;
        }
        self.entries.push(RegisteredAgent { agent, controller });
        true
    }

    pub fn is_registered(&self, agent_id: u64) -> bool {
        self.entries
            .iter()
            .any(|e| e.agent.stable_id() == agent_id)
    }

    pub fn get_mut(&mut self, agent_id: u64) -> Option<&mut RegisteredAgent<A>> {
        self.entries
            .iter_mut()
            .find(|e| e.agent.stable_id() == agent_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAgent<A>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop agents that are no longer valid, then run upkeep and update for every remaining
    /// agent in stable-id order.
    pub fn tick(&mut self, ctx: &TickContext) {
        self.purge_invalid();

        self.entries.sort_by_key(|e| e.agent.stable_id());
        for entry in self.entries.iter_mut() {
            entry.controller.upkeep(&mut entry.agent, ctx);
            entry.controller.update(&mut entry.agent, ctx);
        }
    }

    fn purge_invalid(&mut self) {
        self.entries.retain(|e| {
            let valid = e.agent.is_valid();
            if !valid {
                tracing::info!(agent = e.agent.stable_id(), "purged invalid agent");
            }
            valid
        });
    }
}
