use crate::{invoke_event, invoke_query, Agent, Event, Query, Responder, TickContext};

/// A subsystem of an agent (intention, locomotion, vision, ...) driven by its [`Controller`].
///
/// Components are also responders, so events and queries broadcast through the controller reach
/// them and whatever they contain.
pub trait Component<A: Agent>: Responder<A> {
    /// Cheap per-tick bookkeeping that runs even when the controller is throttled.
    fn upkeep(&mut self, _me: &mut A, _ctx: &TickContext) {}

    /// `ctx.dt_seconds` is the time since this component last updated.
    fn update(&mut self, me: &mut A, ctx: &TickContext);

    fn reset(&mut self, _me: &mut A) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    pub update_every_ticks: u32,
    pub update_offset_ticks: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            update_every_ticks: 1,
            update_offset_ticks: 0,
        }
    }
}

impl ControllerConfig {
    /// Stagger agents that share an update rate so they do not all think on the same tick.
    pub fn deterministic(agent_id: u64, update_every_ticks: u32) -> Self {
        let every = update_every_ticks.max(1);
        let offset = (agent_id % (every as u64)) as u32;
        Self {
            update_every_ticks: every,
            update_offset_ticks: offset,
        }
    }

    pub fn should_update(&self, tick: u64) -> bool {
        let every = self.update_every_ticks.max(1) as u64;
        ((tick + (self.update_offset_ticks as u64)) % every) == 0
    }
}

/// Owns an agent's components and is the root of its responder tree.
pub struct Controller<A: Agent> {
    pub config: ControllerConfig,
    components: Vec<Box<dyn Component<A>>>,
    last_update_tick: Option<u64>,
}

impl<A: Agent> Default for Controller<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Agent> Controller<A> {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            components: Vec::new(),
            last_update_tick: None,
        }
    }

    /// Components update in registration order.
    pub fn add_component(&mut self, component: Box<dyn Component<A>>) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn upkeep(&mut self, me: &mut A, ctx: &TickContext) {
        for component in self.components.iter_mut() {
            component.upkeep(me, ctx);
        }
    }

    /// Update every component if the controller is due this tick. Returns whether it ran.
    pub fn update(&mut self, me: &mut A, ctx: &TickContext) -> bool {
        if !self.config.should_update(ctx.tick) {
            return false;
        }

        // The very first update assumes one full update period has elapsed so freshly spawned
        // agents do real work immediately.
        let elapsed_ticks = match self.last_update_tick {
            Some(last) if ctx.tick > last => ctx.tick - last,
            Some(_) => return false,
            None => self.config.update_every_ticks.max(1) as u64,
        };
        let interval = ctx.with_dt(ctx.dt_seconds * elapsed_ticks as f32);

        for component in self.components.iter_mut() {
            component.update(me, &interval);
        }

        self.last_update_tick = Some(ctx.tick);
        true
    }

    pub fn reset(&mut self, me: &mut A) {
        self.last_update_tick = None;
        for component in self.components.iter_mut() {
            component.reset(me);
        }
    }

    /// Broadcast an event to every component (and everything they contain).
    pub fn invoke_event(&mut self, me: &mut A, event: &dyn Event) {
        invoke_event(self, me, event);
    }

    pub fn invoke_query<Q: Query<A>>(&self, me: &A, query: &Q) -> Option<Q::Answer> {
        invoke_query(self, me, query)
    }
}

impl<A: Agent> Responder<A> for Controller<A> {
    fn contained_responder(&self, index: usize) -> Option<&dyn Responder<A>> {
        self.components
            .get(index)
            .map(|c| &**c as &dyn Responder<A>)
    }

    fn contained_responder_mut(&mut self, index: usize) -> Option<&mut dyn Responder<A>> {
        self.components
            .get_mut(index)
            .map(|c| &mut **c as &mut dyn Responder<A>)
    }
}
