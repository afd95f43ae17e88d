#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ai_action::{
    Action, ActionRef, ActionResult, Behavior, BehaviorConfig, BehaviorStatus, EventResult,
};
use ai_core::events::{Injured, Killed, MoveToFailure, Sight, Stuck};
use ai_core::{Agent, TickContext};
use ai_tools::{TraceEvent, TraceSink};

#[derive(Debug, Default)]
pub struct Bot {
    pub id: u64,
    pub alive: bool,
    pub log: Vec<String>,
}

impl Bot {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            alive: true,
            log: Vec::new(),
        }
    }

    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

impl Agent for Bot {
    fn stable_id(&self) -> u64 {
        self.id
    }

    fn is_valid(&self) -> bool {
        self.alive
    }
}

/// Route engine logs to the test harness output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1)
}

/// Overflow is reported through `Behavior::update` instead of panicking.
pub fn lenient() -> BehaviorConfig {
    BehaviorConfig {
        panic_on_depth_exceeded: false,
        ..BehaviorConfig::default()
    }
}

pub fn step(behavior: &mut Behavior<Bot>, bot: &mut Bot, tick: u64) -> BehaviorStatus {
    behavior.update(bot, &ctx(tick)).expect("behavior update")
}

/// Name of the action on top of the root slot.
pub fn top(behavior: &Behavior<Bot>) -> Option<&'static str> {
    let root = behavior.root()?;
    behavior.stack().get(root).map(|n| n.name())
}

fn label(action: Option<ActionRef>) -> &'static str {
    action.map_or("none", |a| a.name)
}

/// Action driven by a script of canned results. Every callback is recorded in the bot's log as
/// `Name:callback(other)`.
pub struct Scripted {
    name: &'static str,
    start: Option<ActionResult<Bot>>,
    updates: VecDeque<ActionResult<Bot>>,
    resume: Option<ActionResult<Bot>>,
    child: Option<Box<dyn Action<Bot>>>,
    opt_out_of_suspend: bool,
    reactions: Vec<(&'static str, EventResult<Bot>)>,
}

impl Scripted {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: None,
            updates: VecDeque::new(),
            resume: None,
            child: None,
            opt_out_of_suspend: false,
            reactions: Vec::new(),
        }
    }

    pub fn starting_with(mut self, result: ActionResult<Bot>) -> Self {
        self.start = Some(result);
        self
    }

    /// Queue the result of the next update that has no result yet. Later updates continue.
    pub fn then(mut self, result: ActionResult<Bot>) -> Self {
        self.updates.push_back(result);
        self
    }

    pub fn resuming_with(mut self, result: ActionResult<Bot>) -> Self {
        self.resume = Some(result);
        self
    }

    pub fn containing(mut self, child: Scripted) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    pub fn opting_out_of_suspend(mut self) -> Self {
        self.opt_out_of_suspend = true;
        self
    }

    /// Respond once to the named built-in event.
    pub fn reacting(mut self, event: &'static str, result: EventResult<Bot>) -> Self {
        self.reactions.push((event, result));
        self
    }

    pub fn boxed(self) -> Box<dyn Action<Bot>> {
        Box::new(self)
    }

    fn react(&mut self, me: &mut Bot, event: &'static str) -> EventResult<Bot> {
        me.log.push(format!("{}:event:{event}", self.name));
        match self.reactions.iter().position(|(name, _)| *name == event) {
            Some(index) => self.reactions.remove(index).1,
            None => EventResult::try_continue(),
        }
    }
}

impl Action<Bot> for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initial_contained_action(&mut self, _me: &mut Bot) -> Option<Box<dyn Action<Bot>>> {
        self.child.take()
    }

    fn on_start(&mut self, me: &mut Bot, prior: Option<ActionRef>) -> ActionResult<Bot> {
        me.log.push(format!("{}:start({})", self.name, label(prior)));
        self.start.take().unwrap_or(ActionResult::Continue)
    }

    fn update(&mut self, me: &mut Bot, _ctx: &TickContext) -> ActionResult<Bot> {
        me.log.push(format!("{}:update", self.name));
        self.updates.pop_front().unwrap_or(ActionResult::Continue)
    }

    fn on_end(&mut self, me: &mut Bot, next: Option<ActionRef>) {
        me.log.push(format!("{}:end({})", self.name, label(next)));
    }

    fn on_suspend(&mut self, me: &mut Bot, interrupting: Option<ActionRef>) -> ActionResult<Bot> {
        me.log
            .push(format!("{}:suspend({})", self.name, label(interrupting)));
        if self.opt_out_of_suspend {
            ActionResult::done("Not worth resuming")
        } else {
            ActionResult::Continue
        }
    }

    fn on_resume(&mut self, me: &mut Bot, interrupting: Option<ActionRef>) -> ActionResult<Bot> {
        me.log
            .push(format!("{}:resume({})", self.name, label(interrupting)));
        self.resume.take().unwrap_or(ActionResult::Continue)
    }

    fn on_killed(&mut self, me: &mut Bot, _event: &Killed) -> EventResult<Bot> {
        self.react(me, "Killed")
    }

    fn on_injured(&mut self, me: &mut Bot, _event: &Injured) -> EventResult<Bot> {
        self.react(me, "Injured")
    }

    fn on_stuck(&mut self, me: &mut Bot, _event: &Stuck) -> EventResult<Bot> {
        self.react(me, "Stuck")
    }

    fn on_move_to_failure(&mut self, me: &mut Bot, _event: &MoveToFailure) -> EventResult<Bot> {
        self.react(me, "MoveToFailure")
    }

    fn on_sight(&mut self, me: &mut Bot, _event: &Sight) -> EventResult<Bot> {
        self.react(me, "Sight")
    }
}

/// Trace sink the test keeps a handle to after handing it to `Diagnostics`.
#[derive(Clone, Default)]
pub struct RcSink(pub Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}
