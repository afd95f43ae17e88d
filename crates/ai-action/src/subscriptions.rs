use std::any::{Any, TypeId};
use std::collections::HashMap;

use ai_core::events::{
    Injured, Killed, LandOnGround, LeaveGround, LostSight, MoveToFailure, MoveToSuccess, Sight,
    Stuck, Unstuck,
};
use ai_core::{Agent, Event, Query};

use crate::{Action, EventResult};

type EventHandler<A> = Box<dyn Fn(&mut dyn Action<A>, &mut A, &dyn Event) -> EventResult<A>>;
type QueryHandler<A> = Box<dyn Fn(&dyn Action<A>, &A, &dyn Any) -> Option<Box<dyn Any>>>;

/// Per-action handler tables, keyed by the concrete event/query type. At most one handler per
/// type; subscribing again replaces the previous handler.
pub struct Subscriptions<A: Agent> {
    events: HashMap<TypeId, EventHandler<A>>,
    queries: HashMap<TypeId, QueryHandler<A>>,
}

impl<A: Agent> Subscriptions<A> {
    /// Empty tables with the built-in events routed to the matching `Action::on_*` callbacks.
    pub fn with_builtin_events() -> Self {
        let mut subscriptions = Self {
            events: HashMap::new(),
            queries: HashMap::new(),
        };

        subscriptions.wire::<Killed>(|action, me, event| action.on_killed(me, event));
        subscriptions.wire::<Injured>(|action, me, event| action.on_injured(me, event));
        subscriptions.wire::<Stuck>(|action, me, event| action.on_stuck(me, event));
        subscriptions.wire::<Unstuck>(|action, me, event| action.on_unstuck(me, event));
        subscriptions
            .wire::<MoveToSuccess>(|action, me, event| action.on_move_to_success(me, event));
        subscriptions
            .wire::<MoveToFailure>(|action, me, event| action.on_move_to_failure(me, event));
        subscriptions.wire::<Sight>(|action, me, event| action.on_sight(me, event));
        subscriptions.wire::<LostSight>(|action, me, event| action.on_lost_sight(me, event));
        subscriptions.wire::<LeaveGround>(|action, me, event| action.on_leave_ground(me, event));
        subscriptions
            .wire::<LandOnGround>(|action, me, event| action.on_land_on_ground(me, event));

        subscriptions
    }

    fn wire<E: Event>(&mut self, callback: fn(&mut dyn Action<A>, &mut A, &E) -> EventResult<A>) {
        self.events.insert(
            TypeId::of::<E>(),
            Box::new(
                move |action: &mut dyn Action<A>, me: &mut A, event: &dyn Event| {
                    match event.as_any().downcast_ref::<E>() {
                        Some(event) => callback(action, me, event),
                        None => EventResult::none(),
                    }
                },
            ),
        );
    }

    /// Route events of type `E` to `handler`, called on the concrete action `S`.
    pub fn on_event<S, E>(&mut self, handler: fn(&mut S, &mut A, &E) -> EventResult<A>)
    where
        S: Action<A>,
        E: Event,
    {
        self.events.insert(
            TypeId::of::<E>(),
            Box::new(
                move |action: &mut dyn Action<A>, me: &mut A, event: &dyn Event| {
                    let action = action.as_any_mut().downcast_mut::<S>();
                    let event = event.as_any().downcast_ref::<E>();
                    match (action, event) {
                        (Some(action), Some(event)) => handler(action, me, event),
                        _ => EventResult::none(),
                    }
                },
            ),
        );
    }

    /// Answer queries of type `Q` with `handler`, called on the concrete action `S`.
    pub fn on_query<S, Q>(&mut self, handler: fn(&S, &A, &Q) -> Option<Q::Answer>)
    where
        S: Action<A>,
        Q: Query<A>,
    {
        self.queries.insert(
            TypeId::of::<Q>(),
            Box::new(move |action: &dyn Action<A>, me: &A, query: &dyn Any| {
                let action = action.as_any().downcast_ref::<S>()?;
                let query = query.downcast_ref::<Q>()?;
                handler(action, me, query).map(|answer| Box::new(answer) as Box<dyn Any>)
            }),
        );
    }

    pub fn handles_event<E: Event>(&self) -> bool {
        self.events.contains_key(&TypeId::of::<E>())
    }

    pub fn handles_query<Q: Any>(&self) -> bool {
        self.queries.contains_key(&TypeId::of::<Q>())
    }

    pub(crate) fn dispatch_event(
        &self,
        action: &mut dyn Action<A>,
        me: &mut A,
        event: &dyn Event,
    ) -> EventResult<A> {
        match self.events.get(&event.as_any().type_id()) {
            Some(handler) => handler(action, me, event),
            None => EventResult::try_continue(),
        }
    }

    pub(crate) fn dispatch_query(
        &self,
        action: &dyn Action<A>,
        me: &A,
        query: &dyn Any,
    ) -> Option<Box<dyn Any>> {
        let handler = self.queries.get(&query.type_id())?;
        handler(action, me, query)
    }
}
