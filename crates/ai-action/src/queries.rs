use std::any::Any;

use ai_core::{downcast_answer, Agent, Query};

use crate::{ActionId, ActionStack};

impl<A: Agent> ActionStack<A> {
    /// Ask the stack whose top is `top`. The first buried-order answer wins.
    pub fn on_query(&self, me: &A, top: ActionId, query: &dyn Any) -> Option<Box<dyn Any>> {
        if !self.get(top)?.started {
            return None;
        }

        let mut cursor = Some(top);
        while let Some(id) = cursor {
            let node = self.get(id)?;
            if let Some(answer) = node
                .subscriptions
                .dispatch_query(node.action.as_ref(), me, query)
            {
                return Some(answer);
            }
            cursor = node.buried_under;
        }

        None
    }

    pub fn query<Q: Query<A>>(&self, me: &A, top: ActionId, query: &Q) -> Option<Q::Answer> {
        self.on_query(me, top, query as &dyn Any)
            .and_then(downcast_answer::<A, Q>)
    }
}
