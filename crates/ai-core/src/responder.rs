use std::any::Any;

use crate::query::downcast_answer;
use crate::{Agent, Event, Query};

/// A node of the responder tree: anything that can receive events and answer queries on behalf
/// of an agent, and that may contain further responders.
///
/// Contained responders are enumerated by index: `contained_responder(0)` is the first one and
/// `contained_responder(i + 1)` the one after `contained_responder(i)`; `None` ends the list.
pub trait Responder<A: Agent> {
    fn on_event(&mut self, _me: &mut A, _event: &dyn Event) {}

    /// Type-erased query entry point. `query` is the concrete query value; a `Some` answer must
    /// box the query's `Answer` type.
    fn on_query(&self, _me: &A, _query: &dyn Any) -> Option<Box<dyn Any>> {
        None
    }

    fn contained_responder(&self, _index: usize) -> Option<&dyn Responder<A>> {
        None
    }

    fn contained_responder_mut(&mut self, _index: usize) -> Option<&mut dyn Responder<A>> {
        None
    }
}

/// Deliver `event` to `root` and then, depth-first, to every responder it contains.
pub fn invoke_event<A: Agent>(root: &mut dyn Responder<A>, me: &mut A, event: &dyn Event) {
    root.on_event(me, event);

    let mut index = 0;
    while let Some(sub) = root.contained_responder_mut(index) {
        invoke_event(sub, me, event);
        index += 1;
    }
}

/// Ask `query` of the whole tree rooted at `root`.
///
/// Order: the query's pre-invocation hook, then a depth-first walk of the tree, then the
/// post-invocation hook. The first answer wins.
pub fn invoke_query<A, Q>(root: &dyn Responder<A>, me: &A, query: &Q) -> Option<Q::Answer>
where
    A: Agent,
    Q: Query<A>,
{
    if let Some(answer) = query.pre_invocation(me) {
        return Some(answer);
    }

    if let Some(answer) = query_tree(root, me, query as &dyn Any) {
        if let Some(answer) = downcast_answer::<A, Q>(answer) {
            return Some(answer);
        }
    }

    query.post_invocation(me)
}

fn query_tree<A: Agent>(
    responder: &dyn Responder<A>,
    me: &A,
    query: &dyn Any,
) -> Option<Box<dyn Any>> {
    if let Some(answer) = responder.on_query(me, query) {
        return Some(answer);
    }

    let mut index = 0;
    while let Some(sub) = responder.contained_responder(index) {
        if let Some(answer) = query_tree(sub, me, query) {
            return Some(answer);
        }
        index += 1;
    }

    None
}
