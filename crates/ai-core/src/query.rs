use std::any::Any;

/// A typed, synchronous, single-answer lookup routed through the responder tree.
///
/// `None` is the "unanswered" value: a responder that has no opinion returns `None`, and the
/// first `Some` short-circuits dispatch. `pre_invocation` runs before the tree is walked and
/// `post_invocation` only if nobody in the tree answered.
pub trait Query<A: ?Sized>: Any {
    type Answer: 'static;

    fn pre_invocation(&self, _me: &A) -> Option<Self::Answer> {
        None
    }

    fn post_invocation(&self, _me: &A) -> Option<Self::Answer> {
        None
    }
}

/// Recover a typed answer from the type-erased form responders hand back.
pub fn downcast_answer<A: ?Sized, Q: Query<A>>(answer: Box<dyn Any>) -> Option<Q::Answer> {
    answer.downcast::<Q::Answer>().ok().map(|a| *a)
}
