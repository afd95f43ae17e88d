use std::borrow::Cow;
use std::fmt;

use ai_core::Agent;

use crate::Action;

/// Human-readable explanation attached to a transition, used only for diagnostics.
pub type Reason = Cow<'static, str>;

/// Outcome of a lifecycle callback. Consumed by the transition engine.
pub enum ActionResult<A: Agent> {
    /// Keep doing what we're doing.
    Continue,
    /// End this action (and its contained children) and start `action` in its place.
    ChangeTo(Box<dyn Action<A>>, Reason),
    /// Push `action` on top of the stack; this action resumes when it is done.
    SuspendFor(Box<dyn Action<A>>, Reason),
    /// End this action and resume whatever it was covering.
    Done(Reason),
}

impl<A: Agent> ActionResult<A> {
    pub fn change_to(action: impl Action<A>, reason: impl Into<Reason>) -> Self {
        Self::ChangeTo(Box::new(action), reason.into())
    }

    pub fn suspend_for(action: impl Action<A>, reason: impl Into<Reason>) -> Self {
        Self::SuspendFor(Box::new(action), reason.into())
    }

    pub fn done(reason: impl Into<Reason>) -> Self {
        Self::Done(reason.into())
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn is_suspend_for(&self) -> bool {
        matches!(self, Self::SuspendFor(..))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl<A: Agent> fmt::Debug for ActionResult<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str("Continue"),
            Self::ChangeTo(action, reason) => write!(f, "ChangeTo({}, {reason:?})", action.name()),
            Self::SuspendFor(action, reason) => {
                write!(f, "SuspendFor({}, {reason:?})", action.name())
            }
            Self::Done(reason) => write!(f, "Done({reason:?})"),
        }
    }
}

/// How hard an event response insists on being honored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// No result.
    #[default]
    None,
    /// Use this result or toss it out, either is ok.
    Try,
    /// Try extra hard to use this result.
    Important,
    /// This result must be used; a collision with another critical result is reported.
    Critical,
}

pub enum EventResponse<A: Agent> {
    Continue,
    ChangeTo(Box<dyn Action<A>>),
    SuspendFor(Box<dyn Action<A>>),
    Done,
    /// Block lower-priority responses without causing a transition.
    Sustain,
}

/// Outcome of an event handler: a desired transition plus the priority it is asked with.
pub struct EventResult<A: Agent> {
    pub response: EventResponse<A>,
    pub priority: Priority,
    pub reason: Reason,
}

impl<A: Agent> EventResult<A> {
    /// "Did not respond": the value every pending slot is reset to.
    pub fn none() -> Self {
        Self::try_continue_with(Priority::None)
    }

    pub fn try_continue() -> Self {
        Self::try_continue_with(Priority::Try)
    }

    pub fn try_continue_with(priority: Priority) -> Self {
        Self {
            response: EventResponse::Continue,
            priority,
            reason: Reason::Borrowed(""),
        }
    }

    pub fn try_change_to(
        action: impl Action<A>,
        priority: Priority,
        reason: impl Into<Reason>,
    ) -> Self {
        Self {
            response: EventResponse::ChangeTo(Box::new(action)),
            priority,
            reason: reason.into(),
        }
    }

    pub fn try_suspend_for(
        action: impl Action<A>,
        priority: Priority,
        reason: impl Into<Reason>,
    ) -> Self {
        Self {
            response: EventResponse::SuspendFor(Box::new(action)),
            priority,
            reason: reason.into(),
        }
    }

    pub fn try_done(priority: Priority, reason: impl Into<Reason>) -> Self {
        Self {
            response: EventResponse::Done,
            priority,
            reason: reason.into(),
        }
    }

    pub fn try_sustain(priority: Priority, reason: impl Into<Reason>) -> Self {
        Self {
            response: EventResponse::Sustain,
            priority,
            reason: reason.into(),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self.response, EventResponse::Continue)
    }

    pub fn is_change_to(&self) -> bool {
        matches!(self.response, EventResponse::ChangeTo(_))
    }

    pub fn is_suspend_for(&self) -> bool {
        matches!(self.response, EventResponse::SuspendFor(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self.response, EventResponse::Done)
    }

    pub fn is_sustain(&self) -> bool {
        matches!(self.response, EventResponse::Sustain)
    }

    pub fn is_requesting_change(&self) -> bool {
        self.is_change_to() || self.is_suspend_for() || self.is_done()
    }

    /// Drop the priority. `Sustain` collapses to `Continue`.
    pub fn into_action_result(self) -> ActionResult<A> {
        match self.response {
            EventResponse::Continue | EventResponse::Sustain => ActionResult::Continue,
            EventResponse::ChangeTo(action) => ActionResult::ChangeTo(action, self.reason),
            EventResponse::SuspendFor(action) => ActionResult::SuspendFor(action, self.reason),
            EventResponse::Done => ActionResult::Done(self.reason),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self.response {
            EventResponse::Continue => "Continue",
            EventResponse::ChangeTo(_) => "ChangeTo",
            EventResponse::SuspendFor(_) => "SuspendFor",
            EventResponse::Done => "Done",
            EventResponse::Sustain => "Sustain",
        }
    }
}

impl<A: Agent> fmt::Debug for EventResult<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventResult")
            .field("response", &self.kind())
            .field("priority", &self.priority)
            .field("reason", &self.reason)
            .finish()
    }
}
