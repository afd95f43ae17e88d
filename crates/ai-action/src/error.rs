use thiserror::Error;

use crate::ActionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Chained immediate transitions (an `on_start` that changes to another action whose
    /// `on_start` changes again, ...) went deeper than `BehaviorConfig::max_transition_depth`.
    #[error("transition depth exceeded {limit} while starting `{action}`")]
    TransitionDepthExceeded { action: &'static str, limit: usize },

    #[error("unknown or discarded action {0:?}")]
    UnknownAction(ActionId),

    #[error("broken {link} link: {from:?} -> {to:?}")]
    BrokenLink {
        link: &'static str,
        from: ActionId,
        to: ActionId,
    },
}
