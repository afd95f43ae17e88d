//! Suspendable action-stack runtime built on `ai-core`.
//!
//! An agent's logic is a stack of [`Action`]s. An action can replace itself
//! ([`ActionResult::ChangeTo`]), push another action on top of itself until that one is done
//! ([`ActionResult::SuspendFor`]), or finish and resume whatever it covered
//! ([`ActionResult::Done`]). Independently of the stack, an action may own a contained child
//! action that runs alongside it and is torn down with it.
//!
//! Events are offered top-down through a stack; the first action that responds gets its
//! [`EventResult`] arbitrated by [`Priority`] and applied before the next update. Queries walk
//! the same order and return the first answer.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod behavior;
pub mod config;
pub mod error;
mod events;
pub mod intention;
mod queries;
pub mod result;
pub mod stack;
pub mod subscriptions;
mod transition;

pub use action::{Action, ActionRef};
pub use behavior::{Behavior, BehaviorStatus};
pub use config::BehaviorConfig;
pub use error::ActionError;
pub use intention::Intention;
pub use result::{ActionResult, EventResponse, EventResult, Priority, Reason};
pub use stack::{ActionId, ActionNode, ActionStack};
pub use subscriptions::Subscriptions;
