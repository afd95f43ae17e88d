//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! This crate is intended as a convenient entrypoint for users and as a home for docs.rs guides.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "action")]
#[cfg_attr(docsrs, doc(cfg(feature = "action")))]
pub use ai_action as action;

/// The names most agents need: actions, results, the behavior driver and the responder tree.
#[cfg(feature = "action")]
#[cfg_attr(docsrs, doc(cfg(feature = "action")))]
pub mod prelude {
    pub use ai_action::{
        Action, ActionRef, ActionResult, Behavior, BehaviorConfig, BehaviorStatus, EventResult,
        Intention, Priority, Subscriptions,
    };
    pub use ai_core::events;
    pub use ai_core::{Agent, Component, Controller, Event, Query, Responder, TickContext};
}
