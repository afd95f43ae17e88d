//! Deterministic, engine-agnostic agent kernel primitives: agents, ticks, events, queries and
//! the responder tree that routes them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod any;
pub mod controller;
pub mod event;
pub mod query;
pub mod registry;
pub mod responder;
pub mod tick;

pub use agent::Agent;
pub use any::{short_type_name, AsAny};
pub use controller::{Component, Controller, ControllerConfig};
pub use event::{events, Event};
pub use query::{downcast_answer, Query};
pub use registry::{RegisteredAgent, Registry};
pub use responder::{invoke_event, invoke_query, Responder};
pub use tick::TickContext;
