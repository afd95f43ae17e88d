//! Tooling primitives for deterministic game AI: a category-gated diagnostics channel and the
//! trace records it produces.
//!
//! This crate is intentionally lightweight and engine-agnostic. Higher-level integrations (debug
//! overlays, inspectors, etc.) should live in dedicated adapter crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod debug;
pub mod trace;

pub use debug::{DebugFlags, Diagnostics};
pub use trace::{NullTraceSink, Severity, TraceEvent, TraceLog, TraceSink, VecTraceSink};
