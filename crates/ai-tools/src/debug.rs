use core::fmt;
use std::borrow::Cow;

use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{NullTraceSink, Severity, TraceEvent, TraceSink};

bitflags! {
    /// Set of diagnostics categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct DebugFlags: u32 {
        /// Transitions and the per-tick stack print.
        const BEHAVIOR   = 1;
        /// Event delivery and arbitration.
        const EVENTS     = 1 << 1;
        const LOCOMOTION = 1 << 2;
        const PATH       = 1 << 3;
        const VISION     = 1 << 4;
    }
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl DebugFlags {
    pub const NONE: Self = Self::empty();

    pub const ALL: Self = Self::all();

    /// `true` if `flag` is non-empty and every one of its bits is set. Messages tagged `NONE`
    /// never pass a gate.
    pub const fn enables(self, flag: Self) -> bool {
        !flag.is_empty() && self.contains(flag)
    }
}

impl fmt::Display for DebugFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(DebugFlags, &str); 5] = [
            (DebugFlags::BEHAVIOR, "behavior"),
            (DebugFlags::EVENTS, "events"),
            (DebugFlags::LOCOMOTION, "locomotion"),
            (DebugFlags::PATH, "path"),
            (DebugFlags::VISION, "vision"),
        ];

        let mut first = true;
        for (flag, name) in NAMES {
            if self.enables(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Category-gated diagnostics side channel.
///
/// Messages whose category is not enabled are dropped before any formatting reaches the sink.
/// Enabled messages are forwarded to `tracing` and to the installed [`TraceSink`].
pub struct Diagnostics {
    flags: DebugFlags,
    sink: Box<dyn TraceSink>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DebugFlags::NONE)
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl Diagnostics {
    pub fn new(flags: DebugFlags) -> Self {
        Self {
            flags,
            sink: Box::new(NullTraceSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn flags(&self) -> DebugFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: DebugFlags) {
        self.flags = flags;
    }

    pub fn is_debugging(&self, flag: DebugFlags) -> bool {
        self.flags.enables(flag)
    }

    pub fn is_debugging_any(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Flip `flag`: enable it if it was off, disable it if it was on. Returns the new state.
    pub fn toggle(&mut self, flag: DebugFlags) -> bool {
        if self.flags.enables(flag) {
            self.flags.remove(flag);
            tracing::info!(flag = %flag, "debug flag disabled");
            false
        } else {
            self.flags.insert(flag);
            tracing::info!(flag = %flag, "debug flag enabled");
            true
        }
    }

    pub fn msg(
        &mut self,
        flag: DebugFlags,
        tick: u64,
        agent: u64,
        message: impl Into<Cow<'static, str>>,
    ) {
        self.record(flag, Severity::Info, tick, agent, message);
    }

    pub fn msg_warning(
        &mut self,
        flag: DebugFlags,
        tick: u64,
        agent: u64,
        message: impl Into<Cow<'static, str>>,
    ) {
        self.record(flag, Severity::Warning, tick, agent, message);
    }

    pub fn msg_error(
        &mut self,
        flag: DebugFlags,
        tick: u64,
        agent: u64,
        message: impl Into<Cow<'static, str>>,
    ) {
        self.record(flag, Severity::Error, tick, agent, message);
    }

    fn record(
        &mut self,
        flag: DebugFlags,
        severity: Severity,
        tick: u64,
        agent: u64,
        message: impl Into<Cow<'static, str>>,
    ) {
        if !self.flags.enables(flag) {
            return;
        }

        let event = TraceEvent::new(tick, message)
            .with_agent(agent)
            .with_category(flag)
            .with_severity(severity);

        match severity {
            Severity::Info => {
                tracing::debug!(agent, tick, category = %flag, "{}", event.message)
            }
            Severity::Warning => {
                tracing::warn!(agent, tick, category = %flag, "{}", event.message)
            }
            Severity::Error => {
                tracing::error!(agent, tick, category = %flag, "{}", event.message)
            }
        }

        self.sink.emit(event);
    }
}
