use ai_tools::DebugFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorConfig {
    /// Ceiling on nested/chained immediate transitions applied within one driver call.
    pub max_transition_depth: usize,

    /// Panic instead of logging when the ceiling is hit. On by default in debug builds.
    pub panic_on_depth_exceeded: bool,

    /// Diagnostics categories enabled for this behavior.
    pub debug: DebugFlags,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            max_transition_depth: 64,
            panic_on_depth_exceeded: cfg!(debug_assertions),
            debug: DebugFlags::NONE,
        }
    }
}
