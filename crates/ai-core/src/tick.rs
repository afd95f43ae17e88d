#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self { tick, dt_seconds }
    }

    /// Same tick, different interval. Used when a component runs less often than the scheduler.
    pub fn with_dt(self, dt_seconds: f32) -> Self {
        Self { dt_seconds, ..self }
    }
}
