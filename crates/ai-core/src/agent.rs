/// An agent that behaviors, components and responders act on.
///
/// The kernel places no requirement on an agent beyond a stable identity for as long as it is
/// being simulated, and a validity flag the driver uses to purge agents that went away.
/// Everything else (position, health, knowledge) is domain data that concrete actions read
/// through the `&mut A` they are handed.
pub trait Agent: 'static {
    /// Stable numeric ID, used for deterministic ordering, update staggering and logs.
    fn stable_id(&self) -> u64;

    /// `false` once the agent has been removed from the simulation.
    fn is_valid(&self) -> bool {
        true
    }
}
