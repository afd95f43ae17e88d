use core::fmt::Debug;

use crate::any::{short_type_name, AsAny};

/// A fire-and-forget signal raised against an agent.
///
/// Events are immutable payloads identified by their concrete type. Responders subscribe to a
/// concrete type; an event nobody subscribed to is silently ignored.
pub trait Event: AsAny + Debug {
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

/// Built-in events that every action can react to by overriding the matching callback.
pub mod events {
    use super::Event;

    /// This agent has been killed.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct Killed;

    /// This agent was injured.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct Injured {
        pub attacker: Option<u64>,
        pub damage: f32,
    }

    /// This agent is stuck.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Stuck;

    /// This agent is no longer stuck.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Unstuck;

    /// The current path destination was reached.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct MoveToSuccess;

    /// The current path destination could not be reached.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct MoveToFailure {
        pub reason: String,
    }

    /// Another entity came into view.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Sight {
        pub subject: u64,
    }

    /// Another entity went out of view.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LostSight {
        pub subject: u64,
    }

    /// This agent left the ground.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LeaveGround;

    /// This agent landed on the ground.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LandOnGround;

    impl Event for Killed {}
    impl Event for Injured {}
    impl Event for Stuck {}
    impl Event for Unstuck {}
    impl Event for MoveToSuccess {}
    impl Event for MoveToFailure {}
    impl Event for Sight {}
    impl Event for LostSight {}
    impl Event for LeaveGround {}
    impl Event for LandOnGround {}
}
