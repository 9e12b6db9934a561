//! Commonly used robot types and traits.
//!
//! Import this module to declare a behavior, build a robot and feed it events.

pub use super::capabilities; // Capability table macro
pub use super::capability::{
    Behavior,      // Trait implemented by a robot's concrete behavior
    Capability,    // A named handler a behavior exposes
    HandlerError,  // Error a handler may fail with
    HandlerResult, // Result of a single handler
    CRON_PREFIX,   // Reserved prefix for scheduled capabilities
};
pub use super::config::Config; // Robot identity options
pub use super::cron::CronJob; // A scheduling record
pub use super::endpoint::RobotEndpoint; // Handle to a robot hosted on tokio
pub use super::error::{DispatchError, EndpointError, RegistrationError};
pub use super::event::{Event, EventType, UnknownEventType};
pub use super::robot::Robot;
