//! Error types for registration, dispatch and hosted robots

use crate::capability::HandlerError;
use crate::event::{EventType, UnknownEventType};

/// Errors raised by handler registration. Both are caller mistakes and are
/// reported immediately.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Unknown event: {0}")]
    UnknownEventType(String),
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),
}

impl From<UnknownEventType> for RegistrationError {
    fn from(err: UnknownEventType) -> Self {
        RegistrationError::UnknownEventType(err.0)
    }
}

/// Errors raised while dispatching an event.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    /// A handler failed. Handlers after it in the list were not run.
    #[error("Handler '{handler}' failed for {event_type}: {source}")]
    HandlerFailed {
        event_type: EventType,
        handler: &'static str,
        #[source]
        source: HandlerError,
    },
}

/// Errors returned by a [`RobotEndpoint`](crate::endpoint::RobotEndpoint).
#[derive(thiserror::Error, Debug)]
pub enum EndpointError {
    /// The hosted robot has shut down and no longer accepts commands.
    #[error("Robot mailbox has been closed")]
    MailboxClosed,
    /// The hosted robot went away before replying.
    #[error("Robot response was dropped unexpectedly")]
    ResponseDropped,
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}
