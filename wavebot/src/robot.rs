//! The robot: identity, handler and cron registries, and event dispatch.
//!
//! A robot is built once from a [`Config`] and a [`Behavior`]. Construction
//! binds every capability whose name is the lower-cased form of a catalog
//! event type to that event type. Setup code may then register further
//! handlers and cron jobs before events start arriving.
use crate::capability::{Behavior, Capabilities};
use crate::config::Config;
use crate::cron::{CronJob, CronRegistry};
use crate::error::{DispatchError, RegistrationError};
use crate::event::{Event, EventType};
use crate::registry::HandlerRegistry;

#[cfg(test)]
#[path = "robot.test.rs"]
mod tests;

/// A robot: its identity, the behavior it runs, and the handlers and cron
/// jobs registered for it.
///
/// Registration and dispatch take `&mut self`; use [`Robot::spawn`] to share
/// one robot between tasks.
pub struct Robot<B: Behavior> {
    config: Config,
    behavior: B,
    capabilities: Capabilities<B>,
    handlers: HandlerRegistry<B>,
    cron_jobs: CronRegistry,
}

impl<B: Behavior> Robot<B> {
    /// Build a robot and bind its conventionally named capabilities.
    pub fn new(config: Config, behavior: B) -> Self {
        let mut robot = Robot {
            config,
            behavior,
            capabilities: Capabilities::of_behavior(),
            handlers: HandlerRegistry::default(),
            cron_jobs: CronRegistry::default(),
        };
        robot.bind_conventional_handlers();
        robot.bind_conventional_cron_jobs();
        robot
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.config.image_url.as_deref()
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.config.profile_url.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    /// Whether the behavior exposes a capability called `handler`.
    pub fn can_perform(&self, handler: &str) -> bool {
        self.capabilities.find(handler).is_some()
    }

    /// Names of the handlers bound to `event_type`, in the order they run.
    pub fn handlers_for(&self, event_type: EventType) -> Vec<&'static str> {
        self.handlers.names(event_type)
    }

    /// Cron jobs in the order they were registered.
    pub fn cron_jobs(&self) -> &[CronJob] {
        self.cron_jobs.as_slice()
    }

    /// Register `handler` for the event type named by `event_type`.
    ///
    /// The event type is checked first, so an identifier outside the
    /// catalog is reported as [`RegistrationError::UnknownEventType`] even
    /// when the handler is unknown too. Registering a pair twice is a no-op.
    pub fn register_handler(
        &mut self,
        event_type: &str,
        handler: &str,
    ) -> Result<(), RegistrationError> {
        let event_type: EventType = event_type.parse()?;
        self.bind(event_type, handler)
    }

    /// Register `handler` for an already resolved event type.
    pub fn bind(&mut self, event_type: EventType, handler: &str) -> Result<(), RegistrationError> {
        let capability = self
            .capabilities
            .find(handler)
            .ok_or_else(|| RegistrationError::UnknownHandler(handler.to_string()))?;

        if self.handlers.insert(event_type, capability) {
            tracing::debug!(%event_type, handler, "Registered handler");
        } else {
            tracing::trace!(%event_type, handler, "Handler already registered");
        }
        Ok(())
    }

    /// Append a cron job. Arguments are recorded as given.
    pub fn register_cron_job(
        &mut self,
        path: impl Into<String>,
        handler: impl Into<String>,
        interval_seconds: u64,
    ) {
        self.cron_jobs.push(CronJob {
            path: path.into(),
            handler: handler.into(),
            interval_seconds,
        });
    }

    /// Run every handler bound to the event's type, in registration order,
    /// each with the same event and context.
    ///
    /// Events whose type has no handlers, including types outside the
    /// catalog, are ignored. The first handler to fail stops the dispatch:
    /// later handlers do not run and the failure is returned to the caller,
    /// which decides whether to carry on with the next event.
    #[tracing::instrument(
        name = "dispatch",
        skip_all,
        fields(event_type = %event.event_type)
    )]
    pub fn dispatch(&mut self, event: &Event, context: &mut B::Context) -> Result<(), DispatchError> {
        let Some(event_type) = event.kind() else {
            tracing::trace!("Ignoring event outside the catalog");
            return Ok(());
        };

        let handlers = self.handlers.get(event_type);
        if handlers.is_empty() {
            tracing::trace!("Ignoring unhandled event");
            return Ok(());
        }

        for capability in handlers {
            if let Err(source) = capability.invoke(&mut self.behavior, event, context) {
                tracing::warn!(handler = capability.name(), error = %source, "Handler failed");
                return Err(DispatchError::HandlerFailed {
                    event_type,
                    handler: capability.name(),
                    source,
                });
            }
        }
        Ok(())
    }

    fn bind_conventional_handlers(&mut self) {
        for event_type in EventType::ALL {
            let name = event_type.handler_name();
            if self.can_perform(&name) {
                if let Err(err) = self.bind(event_type, &name) {
                    tracing::error!(error = %err, "Failed to bind conventional handler");
                }
            }
        }
    }

    /// Extension point for binding `cron_` capabilities by name. It binds
    /// nothing: cron jobs need a path and interval that only setup code
    /// knows, so they are registered with [`Robot::register_cron_job`].
    fn bind_conventional_cron_jobs(&mut self) {
        let reserved = self.capabilities.iter().filter(|c| c.is_cron()).count();
        if reserved > 0 {
            tracing::trace!(reserved, "Cron capabilities left for explicit registration");
        }
    }
}

impl<B: Behavior + std::fmt::Debug> std::fmt::Debug for Robot<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("config", &self.config)
            .field("behavior", &self.behavior)
            .field("cron_jobs", &self.cron_jobs)
            .finish()
    }
}
