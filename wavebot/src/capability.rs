//! Capability descriptors: the fixed set of behaviors a robot can perform.
//!
//! A robot never discovers its handlers by looking at method names at
//! runtime. Instead its behavior declares a table of named callbacks once,
//! and both explicit registration and convention-based binding consult
//! that table.
use std::fmt;

use crate::event::Event;

/// The error type a handler may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The outcome of running a single handler.
pub type HandlerResult = Result<(), HandlerError>;

/// A handler bound to a concrete behavior type.
pub type HandlerFn<B> = fn(&mut B, &Event, &mut <B as Behavior>::Context) -> HandlerResult;

/// Marks capabilities meant for scheduled jobs. The prefix only matters to
/// the cron pass at robot construction, which binds nothing; such a
/// capability can still be registered for an event explicitly.
pub const CRON_PREFIX: &str = "cron_";

/// The concrete behavior of a robot.
///
/// Implementors list what they can do through [`Behavior::capabilities`],
/// usually with the [`capabilities!`](crate::capabilities) macro.
pub trait Behavior: Sized + 'static {
    /// The per-event bundle handed to each handler. The dispatch core never
    /// looks inside it.
    type Context;

    /// The callbacks this behavior exposes, keyed by name.
    fn capabilities() -> Vec<Capability<Self>>;
}

/// A named callback a behavior exposes.
pub struct Capability<B: Behavior> {
    name: &'static str,
    handler: HandlerFn<B>,
}

impl<B: Behavior> Capability<B> {
    pub const fn new(name: &'static str, handler: HandlerFn<B>) -> Self {
        Self { name, handler }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn invoke(
        &self,
        behavior: &mut B,
        event: &Event,
        context: &mut B::Context,
    ) -> HandlerResult {
        (self.handler)(behavior, event, context)
    }

    /// Whether this capability carries the cron prefix.
    pub fn is_cron(&self) -> bool {
        self.name.starts_with(CRON_PREFIX)
    }
}

impl<B: Behavior> Clone for Capability<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Behavior> Copy for Capability<B> {}

impl<B: Behavior> fmt::Debug for Capability<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("behavior", &std::any::type_name::<B>())
            .finish()
    }
}

/// The capability table of one behavior, built once per robot.
pub(crate) struct Capabilities<B: Behavior> {
    entries: Vec<Capability<B>>,
}

impl<B: Behavior> Capabilities<B> {
    pub(crate) fn of_behavior() -> Self {
        let mut entries: Vec<Capability<B>> = Vec::new();
        for capability in B::capabilities() {
            if entries.iter().any(|c| c.name == capability.name) {
                tracing::warn!(
                    capability = capability.name,
                    behavior = std::any::type_name::<B>(),
                    "Duplicate capability declared, keeping the first"
                );
                continue;
            }
            entries.push(capability);
        }
        Self { entries }
    }

    pub(crate) fn find(&self, name: &str) -> Option<Capability<B>> {
        self.entries.iter().find(|c| c.name == name).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Capability<B>> {
        self.entries.iter()
    }
}

/// Build a capability table from methods of a behavior.
///
/// Each method is exposed under its own name, so a method called
/// `blip_submitted` handles `BLIP_SUBMITTED` events once the robot is built.
///
/// ```ignore
/// impl Behavior for Greeter {
///     type Context = Vec<String>;
///
///     fn capabilities() -> Vec<Capability<Self>> {
///         capabilities!(Self; wavelet_self_added, blip_submitted)
///     }
/// }
/// ```
#[macro_export]
macro_rules! capabilities {
    ($behavior:ty; $($method:ident),* $(,)?) => {
        vec![
            $($crate::capability::Capability::<$behavior>::new(
                stringify!($method),
                <$behavior>::$method,
            )),*
        ]
    };
}
