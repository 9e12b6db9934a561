//! Shared fixtures for robot tests.
//!
//! [`Recorder`] is a behavior whose handlers write `"<handler>:<event type>"`
//! into the context, so tests can see exactly what ran, in which order, and
//! for which event. Any handler named in `fail_on` returns an error instead.

use crate::capability::{Behavior, Capability, HandlerResult};
use crate::event::Event;

/// Initialize tracing for tests that are not run through `test_log`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("wavebot=trace".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
pub struct Recorder {
    /// Every handler invocation seen by this behavior, across dispatches.
    pub calls: Vec<&'static str>,
    pub fail_on: Option<&'static str>,
}

impl Recorder {
    pub fn failing_on(handler: &'static str) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(handler),
        }
    }

    fn record(
        &mut self,
        handler: &'static str,
        event: &Event,
        context: &mut Vec<String>,
    ) -> HandlerResult {
        self.calls.push(handler);
        if self.fail_on == Some(handler) {
            return Err(format!("{handler} refused").into());
        }
        context.push(format!("{handler}:{}", event.event_type));
        Ok(())
    }

    pub fn blip_submitted(&mut self, event: &Event, context: &mut Vec<String>) -> HandlerResult {
        self.record("blip_submitted", event, context)
    }

    pub fn wavelet_self_added(
        &mut self,
        event: &Event,
        context: &mut Vec<String>,
    ) -> HandlerResult {
        self.record("wavelet_self_added", event, context)
    }

    /// Looks like a convention name but is not lower-cased, so it must
    /// never be bound automatically.
    #[allow(non_snake_case)]
    pub fn Document_Changed(&mut self, event: &Event, context: &mut Vec<String>) -> HandlerResult {
        self.record("Document_Changed", event, context)
    }

    pub fn audit(&mut self, event: &Event, context: &mut Vec<String>) -> HandlerResult {
        self.record("audit", event, context)
    }

    pub fn notify(&mut self, event: &Event, context: &mut Vec<String>) -> HandlerResult {
        self.record("notify", event, context)
    }

    pub fn cron_digest(&mut self, event: &Event, context: &mut Vec<String>) -> HandlerResult {
        self.record("cron_digest", event, context)
    }
}

impl Behavior for Recorder {
    type Context = Vec<String>;

    fn capabilities() -> Vec<Capability<Self>> {
        crate::capabilities!(
            Self;
            blip_submitted,
            wavelet_self_added,
            Document_Changed,
            audit,
            notify,
            cron_digest,
        )
    }
}

/// A behavior that exposes nothing.
#[derive(Debug, Default)]
pub struct Mute;

impl Behavior for Mute {
    type Context = ();

    fn capabilities() -> Vec<Capability<Self>> {
        Vec::new()
    }
}
