//! Event dispatch core for collaboration robots.
//!
//! A [`Robot`](robot::Robot) receives named events from a collaboration
//! service and routes each one to the handlers registered for its type. A
//! robot's handlers come from its [`Behavior`](capability::Behavior), which
//! declares a fixed table of named capabilities. At construction every
//! capability named after a lower-cased event type is bound to that type;
//! further handlers and cron jobs are registered by setup code.
//!
//! Decoding wire payloads, the document operations handlers perform, and the
//! scheduler that fires cron jobs all live outside this crate.
pub mod capability;
pub mod config;
pub mod cron;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod prelude;
mod registry;
pub mod robot;
#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::test_utils::init_tracing;

    /// A robot that greets new participants and echoes submitted blips.
    #[derive(Default)]
    struct Echoey {
        greeted: usize,
    }

    /// Stand-in for the operations a real context would collect.
    #[derive(Default)]
    struct Outbox {
        operations: Vec<String>,
    }

    impl Echoey {
        fn blip_submitted(&mut self, event: &Event, ctx: &mut Outbox) -> HandlerResult {
            let text = event
                .properties
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or("blip without text")?;
            ctx.operations.push(format!("append:{text}"));
            Ok(())
        }

        fn wavelet_self_added(&mut self, _event: &Event, ctx: &mut Outbox) -> HandlerResult {
            self.greeted += 1;
            ctx.operations.push("append:Hello!".to_string());
            Ok(())
        }

        fn cron_ping(&mut self, _event: &Event, _ctx: &mut Outbox) -> HandlerResult {
            Ok(())
        }
    }

    impl Behavior for Echoey {
        type Context = Outbox;

        fn capabilities() -> Vec<Capability<Self>> {
            capabilities!(Self; blip_submitted, wavelet_self_added, cron_ping)
        }
    }

    fn echoey() -> Robot<Echoey> {
        let config = Config::new()
            .with_name("Echoey")
            .with_image_url("http://example.com/echoey.png");
        let mut robot = Robot::new(config, Echoey::default());
        robot.register_cron_job("/_wave/cron/ping", "cron_ping", 60);
        robot
    }

    #[test]
    fn test_submitted_blip_is_echoed_once() {
        init_tracing();
        let mut robot = echoey();
        let event = Event::from(EventType::BlipSubmitted)
            .with_property("text", serde_json::json!("hi there"));
        let mut outbox = Outbox::default();

        robot.dispatch(&event, &mut outbox).unwrap();

        assert_eq!(outbox.operations, ["append:hi there"]);
    }

    #[test]
    fn test_self_added_greets() {
        init_tracing();
        let mut robot = echoey();
        let mut outbox = Outbox::default();

        robot
            .dispatch(&Event::from(EventType::WaveletSelfAdded), &mut outbox)
            .unwrap();

        assert_eq!(robot.behavior().greeted, 1);
        assert_eq!(outbox.operations, ["append:Hello!"]);
    }

    #[test]
    fn test_handler_error_reaches_caller() {
        init_tracing();
        let mut robot = echoey();
        let mut outbox = Outbox::default();

        let err = robot
            .dispatch(&Event::from(EventType::BlipSubmitted), &mut outbox)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Handler 'blip_submitted' failed for BLIP_SUBMITTED: blip without text"
        );
        assert!(outbox.operations.is_empty());
    }

    #[test]
    fn test_registering_unknown_event_fails() {
        init_tracing();
        let mut robot = echoey();
        assert_eq!(
            robot.register_handler("NOT_A_TYPE", "blip_submitted"),
            Err(RegistrationError::UnknownEventType("NOT_A_TYPE".into()))
        );
    }

    #[test]
    fn test_setup_cron_job_is_recorded() {
        init_tracing();
        let robot = echoey();
        assert_eq!(
            robot.cron_jobs(),
            [CronJob {
                path: "/_wave/cron/ping".into(),
                handler: "cron_ping".into(),
                interval_seconds: 60,
            }]
        );
        assert!(robot.handlers_for(EventType::BlipSubmitted) == ["blip_submitted"]);
    }

    #[tokio::test]
    async fn test_hosted_robot_echoes() {
        init_tracing();
        let endpoint = echoey().spawn();
        let event = Event::from(EventType::BlipSubmitted)
            .with_property("text", serde_json::json!("over the wire"));

        let outbox = endpoint.dispatch(event, Outbox::default()).await.unwrap();

        assert_eq!(outbox.operations, ["append:over the wire"]);
        endpoint.shutdown();
    }
}
