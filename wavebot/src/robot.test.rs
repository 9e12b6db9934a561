use assert_matches::assert_matches;

use super::*;
use crate::test_utils::{Mute, Recorder};

fn recorder_robot() -> Robot<Recorder> {
    Robot::new(Config::default(), Recorder::default())
}

#[test_log::test]
fn test_identity_is_stored_verbatim() {
    let config = Config::new()
        .with_name("Echoey")
        .with_image_url("http://example.com/echoey.png")
        .with_profile_url("not even a url");
    let robot = Robot::new(config.clone(), Mute);

    assert_eq!(robot.name(), Some("Echoey"));
    assert_eq!(robot.image_url(), Some("http://example.com/echoey.png"));
    assert_eq!(robot.profile_url(), Some("not even a url"));
    assert_eq!(robot.config(), &config);
}

#[test_log::test]
fn test_unconfigured_identity_is_empty() {
    let robot = Robot::new(Config::default(), Mute);
    assert_eq!(robot.name(), None);
    assert_eq!(robot.image_url(), None);
    assert_eq!(robot.profile_url(), None);
}

#[test_log::test]
fn test_conventional_handlers_are_bound_at_construction() {
    let robot = recorder_robot();

    assert_eq!(robot.handlers_for(EventType::BlipSubmitted), ["blip_submitted"]);
    assert_eq!(
        robot.handlers_for(EventType::WaveletSelfAdded),
        ["wavelet_self_added"]
    );
}

#[test_log::test]
fn test_only_exact_lowercase_names_are_bound() {
    let robot = recorder_robot();

    // `Document_Changed` is not the lower-cased identifier.
    assert!(robot.can_perform("Document_Changed"));
    assert!(robot.handlers_for(EventType::DocumentChanged).is_empty());

    let bound: Vec<EventType> = EventType::ALL
        .into_iter()
        .filter(|t| !robot.handlers_for(*t).is_empty())
        .collect();
    assert_eq!(
        bound,
        [EventType::WaveletSelfAdded, EventType::BlipSubmitted]
    );
}

#[test_log::test]
fn test_cron_capabilities_are_not_auto_registered() {
    let robot = recorder_robot();
    assert!(robot.can_perform("cron_digest"));
    assert!(robot.cron_jobs().is_empty());
}

#[test_log::test]
fn test_register_handler_appends_in_order() {
    let mut robot = recorder_robot();
    robot.register_handler("BLIP_SUBMITTED", "audit").unwrap();
    robot.register_handler("BLIP_SUBMITTED", "notify").unwrap();

    assert_eq!(
        robot.handlers_for(EventType::BlipSubmitted),
        ["blip_submitted", "audit", "notify"]
    );
}

#[test_log::test]
fn test_register_handler_is_idempotent() {
    let mut robot = recorder_robot();
    robot.register_handler("DOCUMENT_CHANGED", "audit").unwrap();
    robot.register_handler("DOCUMENT_CHANGED", "audit").unwrap();
    // Already bound by convention.
    robot.register_handler("BLIP_SUBMITTED", "blip_submitted").unwrap();

    assert_eq!(robot.handlers_for(EventType::DocumentChanged), ["audit"]);
    assert_eq!(robot.handlers_for(EventType::BlipSubmitted), ["blip_submitted"]);
}

#[test_log::test]
fn test_same_handler_may_serve_many_event_types() {
    let mut robot = recorder_robot();
    robot.bind(EventType::BlipDeleted, "audit").unwrap();
    robot.bind(EventType::WaveletTitleChanged, "audit").unwrap();

    assert_eq!(robot.handlers_for(EventType::BlipDeleted), ["audit"]);
    assert_eq!(robot.handlers_for(EventType::WaveletTitleChanged), ["audit"]);
}

#[test_log::test]
fn test_unknown_event_type_is_rejected() {
    let mut robot = recorder_robot();

    assert_eq!(
        robot.register_handler("NOT_A_TYPE", "blip_submitted"),
        Err(RegistrationError::UnknownEventType("NOT_A_TYPE".into()))
    );
    // The event type is checked before the handler.
    assert_eq!(
        robot.register_handler("blip_submitted", "no_such_handler"),
        Err(RegistrationError::UnknownEventType("blip_submitted".into()))
    );
}

#[test_log::test]
fn test_unknown_handler_is_rejected() {
    let mut robot = recorder_robot();
    for event_type in EventType::ALL {
        assert_eq!(
            robot.register_handler(event_type.as_str(), "launch_rockets"),
            Err(RegistrationError::UnknownHandler("launch_rockets".into()))
        );
    }

    let mut mute = Robot::new(Config::default(), Mute);
    assert_matches!(
        mute.bind(EventType::BlipSubmitted, "blip_submitted"),
        Err(RegistrationError::UnknownHandler(name)) if name == "blip_submitted"
    );
}

#[test_log::test]
fn test_failed_registration_leaves_registry_untouched() {
    let mut robot = recorder_robot();
    let _ = robot.register_handler("NOT_A_TYPE", "audit");
    let _ = robot.register_handler("BLIP_SUBMITTED", "launch_rockets");

    assert_eq!(robot.handlers_for(EventType::BlipSubmitted), ["blip_submitted"]);
}

#[test_log::test]
fn test_dispatch_without_handlers_is_a_noop() {
    let mut robot = recorder_robot();
    let mut context = Vec::new();

    robot
        .dispatch(&Event::from(EventType::FormButtonClicked), &mut context)
        .unwrap();

    assert!(context.is_empty());
    assert!(robot.behavior().calls.is_empty());
}

#[test_log::test]
fn test_dispatch_ignores_types_outside_catalog() {
    let mut robot = recorder_robot();
    let mut context = Vec::new();

    robot
        .dispatch(&Event::new("SOMETHING_NEW"), &mut context)
        .unwrap();
    // Lower-case spelling is not a catalog member either.
    robot
        .dispatch(&Event::new("blip_submitted"), &mut context)
        .unwrap();

    assert!(context.is_empty());
    assert!(robot.behavior().calls.is_empty());
}

#[test_log::test]
fn test_dispatch_runs_handlers_in_registration_order() {
    let mut robot = recorder_robot();
    robot.register_handler("BLIP_SUBMITTED", "notify").unwrap();
    robot.register_handler("BLIP_SUBMITTED", "audit").unwrap();

    let event = Event::from(EventType::BlipSubmitted).modified_by("bob@example.com");
    let mut context = Vec::new();
    robot.dispatch(&event, &mut context).unwrap();

    assert_eq!(
        context,
        [
            "blip_submitted:BLIP_SUBMITTED",
            "notify:BLIP_SUBMITTED",
            "audit:BLIP_SUBMITTED",
        ]
    );
    assert_eq!(
        robot.behavior().calls,
        ["blip_submitted", "notify", "audit"]
    );
}

#[test_log::test]
fn test_dispatch_routes_each_event_independently() {
    let mut robot = recorder_robot();
    let mut context = Vec::new();

    robot
        .dispatch(&Event::from(EventType::WaveletSelfAdded), &mut context)
        .unwrap();
    robot
        .dispatch(&Event::from(EventType::BlipSubmitted), &mut context)
        .unwrap();
    robot
        .dispatch(&Event::from(EventType::BlipSubmitted), &mut context)
        .unwrap();

    assert_eq!(
        context,
        [
            "wavelet_self_added:WAVELET_SELF_ADDED",
            "blip_submitted:BLIP_SUBMITTED",
            "blip_submitted:BLIP_SUBMITTED",
        ]
    );
}

#[test_log::test]
fn test_handler_failure_stops_dispatch() {
    let mut robot = Robot::new(Config::default(), Recorder::failing_on("audit"));
    robot.register_handler("BLIP_SUBMITTED", "audit").unwrap();
    robot.register_handler("BLIP_SUBMITTED", "notify").unwrap();

    let mut context = Vec::new();
    let result = robot.dispatch(&Event::from(EventType::BlipSubmitted), &mut context);

    assert_matches!(
        result,
        Err(DispatchError::HandlerFailed {
            event_type: EventType::BlipSubmitted,
            handler: "audit",
            ref source,
        }) if source.to_string() == "audit refused"
    );
    // `notify` never ran.
    assert_eq!(robot.behavior().calls, ["blip_submitted", "audit"]);
    assert_eq!(context, ["blip_submitted:BLIP_SUBMITTED"]);

    // The robot is still usable for the next event.
    robot
        .dispatch(&Event::from(EventType::WaveletSelfAdded), &mut context)
        .unwrap();
    assert_eq!(context.last().map(String::as_str), Some("wavelet_self_added:WAVELET_SELF_ADDED"));
}

#[test_log::test]
fn test_register_cron_job_appends_without_validation() {
    let mut robot = recorder_robot();
    robot.register_cron_job("/cron/a", "tick", 60);
    robot.register_cron_job("/cron/a", "tick", 60);
    robot.register_cron_job("", "no_such_handler", 0);
    robot.register_cron_job("/cron/digest", "cron_digest", 3600);

    let jobs = robot.cron_jobs();
    assert_eq!(jobs.len(), 4);
    assert_eq!(jobs[0], jobs[1]);
    assert_eq!(
        jobs[2],
        CronJob {
            path: String::new(),
            handler: "no_such_handler".into(),
            interval_seconds: 0,
        }
    );
    assert_eq!(jobs[3].handler, "cron_digest");
}

#[test_log::test]
fn test_cron_jobs_do_not_bind_handlers() {
    let mut robot = recorder_robot();
    robot.register_cron_job("/cron/audit", "audit", 30);

    for event_type in EventType::ALL {
        assert!(!robot.handlers_for(event_type).contains(&"audit"));
    }
}

#[test_log::test]
fn test_cron_capability_can_be_bound_explicitly() {
    let mut robot = recorder_robot();
    robot.register_handler("BLIP_SUBMITTED", "cron_digest").unwrap();

    assert_eq!(
        robot.handlers_for(EventType::BlipSubmitted),
        ["blip_submitted", "cron_digest"]
    );

    let mut context = Vec::new();
    robot
        .dispatch(&Event::from(EventType::BlipSubmitted), &mut context)
        .unwrap();
    assert_eq!(
        context,
        ["blip_submitted:BLIP_SUBMITTED", "cron_digest:BLIP_SUBMITTED"]
    );
}

/// Declares `blip_submitted` twice with different callbacks.
#[derive(Debug, Default)]
struct Twice;

impl Twice {
    fn first(&mut self, _event: &Event, context: &mut Vec<&'static str>) -> crate::capability::HandlerResult {
        context.push("first");
        Ok(())
    }

    fn second(&mut self, _event: &Event, context: &mut Vec<&'static str>) -> crate::capability::HandlerResult {
        context.push("second");
        Ok(())
    }
}

impl Behavior for Twice {
    type Context = Vec<&'static str>;

    fn capabilities() -> Vec<crate::capability::Capability<Self>> {
        use crate::capability::Capability;
        vec![
            Capability::new("blip_submitted", Self::first),
            Capability::new("blip_submitted", Self::second),
        ]
    }
}

#[test_log::test]
fn test_first_declaration_of_a_capability_wins() {
    let mut robot = Robot::new(Config::default(), Twice);
    assert_eq!(robot.handlers_for(EventType::BlipSubmitted), ["blip_submitted"]);

    // Explicit registration resolves to the same first declaration.
    robot.register_handler("BLIP_SUBMITTED", "blip_submitted").unwrap();
    assert_eq!(robot.handlers_for(EventType::BlipSubmitted), ["blip_submitted"]);

    let mut context = Vec::new();
    robot
        .dispatch(&Event::from(EventType::BlipSubmitted), &mut context)
        .unwrap();
    assert_eq!(context, ["first"]);
}
