use assert_matches::assert_matches;
use tokio_test::{assert_err, assert_ok, assert_pending};

use super::*;
use crate::config::Config;
use crate::event::EventType;
use crate::test_utils::Recorder;

fn spawn_recorder(recorder: Recorder) -> RobotEndpoint<Recorder> {
    Robot::new(Config::new().with_name("recorder"), recorder).spawn()
}

#[test_log::test(tokio::test)]
async fn test_dispatch_returns_context() {
    let endpoint = spawn_recorder(Recorder::default());

    let context = assert_ok!(
        endpoint
            .dispatch(Event::from(EventType::BlipSubmitted), Vec::new())
            .await
    );
    assert_eq!(context, ["blip_submitted:BLIP_SUBMITTED"]);
}

#[test_log::test(tokio::test)]
async fn test_unhandled_event_returns_context_untouched() {
    let endpoint = spawn_recorder(Recorder::default());

    let context = assert_ok!(
        endpoint
            .dispatch(Event::new("NOT_A_TYPE"), vec!["seed".to_string()])
            .await
    );
    assert_eq!(context, ["seed"]);
}

#[test_log::test(tokio::test)]
async fn test_registration_through_endpoint() {
    let endpoint = spawn_recorder(Recorder::default());

    assert_ok!(endpoint.register_handler("DOCUMENT_CHANGED", "audit").await);
    assert_ok!(endpoint.register_handler("DOCUMENT_CHANGED", "notify").await);

    let context = assert_ok!(
        endpoint
            .dispatch(Event::from(EventType::DocumentChanged), Vec::new())
            .await
    );
    assert_eq!(
        context,
        ["audit:DOCUMENT_CHANGED", "notify:DOCUMENT_CHANGED"]
    );
}

#[test_log::test(tokio::test)]
async fn test_registration_errors_cross_the_endpoint() {
    let endpoint = spawn_recorder(Recorder::default());

    assert_matches!(
        endpoint.register_handler("NOT_A_TYPE", "audit").await,
        Err(EndpointError::Registration(RegistrationError::UnknownEventType(_)))
    );
    assert_matches!(
        endpoint.register_handler("BLIP_SUBMITTED", "launch_rockets").await,
        Err(EndpointError::Registration(RegistrationError::UnknownHandler(_)))
    );
}

#[test_log::test(tokio::test)]
async fn test_handler_failure_crosses_the_endpoint() {
    let endpoint = spawn_recorder(Recorder::failing_on("blip_submitted"));

    assert_matches!(
        endpoint
            .dispatch(Event::from(EventType::BlipSubmitted), Vec::new())
            .await,
        Err(EndpointError::Dispatch(DispatchError::HandlerFailed {
            handler: "blip_submitted",
            ..
        }))
    );

    // The hosted robot keeps serving after a failed dispatch.
    assert_ok!(
        endpoint
            .dispatch(Event::from(EventType::WaveletSelfAdded), Vec::new())
            .await
    );
}

#[test_log::test(tokio::test)]
async fn test_cron_jobs_snapshot_keeps_order() {
    let endpoint = spawn_recorder(Recorder::default());

    assert_ok!(endpoint.register_cron_job("/cron/a", "tick", 60).await);
    assert_ok!(endpoint.register_cron_job("/cron/a", "tick", 60).await);
    assert_ok!(endpoint.register_cron_job("/cron/b", "cron_digest", 5).await);

    let jobs = assert_ok!(endpoint.cron_jobs().await);
    let paths: Vec<&str> = jobs.iter().map(|job| job.path.as_str()).collect();
    assert_eq!(paths, ["/cron/a", "/cron/a", "/cron/b"]);
    assert_eq!(jobs[0], jobs[1]);
}

#[test_log::test(tokio::test)]
async fn test_clones_share_one_robot() {
    let endpoint = spawn_recorder(Recorder::default());
    let other = endpoint.clone();

    assert_ok!(other.register_handler("WAVELET_SELF_ADDED", "audit").await);
    let context = assert_ok!(
        endpoint
            .dispatch(Event::from(EventType::WaveletSelfAdded), Vec::new())
            .await
    );
    assert_eq!(
        context,
        [
            "wavelet_self_added:WAVELET_SELF_ADDED",
            "audit:WAVELET_SELF_ADDED",
        ]
    );
}

#[test_log::test(tokio::test)]
async fn test_shutdown_closes_mailbox() {
    let endpoint = spawn_recorder(Recorder::default());
    assert!(!endpoint.is_closed());

    endpoint.shutdown();

    assert!(endpoint.is_closed());
    let err = assert_err!(endpoint.cron_jobs().await);
    assert_matches!(err, EndpointError::MailboxClosed);
    assert_matches!(
        endpoint
            .dispatch(Event::from(EventType::BlipSubmitted), Vec::new())
            .await,
        Err(EndpointError::MailboxClosed)
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_dispatch_can_keep_partial_context() {
    let endpoint = spawn_recorder(Recorder::failing_on("audit"));
    assert_ok!(endpoint.register_handler("BLIP_SUBMITTED", "audit").await);
    assert_ok!(endpoint.register_handler("BLIP_SUBMITTED", "notify").await);

    let (context, result) = assert_ok!(
        endpoint
            .dispatch_with_context(Event::from(EventType::BlipSubmitted), Vec::new())
            .await
    );

    assert_matches!(
        result,
        Err(DispatchError::HandlerFailed { handler: "audit", .. })
    );
    assert_eq!(context, ["blip_submitted:BLIP_SUBMITTED"]);
}

#[test_log::test(tokio::test)]
async fn test_shutdown_drops_queued_commands() {
    let endpoint = spawn_recorder(Recorder::default());

    // Queue a request before the hosted robot gets a chance to run.
    let mut queued = tokio_test::task::spawn(endpoint.cron_jobs());
    assert_pending!(queued.poll());

    endpoint.shutdown();

    let result = loop {
        if let std::task::Poll::Ready(result) = queued.poll() {
            break result;
        }
        tokio::task::yield_now().await;
    };
    assert_matches!(result, Err(EndpointError::ResponseDropped));
}
