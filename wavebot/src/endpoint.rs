//! Hosting a robot on the tokio runtime.
//!
//! [`Robot::spawn`] moves the robot into its own task. The task owns the
//! robot exclusively and works through its mailbox one command at a time,
//! so registration and dispatch never race even when many tasks hold a
//! [`RobotEndpoint`]. Handlers still run synchronously inside the task; a
//! slow handler holds up every command queued behind it.
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::capability::Behavior;
use crate::cron::CronJob;
use crate::error::{DispatchError, EndpointError, RegistrationError};
use crate::event::Event;
use crate::robot::Robot;

#[cfg(test)]
#[path = "endpoint.test.rs"]
mod tests;

const DEFAULT_MAILBOX_CAPACITY: usize = 64;

type DispatchReply<C> = (C, Result<(), DispatchError>);

enum Command<B: Behavior> {
    Dispatch {
        event: Event,
        context: B::Context,
        reply: oneshot::Sender<DispatchReply<B::Context>>,
    },
    RegisterHandler {
        event_type: String,
        handler: String,
        reply: oneshot::Sender<Result<(), RegistrationError>>,
    },
    RegisterCronJob {
        job: CronJob,
        reply: oneshot::Sender<()>,
    },
    CronJobs {
        reply: oneshot::Sender<Vec<CronJob>>,
    },
}

impl<B: Behavior> std::fmt::Debug for Command<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Dispatch { event, .. } => f
                .debug_struct("Dispatch")
                .field("event_type", &event.event_type)
                .finish(),
            Command::RegisterHandler {
                event_type,
                handler,
                ..
            } => f
                .debug_struct("RegisterHandler")
                .field("event_type", event_type)
                .field("handler", handler)
                .finish(),
            Command::RegisterCronJob { job, .. } => {
                f.debug_struct("RegisterCronJob").field("job", job).finish()
            }
            Command::CronJobs { .. } => f.write_str("CronJobs"),
        }
    }
}

impl<B> Robot<B>
where
    B: Behavior + Send,
    B::Context: Send + 'static,
{
    /// Move the robot onto the current tokio runtime and return a handle to it.
    ///
    /// Must be called from within a runtime.
    pub fn spawn(self) -> RobotEndpoint<B> {
        let (tx, rx) = mpsc::channel(DEFAULT_MAILBOX_CAPACITY);
        let cancellation = CancellationToken::new();
        tokio::spawn(run(self, rx, cancellation.clone()));
        RobotEndpoint { tx, cancellation }
    }

    fn handle_command(&mut self, cmd: Command<B>) {
        match cmd {
            Command::Dispatch {
                event,
                mut context,
                reply,
            } => {
                let result = self.dispatch(&event, &mut context);
                let _ = reply.send((context, result));
            }
            Command::RegisterHandler {
                event_type,
                handler,
                reply,
            } => {
                let _ = reply.send(self.register_handler(&event_type, &handler));
            }
            Command::RegisterCronJob { job, reply } => {
                self.register_cron_job(job.path, job.handler, job.interval_seconds);
                let _ = reply.send(());
            }
            Command::CronJobs { reply } => {
                let _ = reply.send(self.cron_jobs().to_vec());
            }
        }
    }
}

#[tracing::instrument(name = "robot", skip_all, fields(name = robot.name().unwrap_or("unnamed")))]
async fn run<B>(mut robot: Robot<B>, mut rx: mpsc::Receiver<Command<B>>, cancellation: CancellationToken)
where
    B: Behavior + Send,
    B::Context: Send + 'static,
{
    tracing::info!("Robot started");
    loop {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                tracing::debug!("Shutdown requested");
                break;
            }
            cmd = rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                tracing::trace!(?cmd, "command received");
                robot.handle_command(cmd);
            }
        }
    }
    tracing::info!("Robot stopped");
}

/// A cloneable handle to a robot running in its own task.
pub struct RobotEndpoint<B: Behavior> {
    tx: mpsc::Sender<Command<B>>,
    cancellation: CancellationToken,
}

impl<B: Behavior> Clone for RobotEndpoint<B> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            cancellation: self.cancellation.clone(),
        }
    }
}

impl<B: Behavior> RobotEndpoint<B> {
    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> Command<B>,
    ) -> Result<R, EndpointError> {
        if self.cancellation.is_cancelled() {
            return Err(EndpointError::MailboxClosed);
        }
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| EndpointError::MailboxClosed)?;
        rx.await.map_err(|_| EndpointError::ResponseDropped)
    }

    /// Dispatch `event` and hand the context back once every handler ran.
    ///
    /// If a handler fails the context is dropped along with whatever earlier
    /// handlers put in it; use [`RobotEndpoint::dispatch_with_context`] to
    /// keep it.
    pub async fn dispatch(
        &self,
        event: Event,
        context: B::Context,
    ) -> Result<B::Context, EndpointError> {
        let (context, result) = self.dispatch_with_context(event, context).await?;
        result?;
        Ok(context)
    }

    /// Dispatch `event` and always hand the context back, next to the
    /// dispatch outcome. Only mailbox failures lose the context.
    pub async fn dispatch_with_context(
        &self,
        event: Event,
        context: B::Context,
    ) -> Result<(B::Context, Result<(), DispatchError>), EndpointError> {
        self.request(|reply| Command::Dispatch {
            event,
            context,
            reply,
        })
        .await
    }

    pub async fn register_handler(
        &self,
        event_type: impl Into<String>,
        handler: impl Into<String>,
    ) -> Result<(), EndpointError> {
        let event_type = event_type.into();
        let handler = handler.into();
        self.request(|reply| Command::RegisterHandler {
            event_type,
            handler,
            reply,
        })
        .await??;
        Ok(())
    }

    pub async fn register_cron_job(
        &self,
        path: impl Into<String>,
        handler: impl Into<String>,
        interval_seconds: u64,
    ) -> Result<(), EndpointError> {
        let job = CronJob {
            path: path.into(),
            handler: handler.into(),
            interval_seconds,
        };
        self.request(|reply| Command::RegisterCronJob { job, reply })
            .await
    }

    /// A snapshot of the cron jobs, for handing to a scheduler.
    pub async fn cron_jobs(&self) -> Result<Vec<CronJob>, EndpointError> {
        self.request(|reply| Command::CronJobs { reply }).await
    }

    /// Stop the hosted robot. Commands already queued are dropped.
    pub fn shutdown(&self) {
        self.cancellation.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancellation.is_cancelled() || self.tx.is_closed()
    }
}
