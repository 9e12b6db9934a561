use serde::{Deserialize, Serialize};

/// A request to call `handler` every `interval_seconds`, addressed by `path`.
///
/// Records are handed to an external scheduler as-is. Nothing here checks
/// that the handler exists or that the interval is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJob {
    pub path: String,
    pub handler: String,
    pub interval_seconds: u64,
}

/// Append-only, insertion-ordered list of cron jobs.
#[derive(Debug, Clone, Default)]
pub(crate) struct CronRegistry {
    jobs: Vec<CronJob>,
}

impl CronRegistry {
    pub(crate) fn push(&mut self, job: CronJob) {
        tracing::debug!(
            path = %job.path,
            handler = %job.handler,
            interval_seconds = job.interval_seconds,
            "Registered cron job"
        );
        self.jobs.push(job);
    }

    pub(crate) fn as_slice(&self) -> &[CronJob] {
        &self.jobs
    }
}
