use crate::{
    error::JobError,
    job::{JobHandle, JobStatus},
    transport::JobTransport,
};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2000;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_MULTIPLIER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl PollOptions {
    /// Sleep after the 1-based `attempt`: `initial_delay * multiplier^(attempt - 1)`
    /// capped at `max_delay`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .max(1)
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);

        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Reported once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    pub attempt: u32,
    pub max_attempts: u32,
    pub status: JobStatus,
    /// `None` when this attempt ended the wait.
    pub next_delay: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    /// Body of the last status query.
    pub payload: Value,
    pub attempts: u32,
}

pub struct JobPoller<'a, T: JobTransport + ?Sized> {
    transport: &'a T,
    options: PollOptions,
}

impl<'a, T: JobTransport + ?Sized> JobPoller<'a, T> {
    #[must_use]
    pub const fn new(transport: &'a T, options: PollOptions) -> Self {
        Self { transport, options }
    }

    #[must_use]
    pub const fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Poll `handle` until it settles.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the job fails or reports an unknown status, the
    /// attempts run out, `cancel` fires or a status query fails
    pub async fn wait_for<F>(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<JobResult, JobError>
    where
        F: FnMut(&PollProgress),
    {
        let max_attempts = self.options.max_attempts.max(1);
        let mut last_status: Option<String> = None;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let rs = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(JobError::Cancelled { attempts: attempt - 1, last_status });
                }
                rs = self.transport.get_job_status(handle) => rs,
            };

            let payload = rs.map_err(|source| JobError::Transport { attempt, source })?;
            let status = JobStatus::from_body(&payload);

            log::debug!("{} attempt {attempt}/{max_attempts}: {status}", handle.endpoint());

            let next_delay = (!status.is_terminal() && attempt < max_attempts)
                .then(|| self.options.delay(attempt));

            on_progress(&PollProgress {
                attempt,
                max_attempts,
                status: status.clone(),
                next_delay,
            });

            match status {
                JobStatus::Success => {
                    log::info!("output {handle} ready after {attempt} attempts");
                    return Ok(JobResult {
                        payload,
                        attempts: attempt,
                    });
                }

                JobStatus::Failed => {
                    return Err(JobError::Failed {
                        status: status.to_string(),
                        attempts: attempt,
                    });
                }

                JobStatus::Unknown(_) => {
                    log::warn!("output {handle} reported unknown status: {status}");
                    return Err(JobError::Failed {
                        status: status.to_string(),
                        attempts: attempt,
                    });
                }

                JobStatus::Pending => {}
            }

            let Some(delay) = next_delay else {
                return Err(JobError::TimedOut {
                    last_status: status.to_string(),
                    attempts: attempt,
                });
            };

            last_status = Some(status.to_string());

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(JobError::Cancelled { attempts: attempt, last_status });
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    };

    // replays the scripted statuses, the last one repeats forever
    struct ScriptedTransport {
        statuses: Vec<&'static str>,
        queries: AtomicU32,
        unauthorized: bool,
    }

    impl ScriptedTransport {
        fn new(statuses: &[&'static str]) -> Self {
            Self {
                statuses: statuses.to_vec(),
                queries: AtomicU32::new(0),
                unauthorized: false,
            }
        }

        fn queries(&self) -> u32 {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobTransport for ScriptedTransport {
        async fn get_job_status(&self, handle: &JobHandle) -> Result<Value, TransportError> {
            let n = usize::try_from(self.queries.fetch_add(1, Ordering::SeqCst)).unwrap();
            if self.unauthorized {
                return Err(TransportError::from_status(401, String::new()));
            }
            let status = self
                .statuses
                .get(n)
                .or_else(|| self.statuses.last())
                .unwrap();
            Ok(json!({"id": handle.id(), "status": status}))
        }
    }

    fn options(max_attempts: u32) -> PollOptions {
        PollOptions {
            max_attempts,
            ..PollOptions::default()
        }
    }

    #[test]
    fn test_delay_is_capped() {
        let options = PollOptions::default();
        let delays: Vec<u64> = (1..=7)
            .map(|attempt| u64::try_from(options.delay(attempt).as_millis()).unwrap())
            .collect();
        assert_eq!(delays, vec![500, 1000, 2000, 4000, 5000, 5000, 5000]);
        assert_eq!(options.delay(u32::MAX), DEFAULT_MAX_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_pending() {
        let transport = ScriptedTransport::new(&["PENDING", "PENDING", "SUCCESS"]);
        let poller = JobPoller::new(&transport, options(10));
        let mut progress = Vec::new();

        let rs = poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |p| {
                progress.push(p.clone());
            })
            .await
            .unwrap();

        assert_eq!(rs.attempts, 3);
        assert_eq!(rs.payload["status"], "SUCCESS");
        assert_eq!(transport.queries(), 3);

        assert_eq!(progress.len(), 3);
        assert_eq!(progress[0].next_delay, Some(Duration::from_millis(500)));
        assert_eq!(progress[1].next_delay, Some(Duration::from_millis(1000)));
        assert_eq!(progress[2].status, JobStatus::Success);
        assert_eq!(progress[2].next_delay, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed() {
        let transport = ScriptedTransport::new(&["PENDING", "FAILED"]);
        let poller = JobPoller::new(&transport, options(10));

        let err = poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
            .await
            .unwrap_err();

        match err {
            JobError::Failed { status, attempts } => {
                assert_eq!(status, "FAILED");
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_fails_closed() {
        let transport = ScriptedTransport::new(&["WEIRD"]);
        let poller = JobPoller::new(&transport, options(10));

        let err = poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JobError::Failed { ref status, attempts: 1 } if status == "WEIRD"
        ));
        assert_eq!(transport.queries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_at_ceiling() {
        let transport = ScriptedTransport::new(&["PENDING"]);
        let poller = JobPoller::new(&transport, options(5));

        let err = poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
            .await
            .unwrap_err();

        match err {
            JobError::TimedOut {
                last_status,
                attempts,
            } => {
                assert_eq!(last_status, "PENDING");
                assert_eq!(attempts, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.queries(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_with_default_ceiling() {
        let transport = ScriptedTransport::new(&["PENDING"]);
        let poller = JobPoller::new(&transport, PollOptions::default());

        let err = poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::TimedOut { attempts: 2000, .. }));
        assert_eq!(transport.queries(), 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_not_timeout() {
        let transport = ScriptedTransport::new(&["PENDING"]);
        let poller = JobPoller::new(&transport, options(10));
        let cancel = CancellationToken::new();

        let err = poller
            .wait_for(&JobHandle::new("o-1"), &cancel, |p| {
                if p.attempt == 2 {
                    cancel.cancel();
                }
            })
            .await
            .unwrap_err();

        match err {
            JobError::Cancelled {
                attempts,
                last_status,
            } => {
                assert_eq!(attempts, 2);
                assert_eq!(last_status.as_deref(), Some("PENDING"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_query_failure() {
        let mut transport = ScriptedTransport::new(&["PENDING"]);
        transport.unauthorized = true;
        let poller = JobPoller::new(&transport, options(10));

        let err = poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Transport { attempt: 1, .. }));
        assert!(err.is_unauthorized());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_once_per_attempt() {
        let transport = ScriptedTransport::new(&["PENDING", "SUCCESS"]);
        let poller = JobPoller::new(&transport, options(10));
        let seen = Mutex::new(Vec::new());

        poller
            .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |p| {
                seen.lock().unwrap().push(p.attempt);
            })
            .await
            .unwrap();

        assert_eq!(seen.into_inner().unwrap(), vec![1, 2]);
    }
}
