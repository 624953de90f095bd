//! Submitting asynchronous tasks and polling them to completion.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::client::Client;
use crate::errors::{Result, RoexError};
use crate::response::{classify, Classified, Task, TaskKind, TaskResult, TaskStatus};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_POLL_ATTEMPTS: u32 = 30;

/// How the wait between two attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Always wait `interval`.
    Fixed,
    /// Double the wait after every attempt, starting at `interval`, up to `max`.
    Exponential { max: Duration },
}

/// Attempt budget and spacing for a retried operation.
///
/// The effective timeout is the sum of the waits between attempts, not a
/// wall-clock deadline: slow responses stretch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval,
            backoff: Backoff::Fixed,
        }
    }

    pub fn exponential(initial: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval: initial,
            backoff: Backoff::Exponential { max },
        }
    }

    /// 30 attempts, 5 seconds apart.
    pub fn polling() -> Self {
        Self::fixed(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_ATTEMPTS)
    }

    /// Wait after the failed attempt number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential { max } => {
                let factor = 1u32 << attempt.saturating_sub(1).min(16);
                self.interval.saturating_mul(factor).min(max)
            }
        }
    }

    /// Total time spent sleeping if every attempt fails.
    pub fn budget(&self) -> Duration {
        (1..self.max_attempts).fold(Duration::ZERO, |total, n| {
            total.saturating_add(self.delay(n))
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::polling()
    }
}

/// Result of one attempt inside [`retry_until`].
pub(crate) enum Step<T, N = RoexError> {
    Done(T),
    /// Try again; carries what the attempt observed (usually the error), if anything.
    Retry(Option<N>),
    Abort(RoexError),
}

pub(crate) enum Outcome<T, N = RoexError> {
    Done(T),
    /// Budget used up; holds the last observation carried by [`Step::Retry`].
    Exhausted(Option<N>),
}

/// Runs `attempt` until it reports [`Step::Done`] or [`Step::Abort`], or the
/// policy runs out of attempts. Sleeps between attempts, never after the last.
pub(crate) async fn retry_until<T, N, F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<Outcome<T, N>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Step<T, N>>,
{
    let mut last_err = None;

    for n in 1..=policy.max_attempts {
        match attempt(n).await {
            Step::Done(value) => return Ok(Outcome::Done(value)),
            Step::Abort(err) => return Err(err),
            Step::Retry(err) => last_err = err.or(last_err),
        }

        if n < policy.max_attempts {
            tokio::time::sleep(policy.delay(n)).await;
        }
    }

    Ok(Outcome::Exhausted(last_err))
}

/// Submits tasks and polls them until the service reports a terminal status.
///
/// # Example
///
/// ```no_run
/// use roex::{Client, RetryPolicy, TaskKind, TaskPoller};
/// use serde_json::json;
/// use std::time::Duration;
///
/// # async fn example() -> roex::Result<()> {
/// let client = Client::new("roex_api_key")?;
/// let poller = TaskPoller::new(&client);
///
/// let payload = json!({ "masteringData": { "trackData": [{ "trackURL": "https://cdn/song.wav" }] } });
/// let mut task = poller.submit("/masteringpreview", &payload, TaskKind::MasteringPreview).await?;
///
/// let result = poller
///     .poll(&mut task, &RetryPolicy::fixed(Duration::from_secs(2), 60))
///     .await?;
/// println!("{:?}", result.download_url());
/// # Ok(())
/// # }
/// ```
pub struct TaskPoller<'a> {
    client: &'a Client,
    span: Span,
}

impl<'a> TaskPoller<'a> {
    /// A poller logging under a child of the client's span.
    pub fn new(client: &'a Client) -> Self {
        let span = info_span!(parent: client.span(), "task_poller");
        Self::with_span(client, span)
    }

    /// A poller logging under the given span.
    pub fn with_span(client: &'a Client, span: Span) -> Self {
        Self { client, span }
    }

    /// Creates a task. Never retried: a non-2xx answer fails immediately.
    ///
    /// # Errors
    ///
    /// - Any request error from the creation call.
    /// - [`RoexError::Service`] if the body flags an error or carries no task id.
    pub async fn submit(&self, endpoint: &str, payload: &Value, kind: TaskKind) -> Result<Task> {
        async {
            debug!(endpoint, "submitting task");
            let value = self
                .client
                .post_value(endpoint, payload)
                .await
                .inspect_err(|e| error!(endpoint, error = %e, "task submission failed"))?;

            if value.get("error").and_then(Value::as_bool) == Some(true) {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("task submission rejected");
                error!(endpoint, message, "service rejected task");
                return Err(RoexError::service(message));
            }

            let id = value
                .get(kind.id_key())
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    RoexError::service(format!("response did not include {}", kind.id_key()))
                })?;

            info!(endpoint, task_id = id, "task submitted");
            Ok(Task::new(id, kind))
        }
        .instrument(self.span.clone())
        .await
    }

    /// Queries the task's status endpoint until it completes, fails, or the
    /// policy's attempts run out.
    ///
    /// Transient request errors count as one attempt and are not fatal.
    /// `task.status` is updated with the last status the service reported.
    ///
    /// # Errors
    ///
    /// - [`RoexError::Timeout`] after `max_attempts` non-terminal responses.
    /// - [`RoexError::TaskFailed`] if the service reports a failed status.
    /// - A non-transient request error, e.g. [`RoexError::Authentication`].
    pub async fn poll(&self, task: &mut Task, policy: &RetryPolicy) -> Result<TaskResult> {
        let span = info_span!(parent: &self.span, "poll", task_id = %task.id, kind = ?task.kind);
        let client = self.client;
        let endpoint = task.kind.status_endpoint();
        let result_key = task.kind.result_key();
        let payload = task.kind.status_payload(&task.id);
        let payload = &payload;
        let task_id = task.id.clone();
        let task_id = task_id.as_str();

        async move {
            let outcome = retry_until(policy, move |attempt| async move {
                debug!(attempt, max_attempts = policy.max_attempts, "checking task status");
                match client.post_value(endpoint, payload).await {
                    Ok(value) => match classify(&value, Some(result_key)) {
                        Classified::Done(result) => {
                            info!(attempt, "task completed");
                            Step::Done(result)
                        }
                        Classified::Failed(status) => {
                            error!(attempt, %status, "task failed");
                            Step::Abort(RoexError::TaskFailed {
                                task_id: task_id.to_string(),
                                status,
                            })
                        }
                        Classified::NotReady(status) => {
                            debug!(attempt, ?status, "task not ready");
                            Step::Retry(status)
                        }
                    },
                    Err(e) if e.is_transient() => {
                        warn!(attempt, error = %e, "status check failed, retrying");
                        Step::Retry(None)
                    }
                    Err(e) => {
                        error!(attempt, error = %e, "status check failed");
                        Step::Abort(e)
                    }
                }
            })
            .await;

            match outcome {
                Ok(Outcome::Done(result)) => {
                    task.status = TaskStatus::Completed;
                    Ok(result)
                }
                Err(e) => {
                    if matches!(e, RoexError::TaskFailed { .. }) {
                        task.status = TaskStatus::Failed;
                    }
                    Err(e)
                }
                Ok(Outcome::Exhausted(last_status)) => {
                    if let Some(status) = last_status {
                        task.status = status;
                    }
                    error!(attempts = policy.max_attempts, "task did not complete in time");
                    Err(RoexError::Timeout {
                        attempts: policy.max_attempts,
                        budget: policy.budget(),
                    })
                }
            }
        }
        .instrument(span)
        .await
    }
}
