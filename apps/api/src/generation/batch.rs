//! Bounded-concurrency batch execution with a shared deadline and N-of-M success policy.
//!
//! Jobs are spawned onto the runtime behind a semaphore and report back over a
//! channel. When the deadline passes, the batch stops waiting: jobs still in flight
//! are recorded as `TimedOut` and keep running detached, their results ignored.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::{timeout_at, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Maximum number of jobs running at once.
    pub max_in_flight: usize,
    /// Shared deadline for the whole batch.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<T> {
    Succeeded(T),
    Failed(String),
    TimedOut,
}

impl<T> TaskOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded(_))
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{succeeded} of {total} tasks succeeded, at least {required} required ({detail})")]
    InsufficientSuccesses {
        required: usize,
        succeeded: usize,
        total: usize,
        detail: String,
    },
}

/// Per-job outcomes in submission order.
#[derive(Debug)]
pub struct BatchReport<K, T> {
    pub outcomes: Vec<(K, TaskOutcome<T>)>,
}

impl<K: Display, T> BatchReport<K, T> {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    /// "key: reason" for every job that did not succeed, joined with "; ".
    pub fn failure_summary(&self) -> String {
        self.outcomes
            .iter()
            .filter_map(|(key, outcome)| match outcome {
                TaskOutcome::Succeeded(_) => None,
                TaskOutcome::Failed(reason) => Some(format!("{key}: {reason}")),
                TaskOutcome::TimedOut => Some(format!("{key}: timed out")),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Passes the report through when at least `required` jobs succeeded.
    pub fn require_successes(self, required: usize) -> Result<Self, BatchError> {
        let succeeded = self.success_count();
        if succeeded >= required {
            return Ok(self);
        }
        Err(BatchError::InsufficientSuccesses {
            required,
            succeeded,
            total: self.total(),
            detail: self.failure_summary(),
        })
    }

    /// Successful values with their keys, in submission order.
    pub fn into_successes(self) -> impl Iterator<Item = (K, T)> {
        self.outcomes
            .into_iter()
            .filter_map(|(key, outcome)| match outcome {
                TaskOutcome::Succeeded(value) => Some((key, value)),
                _ => None,
            })
    }
}

/// Runs keyed jobs concurrently (at most `max_in_flight` at a time) and waits
/// for all of them or for the shared deadline, whichever comes first.
pub async fn run_batch<K, T, E, Fut>(jobs: Vec<(K, Fut)>, config: BatchConfig) -> BatchReport<K, T>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let total = jobs.len();
    let semaphore = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
    let (tx, mut rx) = mpsc::channel::<(usize, TaskOutcome<T>)>(total.max(1));
    let deadline = Instant::now() + config.timeout;

    let mut keys = Vec::with_capacity(total);
    for (index, (key, job)) in jobs.into_iter().enumerate() {
        keys.push(key);
        let semaphore = Arc::clone(&semaphore);
        let tx = tx.clone();
        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let outcome = match job.await {
                Ok(value) => TaskOutcome::Succeeded(value),
                Err(e) => TaskOutcome::Failed(e.to_string()),
            };
            // The receiver is gone once the deadline passed; the result is dropped.
            let _ = tx.send((index, outcome)).await;
        });
    }
    drop(tx);

    let mut slots: Vec<Option<TaskOutcome<T>>> = (0..total).map(|_| None).collect();
    let mut received = 0;
    let mut deadline_hit = false;

    while received < total {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Some((index, outcome))) => {
                slots[index] = Some(outcome);
                received += 1;
            }
            // Every sender dropped without reporting: the remaining jobs panicked.
            Ok(None) => break,
            Err(_) => {
                deadline_hit = true;
                warn!(
                    "Batch deadline of {:?} reached with {}/{} jobs reported",
                    config.timeout, received, total
                );
                break;
            }
        }
    }

    let outcomes = keys
        .into_iter()
        .zip(slots)
        .map(|(key, slot)| {
            let outcome = slot.unwrap_or_else(|| {
                if deadline_hit {
                    TaskOutcome::TimedOut
                } else {
                    TaskOutcome::Failed("task aborted before reporting".to_string())
                }
            });
            (key, outcome)
        })
        .collect();

    BatchReport { outcomes }
}
