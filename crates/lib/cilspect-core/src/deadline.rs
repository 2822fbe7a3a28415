//! Timeout and cancellation coordination.
//!
//! Each capability call gets one effective deadline: the earlier of the
//! caller's cancellation token firing and the configured default duration
//! elapsing. The two outcomes are distinct at the orchestrator boundary —
//! a client must be able to tell "I withdrew this request" apart from
//! "the system gave up".

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{InspectError, InspectResult};

#[derive(Debug, Clone)]
pub struct DeadlineCoordinator {
    default_timeout: Duration,
}

impl DeadlineCoordinator {
    #[must_use]
    pub const fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Drives `work` under the effective deadline.
    ///
    /// Caller cancellation wins over the timeout and is also checked before
    /// the work starts. The deadline bounds the wait for a result, not the
    /// engine's internal execution: abandoned work keeps running on its
    /// blocking thread and is discarded on completion.
    ///
    /// # Errors
    /// Returns `Cancelled` when the caller token fires, `Timeout` when the
    /// configured default elapses, or whatever `work` itself fails with.
    pub async fn run<T>(
        &self,
        cancel: &CancellationToken,
        work: impl Future<Output = InspectResult<T>> + Send,
    ) -> InspectResult<T> {
        if cancel.is_cancelled() {
            return Err(InspectError::Cancelled);
        }

        tokio::select! {
            () = cancel.cancelled() => Err(InspectError::Cancelled),
            outcome = tokio::time::timeout(self.default_timeout, work) => match outcome {
                Ok(result) => result,
                Err(_) => Err(InspectError::Timeout {
                    seconds: self.default_timeout.as_secs(),
                }),
            },
        }
    }
}
