//! Per-request call context.
//!
//! Every store and cache call made on behalf of a request runs under the
//! request's [`CallContext`], so a caller-supplied deadline or cancellation
//! bounds the whole operation, not just its first I/O.

use crate::{CustodianError, CustodianResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation scope for a single request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// A context with no deadline that is never cancelled by the caller.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_at(Instant::now() + timeout)
    }

    /// Sets an absolute deadline. An earlier existing deadline wins.
    #[must_use]
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Uses the caller's cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Derives a context that is cancelled with this one but can be cancelled
    /// independently.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            cancellation: self.cancellation.child_token(),
        }
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Cancels this context and all of its children.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Runs `fut` under this context.
    ///
    /// Returns `Cancelled` if the token fires first and `Timeout` if the
    /// deadline elapses first. The losing future is dropped, which cancels any
    /// in-flight backend call it owns.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> CustodianResult<T>
    where
        F: Future<Output = CustodianResult<T>>,
    {
        if self.is_cancelled() {
            return Err(CustodianError::Cancelled);
        }

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.cancellation.cancelled() => Err(CustodianError::Cancelled),
                    result = tokio::time::timeout_at(deadline, fut) => result.unwrap_or_else(|_| {
                        Err(CustodianError::Timeout(format!("{operation} exceeded the request deadline")))
                    }),
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = self.cancellation.cancelled() => Err(CustodianError::Cancelled),
                    result = fut => result,
                }
            }
        }
    }
}
