//! Request-scoped operation context
//!
//! Every document store operation is bounded by the earlier of the caller's
//! deadline and the store's configured timeout, and is aborted when the
//! caller cancels. Both outcomes surface as [`StoreError::Backend`].

use crate::domain::StoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation scope of one caller
///
/// # Example
///
/// ```rust
/// use ambulance_wl::adapters::database::OperationContext;
/// use std::time::Duration;
///
/// let ctx = OperationContext::new().with_timeout(Duration::from_secs(2));
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl OperationContext {
    /// Context without a deadline of its own; only the store timeout applies
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Ties the context to an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Caller deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Token cancelling every operation run under this context
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether the caller has cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// The earlier of the caller deadline and `now + store_timeout`
    pub fn effective_deadline(&self, store_timeout: Duration) -> Instant {
        let store_deadline = Instant::now() + store_timeout;
        match self.deadline {
            Some(deadline) => deadline.min(store_deadline),
            None => store_deadline,
        }
    }

    /// Runs `operation` under the effective deadline
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the deadline passes or the context is
    /// cancelled before `operation` completes; otherwise the operation's own
    /// result.
    pub async fn run<T, F>(
        &self,
        store_timeout: Duration,
        operation: &str,
        future: F,
    ) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.is_cancelled() {
            return Err(StoreError::Backend(format!("{operation}: operation cancelled")));
        }

        let deadline = self.effective_deadline(store_timeout);
        if deadline <= Instant::now() {
            return Err(StoreError::Backend(format!("{operation}: deadline exceeded")));
        }

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                tracing::warn!(operation, "Document store operation cancelled");
                Err(StoreError::Backend(format!("{operation}: operation cancelled")))
            }
            result = tokio::time::timeout_at(deadline, future) => match result {
                Ok(inner) => inner,
                Err(_) => {
                    tracing::warn!(operation, "Document store operation timed out");
                    Err(StoreError::Backend(format!("{operation}: deadline exceeded")))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_effective_deadline_prefers_earlier_caller_deadline() {
        let ctx = OperationContext::new().with_timeout(Duration::from_millis(50));
        let deadline = ctx.effective_deadline(Duration::from_secs(10));
        assert_eq!(Some(deadline), ctx.deadline());
    }

    #[tokio::test]
    async fn test_effective_deadline_falls_back_to_store_timeout() {
        let ctx = OperationContext::new().with_timeout(Duration::from_secs(60));
        let before = Instant::now();
        let deadline = ctx.effective_deadline(Duration::from_secs(1));
        assert!(deadline <= before + Duration::from_secs(2));
        assert!(deadline < ctx.deadline().unwrap());
    }

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let ctx = OperationContext::new();
        let value = ctx
            .run(Duration::from_secs(1), "find", async { Ok::<_, StoreError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        let err = ctx
            .run(Duration::from_secs(1), "find", async {
                Err::<(), _>(StoreError::NotFound("x".into()))
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_run_times_out_as_backend_error() {
        let ctx = OperationContext::new();
        let err = ctx
            .run(Duration::from_millis(20), "update", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref m) if m.contains("deadline")));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_operation() {
        let token = CancellationToken::new();
        let ctx = OperationContext::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = ctx
            .run(Duration::from_secs(30), "create", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, StoreError::Backend(ref m) if m.contains("cancelled")));
    }

    #[tokio::test]
    async fn test_already_cancelled_context_fails_fast() {
        let ctx = OperationContext::new();
        ctx.cancellation().cancel();
        let err = ctx
            .run(Duration::from_secs(1), "delete", async { Ok::<_, StoreError>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_expired_deadline_fails_before_polling() {
        let ctx = OperationContext::new().with_deadline(Instant::now());
        let err = ctx
            .run(Duration::from_secs(1), "find", async { Ok::<_, StoreError>(1) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(ref m) if m.contains("deadline")));
    }
}
