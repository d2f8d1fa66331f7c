use crate::utils::error::AdapterError;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline shared by every call of one auction.
///
/// Clones share the same token, so cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_at(Instant::now() + timeout)
    }

    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The reason this context is finished, or `None` while it is still live.
    pub fn err(&self) -> Option<AdapterError> {
        if self.token.is_cancelled() {
            return Some(AdapterError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(AdapterError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> AdapterError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => AdapterError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => AdapterError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                AdapterError::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_live_context_has_no_error() {
        let ctx = CallContext::with_timeout(Duration::from_secs(30));
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn test_cancel_is_shared_between_clones() {
        let ctx = CallContext::new();
        let clone = ctx.clone();
        clone.cancel();
        assert!(matches!(ctx.err(), Some(AdapterError::Cancelled)));
        assert!(matches!(ctx.done().await, AdapterError::Cancelled));
    }

    #[tokio::test]
    async fn test_expired_deadline_reports_deadline_exceeded() {
        let ctx = CallContext::new().deadline_at(Instant::now());
        assert!(matches!(ctx.err(), Some(AdapterError::DeadlineExceeded)));
        assert!(matches!(ctx.done().await, AdapterError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_deadline_only_tightens() {
        let soon = Instant::now() + Duration::from_millis(10);
        let ctx = CallContext::new()
            .deadline_at(soon)
            .deadline_at(soon + Duration::from_secs(5));
        assert_eq!(ctx.deadline(), Some(soon));
    }
}
