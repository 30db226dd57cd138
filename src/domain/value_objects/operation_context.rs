use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::CatalogError;

/// Cancellation and deadline carried through a request.
///
/// Cloning shares the cancellation signal; [`OperationContext::child_with_timeout`]
/// derives a context that is cancelled with its parent but may expire sooner.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < candidate => parent,
            _ => candidate,
        };

        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails when the context is already cancelled or past its deadline.
    pub fn ensure_active(&self) -> Result<(), CatalogError> {
        if self.token.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(CatalogError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Drives `future` until it completes, the context is cancelled, or the
    /// deadline passes. The future is dropped on cancellation.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, CatalogError>
    where
        F: Future,
    {
        self.ensure_active()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CatalogError::Cancelled),
            _ = deadline => Err(CatalogError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}
