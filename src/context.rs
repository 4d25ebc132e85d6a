//! Cancellation and deadlines for network calls
//!
//! Every connector call runs under a [`CallContext`]. A context carries an
//! optional deadline and an optional cancellation signal; whichever fires first
//! aborts the in-flight call. Dropping the aborted future drops the underlying
//! request, so nothing is leaked.

use crate::error::ConnectorError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Deadline and cancellation signal shared by the calls of one operation
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context cloned from the one it was created with
///
/// Dropping the handle does not cancel.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CallContext {
    /// Context with no deadline that is never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Context expiring `timeout` from now
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().with_timeout_from_now(timeout)
    }

    /// Add a deadline `timeout` from now, keeping an earlier one
    pub fn with_timeout_from_now(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Set the deadline, keeping an earlier one if already present
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Attach a cancellation signal
    pub fn cancellable(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }

    /// Fail fast if the context is already done
    pub fn check(&self) -> Result<(), ConnectorError> {
        if self.is_cancelled() {
            return Err(ConnectorError::Cancelled);
        }
        if self.is_expired() {
            return Err(ConnectorError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run `fut` until it finishes or the context is done
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ConnectorError>
    where
        F: Future<Output = Result<T, ConnectorError>>,
    {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ConnectorError::Cancelled),
            _ = self.expired() => Err(ConnectorError::DeadlineExceeded),
            res = fut => res,
        }
    }

    /// Sleep for `duration`, waking early if the context is done
    pub async fn sleep(&self, duration: Duration) -> Result<(), ConnectorError> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }

    /// Resolves once cancellation is signalled; never resolves otherwise
    async fn cancelled(&self) {
        if let Some(rx) = &self.cancel {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Resolves once the deadline passes; never resolves without one
    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}
