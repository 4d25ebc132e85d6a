//! Per-signer nonce coordination
//!
//! Holding a [`NonceGuard`] serializes the fee query → broadcast region for one
//! signer. Inside it the guard hands out `max(node pending nonce, last used + 1)`,
//! so concurrent or back-to-back submissions never reuse a nonce even when the
//! node's pending view lags behind our own broadcasts.

use tokio::sync::{Mutex, MutexGuard};

/// Nonce cursor for one signer on one chain
///
/// Share it through an `Arc` between clients that use the same key.
#[derive(Debug, Default)]
pub struct NonceAllocator {
    next: Mutex<Option<u64>>,
}

/// Exclusive access to the signer's nonce cursor
#[derive(Debug)]
pub struct NonceGuard<'a> {
    next: MutexGuard<'a, Option<u64>>,
}

impl NonceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the coordination region, waiting for any in-flight submission
    pub async fn lock(&self) -> NonceGuard<'_> {
        NonceGuard {
            next: self.next.lock().await,
        }
    }

    /// Next nonce the local cursor expects, if any broadcast has been committed
    pub async fn peek(&self) -> Option<u64> {
        *self.next.lock().await
    }
}

impl NonceGuard<'_> {
    /// Nonce to use given the pending nonce the node reported
    pub fn assign(&self, pending: u64) -> u64 {
        match *self.next {
            Some(next) => next.max(pending),
            None => pending,
        }
    }

    /// Record that `nonce` reached the network
    pub fn commit(&mut self, nonce: u64) {
        *self.next = Some(nonce.saturating_add(1));
    }

    /// Forget the local cursor and trust the node on the next submission
    pub fn reset(&mut self) {
        *self.next = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_assignment_uses_pending() {
        let nonces = NonceAllocator::new();
        let guard = nonces.lock().await;
        assert_eq!(guard.assign(5), 5);
    }

    #[tokio::test]
    async fn test_commit_advances_past_lagging_node() {
        let nonces = NonceAllocator::new();
        {
            let mut guard = nonces.lock().await;
            let nonce = guard.assign(5);
            guard.commit(nonce);
        }

        // node still reports 5
        let guard = nonces.lock().await;
        assert_eq!(guard.assign(5), 6);
        // node ahead of us (tx sent from elsewhere)
        assert_eq!(guard.assign(9), 9);
    }

    #[tokio::test]
    async fn test_uncommitted_nonce_is_reused() {
        let nonces = NonceAllocator::new();
        {
            let guard = nonces.lock().await;
            assert_eq!(guard.assign(3), 3);
            // broadcast failed, nothing committed
        }
        assert_eq!(nonces.peek().await, None);
        assert_eq!(nonces.lock().await.assign(3), 3);
    }

    #[tokio::test]
    async fn test_reset_trusts_node() {
        let nonces = NonceAllocator::new();
        let mut guard = nonces.lock().await;
        guard.commit(10);
        assert_eq!(guard.assign(4), 11);
        guard.reset();
        assert_eq!(guard.assign(4), 4);
    }

    #[tokio::test]
    async fn test_concurrent_holders_get_distinct_nonces() {
        let nonces = Arc::new(NonceAllocator::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let nonces = Arc::clone(&nonces);
            handles.push(tokio::spawn(async move {
                let mut guard = nonces.lock().await;
                let nonce = guard.assign(0);
                tokio::task::yield_now().await;
                guard.commit(nonce);
                nonce
            }));
        }

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }
}
