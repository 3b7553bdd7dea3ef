//! In-flight request coalescing.
//!
//! At most one upstream call is outstanding per [`CacheKey`]. Callers that
//! arrive while it runs receive a clone of the same shared future and observe
//! the identical outcome, success or failure.

use crate::{BoundaryMetrics, CacheKey};
use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use solscope_core::{BoxFuture, Payload, SolscopeError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// Handle to an outstanding call, cloneable by every waiter.
pub type SharedCall = Shared<BoxFuture<'static, Payload>>;

type PendingTable = Arc<Mutex<HashMap<CacheKey, Pending>>>;

struct Pending {
    id: u64,
    call: SharedCall,
}

/// Table of outstanding upstream calls.
#[derive(Clone, Default)]
pub struct InFlightRequests {
    pending: PendingTable,
    next_id: Arc<AtomicU64>,
}

impl InFlightRequests {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outstanding call for `key`, or starts one from `producer`.
    ///
    /// `producer` runs at most once per registration and is invoked while the
    /// table lock is held, so it must not block. The future it returns is
    /// driven by its own task: waiters that go away do not cancel it. The
    /// entry is removed once that future completes and before any waiter can
    /// observe the result.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dedupe<F>(&self, key: &CacheKey, producer: F) -> SharedCall
    where
        F: FnOnce() -> BoxFuture<'static, Payload>,
    {
        let mut pending = self.pending.lock();

        if let Some(existing) = pending.get(key) {
            debug!(key = %key, "Joining in-flight request");
            BoundaryMetrics::coalesced();
            return existing.call.clone();
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let future = producer();
        let guard = Registration {
            table: Arc::clone(&self.pending),
            key: key.clone(),
            id,
        };

        let handle = tokio::spawn(async move {
            let result = future.await;
            drop(guard);
            result
        });

        let call = async move {
            handle.await.unwrap_or_else(|e| {
                error!(error = %e, "Upstream task did not complete");
                Err(SolscopeError::internal(format!("Upstream task failed: {}", e)))
            })
        }
        .boxed()
        .shared();

        pending.insert(key.clone(), Pending { id, call: call.clone() });
        BoundaryMetrics::in_flight(pending.len());
        debug!(key = %key, id, "Registered in-flight request");

        call
    }

    /// Returns true while a call for `key` is outstanding.
    #[must_use]
    pub fn is_pending(&self, key: &CacheKey) -> bool {
        self.pending.lock().contains_key(key)
    }

    /// Number of outstanding calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns true when no call is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Removes its table entry when dropped, unless a newer registration has
/// replaced it. Dropping also happens if the task panics or is aborted.
struct Registration {
    table: PendingTable,
    key: CacheKey,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut pending = self.table.lock();
        if pending.get(&self.key).is_some_and(|entry| entry.id == self.id) {
            pending.remove(&self.key);
            BoundaryMetrics::in_flight(pending.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solscope_core::SolscopeResult;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn key(path: &str) -> CacheKey {
        CacheKey::new(path, Vec::<(&str, &str)>::new())
    }

    fn gated(
        calls: &Arc<AtomicUsize>,
        gate: oneshot::Receiver<SolscopeResult<Payload>>,
    ) -> impl FnOnce() -> BoxFuture<'static, Payload> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                gate.await
                    .unwrap_or_else(|_| Err(SolscopeError::internal("gate dropped")))
            }
            .boxed()
        }
    }

    async fn wait_until_settled(requests: &InFlightRequests) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !requests.is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("in-flight entry was never released");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_call() {
        let requests = InFlightRequests::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel();

        let first = requests.dedupe(&key("/pnl/w/t"), gated(&calls, rx));
        let waiters: Vec<SharedCall> = (0..9)
            .map(|_| {
                requests.dedupe(&key("/pnl/w/t"), || {
                    panic!("producer must not run for a joined request")
                })
            })
            .collect();

        assert_eq!(requests.len(), 1);
        tx.send(Ok(Arc::new(json!({"pnl": 42})))).unwrap();

        let first = first.await.unwrap();
        for waiter in waiters {
            let value = waiter.await.unwrap();
            assert!(Arc::ptr_eq(&first, &value));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let requests = InFlightRequests::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();

        let a = requests.dedupe(&key("/tokens/a"), gated(&calls, rx_a));
        let b = requests.dedupe(&key("/tokens/b"), gated(&calls, rx_b));
        assert_eq!(requests.len(), 2);

        tx_b.send(Ok(Arc::new(json!("b")))).unwrap();
        assert_eq!(*b.await.unwrap(), json!("b"));
        assert!(requests.is_pending(&key("/tokens/a")));

        tx_a.send(Ok(Arc::new(json!("a")))).unwrap();
        assert_eq!(*a.await.unwrap(), json!("a"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_waiter_and_is_released() {
        let requests = InFlightRequests::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel();

        let first = requests.dedupe(&key("/stats/t"), gated(&calls, rx));
        let second = requests.dedupe(&key("/stats/t"), gated(&calls, oneshot::channel().1));

        let failure = SolscopeError::Timeout(Duration::from_secs(5));
        tx.send(Err(failure.clone())).unwrap();

        assert_eq!(first.await, Err(failure.clone()));
        assert_eq!(second.await, Err(failure));
        assert!(requests.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_new_call_after_settlement() {
        let requests = InFlightRequests::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (tx, rx) = oneshot::channel();
        let first = requests.dedupe(&key("/tokens/a"), gated(&calls, rx));
        tx.send(Ok(Arc::new(json!(1)))).unwrap();
        first.await.unwrap();

        let (tx, rx) = oneshot::channel();
        let second = requests.dedupe(&key("/tokens/a"), gated(&calls, rx));
        tx.send(Ok(Arc::new(json!(2)))).unwrap();

        assert_eq!(*second.await.unwrap(), json!(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropped_waiters_do_not_cancel_call() {
        let requests = InFlightRequests::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<()>();

        let done = Arc::clone(&finished);
        let call = requests.dedupe(&key("/top-traders/t"), move || {
            async move {
                let _ = rx.await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok::<_, SolscopeError>(Arc::new(json!([])))
            }
            .boxed()
        });
        drop(call);

        tx.send(()).unwrap();
        wait_until_settled(&requests).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_call_is_released() {
        let requests = InFlightRequests::new();

        let call = requests.dedupe(&key("/chart/t"), || {
            futures::future::lazy(|_| -> SolscopeResult<Payload> { panic!("upstream task blew up") })
                .boxed()
        });

        let err = call.await.unwrap_err();
        assert!(matches!(err, SolscopeError::Internal(_)));
        assert!(requests.is_empty());
    }
}
