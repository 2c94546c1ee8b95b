//! # Per-entity mutation coordination
//!
//! A screen that toggles shared social state (follow, like, join, read)
//! routes every remote call through a [`MutationCoordinator`]. Each entity
//! key moves through `Idle -> Pending(op) -> Idle`; a request for a key that
//! is already pending is skipped without touching the network, so rapid
//! repeated taps produce one call.
//!
//! The local flag is never flipped before the call settles. The operation is
//! derived from the current flag, the call runs, and only the settled
//! response is applied. A failed call therefore needs no rollback.
//!
//! Mutations on different keys are independent and may settle in any order.
//! The last response received for a key wins.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api::ApiError;

/// Which side of a binary relationship a call moves the entity to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToggleOp {
    Activate,
    Deactivate,
}

impl ToggleOp {
    /// The op that flips the current local flag.
    pub fn from_current(active: bool) -> Self {
        if active {
            ToggleOp::Deactivate
        } else {
            ToggleOp::Activate
        }
    }

    /// Flag value the entity should hold once the op succeeds.
    pub fn target(self) -> bool {
        matches!(self, ToggleOp::Activate)
    }
}

/// State of one entity key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase<Op> {
    Idle,
    Pending(Op),
}

/// How a coordinated call ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Settlement<T> {
    Settled(T),
    Failed(ApiError),
    /// Another call for the same key was in flight; nothing was sent.
    Skipped,
}

impl<T> Settlement<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, Settlement::Settled(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Settlement::Skipped)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Settlement::Failed(err) => Some(err),
            _ => None,
        }
    }
}

type InFlight<K, Op> = Arc<Mutex<HashMap<K, Op>>>;

/// Per-key in-flight guard. Clones share the same map.
#[derive(Debug)]
pub struct MutationCoordinator<K, Op> {
    in_flight: InFlight<K, Op>,
}

impl<K, Op> Clone for MutationCoordinator<K, Op> {
    fn clone(&self) -> Self {
        Self {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<K, Op> Default for MutationCoordinator<K, Op> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

fn lock<K, Op>(in_flight: &InFlight<K, Op>) -> MutexGuard<'_, HashMap<K, Op>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K, Op> MutationCoordinator<K, Op>
where
    K: Clone + Eq + Hash + Debug,
    Op: Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, key: &K) -> Phase<Op> {
        match lock(&self.in_flight).get(key) {
            Some(op) => Phase::Pending(op.clone()),
            None => Phase::Idle,
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.in_flight).contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn begin(&self, key: &K, op: &Op) -> Option<PendingGuard<K, Op>> {
        let mut map = lock(&self.in_flight);
        if map.contains_key(key) {
            return None;
        }
        map.insert(key.clone(), op.clone());
        Some(PendingGuard {
            in_flight: Arc::clone(&self.in_flight),
            key: key.clone(),
        })
    }

    /// Run `call` for `key` unless a call for that key is already pending.
    ///
    /// The key returns to idle when the call settles, or when this future is
    /// dropped before it does.
    pub async fn run<T, F, Fut>(&self, key: K, op: Op, call: F) -> Settlement<T>
    where
        F: FnOnce(Op) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(_pending) = self.begin(&key, &op) else {
            tracing::debug!(?key, ?op, "mutation already in flight, skipped");
            return Settlement::Skipped;
        };

        match call(op).await {
            Ok(value) => Settlement::Settled(value),
            Err(err) => {
                tracing::warn!(?key, error = %err, "mutation failed");
                Settlement::Failed(err)
            }
        }
    }
}

struct PendingGuard<K: Eq + Hash, Op> {
    in_flight: InFlight<K, Op>,
    key: K,
}

impl<K: Eq + Hash, Op> Drop for PendingGuard<K, Op> {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn test_op_is_derived_from_current_flag() {
        assert_eq!(ToggleOp::from_current(false), ToggleOp::Activate);
        assert_eq!(ToggleOp::from_current(true), ToggleOp::Deactivate);
        assert!(ToggleOp::Activate.target());
        assert!(!ToggleOp::Deactivate.target());
    }

    #[tokio::test]
    async fn test_second_run_on_pending_key_is_skipped() {
        let coordinator: MutationCoordinator<&str, ToggleOp> = MutationCoordinator::new();
        let calls = Cell::new(0);
        let (release, gate) = oneshot::channel::<()>();

        let first = coordinator.run("ben", ToggleOp::Activate, |_| async {
            calls.set(calls.get() + 1);
            gate.await.ok();
            Ok::<_, ApiError>(11u64)
        });
        let second = async {
            tokio::task::yield_now().await;
            assert_eq!(coordinator.phase(&"ben"), Phase::Pending(ToggleOp::Activate));
            let skipped = coordinator
                .run("ben", ToggleOp::Activate, |_| async {
                    calls.set(calls.get() + 1);
                    Ok::<_, ApiError>(12u64)
                })
                .await;
            release.send(()).ok();
            skipped
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, Settlement::Settled(11));
        assert!(second.is_skipped());
        assert_eq!(calls.get(), 1);
        assert_eq!(coordinator.phase(&"ben"), Phase::Idle);
    }

    #[tokio::test]
    async fn test_different_keys_run_concurrently() {
        let coordinator: MutationCoordinator<u64, ToggleOp> = MutationCoordinator::new();
        let (a, b) = tokio::join!(
            coordinator.run(1, ToggleOp::Activate, |_| async { Ok::<_, ApiError>(1) }),
            coordinator.run(2, ToggleOp::Deactivate, |_| async { Ok::<_, ApiError>(2) }),
        );
        assert!(a.is_settled() && b.is_settled());
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_clears_pending() {
        let coordinator: MutationCoordinator<u64, ToggleOp> = MutationCoordinator::new();
        let out = coordinator
            .run(7, ToggleOp::Activate, |_| async {
                Err::<(), _>(ApiError::Unavailable("Failed to like post".to_string()))
            })
            .await;
        assert_eq!(out.error().unwrap().message(), "Failed to like post");
        assert!(!coordinator.is_pending(&7));
    }

    #[tokio::test]
    async fn test_dropped_call_clears_pending() {
        let coordinator: MutationCoordinator<u64, ToggleOp> = MutationCoordinator::new();
        let (_release, gate) = oneshot::channel::<()>();
        {
            let fut = coordinator.run(3, ToggleOp::Activate, |_| async {
                gate.await.ok();
                Ok::<_, ApiError>(())
            });
            tokio::pin!(fut);
            let polled = futures_poll_once(fut.as_mut()).await;
            assert!(polled.is_none());
            assert!(coordinator.is_pending(&3));
        }
        assert!(!coordinator.is_pending(&3));
    }

    async fn futures_poll_once<F: Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }
}
