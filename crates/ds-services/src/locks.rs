//! Per-key mutual exclusion for read-modify-write sequences.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per store key, created on first use and dropped again
/// once no guard or waiter refers to it.
///
/// Only serializes writers inside this process; several processes sharing a
/// remote store are still last-writer-wins.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    inner: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`. Released when the guard drops.
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let mutex = self.inner.entry(key.to_string()).or_default().clone();
        let guard = mutex.lock_owned().await;
        KeyGuard {
            guard: Some(guard),
            key: key.to_string(),
            locks: self.inner.clone(),
        }
    }

    /// Keys with a live mutex.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Exclusive access to one key. Dropping it unlocks the key and forgets the
/// mutex when nobody else is queued on it.
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Unlock first so the guard's own reference is gone.
        self.guard.take();
        // The map's reference is the only one left when count is 1. Waiters
        // clone under the same shard lock, so they either keep it alive or
        // create a fresh mutex after removal.
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = KeyedLocks::new();
        let guard = locks.lock("likes:a").await;

        let other = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = other.lock("likes:a").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.lock("likes:a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock("likes:b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_keys_are_forgotten() {
        let locks = KeyedLocks::new();
        for i in 0..1000 {
            let _g = locks.lock(&format!("likes:spam-{i}")).await;
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_entry_survives_while_someone_waits() {
        let locks = KeyedLocks::new();
        let guard = locks.lock("comments:a").await;

        let other = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = other.lock("comments:a").await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
