use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = HashMap<String, Arc<AsyncMutex<()>>>;

#[derive(Debug, Clone, Default)]
/// Serializes moderator adds that target the same comment.
pub struct CommentLockRegistry {
    locks: Arc<Mutex<LockTable>>,
}

impl CommentLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder owns `key`.
    pub async fn acquire(&self, key: &str) -> CommentLockGuard {
        let lock = {
            let mut table = self.table();
            Arc::clone(table.entry(key.to_string()).or_default())
        };
        let guard = lock.lock_owned().await;
        CommentLockGuard {
            key: key.to_string(),
            registry: self.clone(),
            guard: Some(guard),
        }
    }

    pub fn active_keys(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> std::sync::MutexGuard<'_, LockTable> {
        // The table only holds Arcs, so a poisoned guard is still consistent.
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn release(&self, key: &str) {
        let mut table = self.table();
        let idle = table
            .get(key)
            .map(|lock| Arc::strong_count(lock) == 1)
            .unwrap_or(false);
        if idle {
            table.remove(key);
        }
    }
}

#[derive(Debug)]
pub struct CommentLockGuard {
    key: String,
    registry: CommentLockRegistry,
    guard: Option<OwnedMutexGuard<()>>,
}

impl CommentLockGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for CommentLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.registry.release(&self.key);
    }
}
