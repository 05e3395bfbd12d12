use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as KeyMutex, OwnedMutexGuard};

/// A registry of per-key exclusive locks, created on demand and reclaimed
/// once the last interested task drops its guard.
///
/// One lock per *currently active* key keeps unrelated keys fully parallel
/// without retaining a lock for every key ever seen. The registry's own
/// mutex guards a `key -> (lock, refcount)` map; the refcount covers both
/// the holder and every waiter, and is only touched inside that mutex.
/// Because `acquire` increments the refcount in the same critical section
/// that looks up (or inserts) the entry, a concurrent release can never
/// observe "unused" for a key another task is about to wait on, so two
/// tasks can never end up holding distinct locks for the same key.
#[derive(Default)]
pub struct KeyedLockRegistry {
    entries: Mutex<HashMap<u64, Entry>>,
}

struct Entry {
    lock: Arc<KeyMutex<()>>,
    /// Holder plus waiters. Read and written only under `entries`.
    refs: usize,
}

impl KeyedLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the exclusive lock for `key`, creating it if absent, and
    /// waits until this task holds it. Acquisition order across tasks on
    /// one key is the serialization order of their critical sections.
    pub async fn acquire(&self, key: u64) -> KeyedLockGuard<'_> {
        let lock = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key).or_insert_with(|| Entry {
                lock: Arc::new(KeyMutex::new(())),
                refs: 0,
            });
            entry.refs += 1;
            Arc::clone(&entry.lock)
        };
        let permit = lock.lock_owned().await;
        KeyedLockGuard {
            registry: self,
            key,
            _permit: permit,
        }
    }

    /// Number of live lock entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn release(&self, key: u64) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(&key) {
            entry.refs -= 1;
            if entry.refs == 0 {
                entries.remove(&key);
            }
        }
    }
}

/// An exclusive hold on one key. Dropping it releases the lock and lets
/// the registry reclaim the entry once nobody holds or awaits it.
pub struct KeyedLockGuard<'a> {
    registry: &'a KeyedLockRegistry,
    key: u64,
    _permit: OwnedMutexGuard<()>,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        // Refcount bookkeeping runs before `_permit` unlocks; an entry is
        // only removed when no other task has registered interest in it.
        self.registry.release(self.key);
    }
}
