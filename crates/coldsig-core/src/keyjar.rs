//! Handle-indexed key custody
//!
//! The key jar is the only component that holds raw secret key material
//! long-term. Wallet and transaction code never receives key bytes; it
//! receives a nonzero 64-bit handle, and trades it back for a short-lived
//! borrow when a collaborator actually needs the key. Removing the handle
//! revokes access and zeroes the bytes.
//!
//! One mutex serialises every operation. Contention is negligible — the
//! dominant cost of `store` is drawing the handle, not holding the lock —
//! and the lock doubles as the guard that makes [`KeyGuard`] sound: a key
//! cannot be removed while a borrow of it is alive.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::keystore::KeyStore;
use crate::memory::LockedBuffer;
use crate::{KeyHandle, SeedHandle};

/// Entries idle longer than this become eviction candidates.
const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(15 * 60);

/// Eviction never shrinks the jar below this many entries.
const DEFAULT_KEEP_AT_LEAST: usize = 32;

struct KeyEntry {
    key: LockedBuffer,
    label: Option<String>,
    seed: Option<SeedHandle>,
    access_count: u64,
    last_used: Instant,
}

struct JarInner {
    entries: HashMap<KeyHandle, KeyEntry>,
}

/// Thread-safe, handle-indexed store of secret keys.
///
/// Constructed explicitly and passed by reference to whatever needs key
/// custody; each test gets its own fresh jar.
pub struct KeyJar {
    inner: Mutex<JarInner>,
    max_idle: Duration,
    keep_at_least: usize,
}

impl KeyJar {
    pub fn new() -> Self {
        Self::with_policy(DEFAULT_MAX_IDLE, DEFAULT_KEEP_AT_LEAST)
    }

    /// A jar with an explicit eviction policy: entries idle longer than
    /// `max_idle` are dropped by the cleanup pass, but never below
    /// `keep_at_least` total entries.
    pub fn with_policy(max_idle: Duration, keep_at_least: usize) -> Self {
        Self {
            inner: Mutex::new(JarInner {
                entries: HashMap::new(),
            }),
            max_idle,
            keep_at_least,
        }
    }

    fn lock(&self) -> MutexGuard<'_, JarInner> {
        // A poisoned jar still holds valid entries; keep serving them.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a copy of `key` and return a fresh handle for it.
    ///
    /// Storing the same (key bytes, label) pair again returns the existing
    /// handle instead of duplicating the key.
    pub fn store(&self, key: &KeyStore, label: Option<&str>) -> KeyHandle {
        self.store_entry(key, label, None)
    }

    /// Like [`store`](Self::store), additionally recording which seed the
    /// key belongs to. The reference is weak: the jar never owns the seed.
    pub fn store_for_seed(
        &self,
        key: &KeyStore,
        label: Option<&str>,
        seed: SeedHandle,
    ) -> KeyHandle {
        self.store_entry(key, label, Some(seed))
    }

    fn store_entry(
        &self,
        key: &KeyStore,
        label: Option<&str>,
        seed: Option<SeedHandle>,
    ) -> KeyHandle {
        let mut inner = self.lock();

        // Dedup by identity: same bytes under the same label is the same
        // logical key.
        let existing = inner
            .entries
            .iter_mut()
            .find(|(_, e)| e.key.as_slice() == key.as_bytes().as_slice() && e.label.as_deref() == label);
        if let Some((&handle, entry)) = existing {
            entry.last_used = Instant::now();
            if seed.is_some() {
                entry.seed = seed;
            }
            return handle;
        }

        let handle = generate_handle(&inner.entries);
        inner.entries.insert(
            handle,
            KeyEntry {
                key: LockedBuffer::from_slice(key.as_bytes()),
                label: label.map(str::to_owned),
                seed,
                access_count: 0,
                last_used: Instant::now(),
            },
        );
        self.cleanup(&mut inner);
        handle
    }

    /// Borrow the key behind `handle`, or `None` for an unknown or removed
    /// handle. The borrow holds the jar lock, so it cannot outlive the
    /// entry; drop it promptly.
    pub fn get(&self, handle: KeyHandle) -> Option<KeyGuard<'_>> {
        let mut inner = self.lock();
        match inner.entries.get_mut(&handle) {
            Some(entry) => {
                entry.access_count += 1;
                entry.last_used = Instant::now();
            }
            None => return None,
        }
        Some(KeyGuard { inner, handle })
    }

    /// Remove and zero the key behind `handle`. Returns whether anything
    /// was removed.
    pub fn remove(&self, handle: KeyHandle) -> bool {
        self.lock().entries.remove(&handle).is_some()
    }

    pub fn has(&self, handle: KeyHandle) -> bool {
        self.lock().entries.contains_key(&handle)
    }

    /// The label stored with `handle`, if any.
    pub fn label(&self, handle: KeyHandle) -> Option<String> {
        self.lock().entries.get(&handle)?.label.clone()
    }

    /// The handle carrying `label`, if any entry does.
    pub fn find_by_label(&self, label: &str) -> Option<KeyHandle> {
        self.lock()
            .entries
            .iter()
            .find(|(_, e)| e.label.as_deref() == Some(label))
            .map(|(&h, _)| h)
    }

    /// The seed handle recorded for `handle`, if any.
    pub fn seed_of(&self, handle: KeyHandle) -> Option<SeedHandle> {
        self.lock().entries.get(&handle)?.seed
    }

    /// How many times `handle` has been looked up. Observability only.
    pub fn access_count(&self, handle: KeyHandle) -> Option<u64> {
        Some(self.lock().entries.get(&handle)?.access_count)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Opportunistic cleanup, run after each store: drop entries nobody has
    /// touched within the idle window, keeping at least the configured
    /// floor.
    fn cleanup(&self, inner: &mut JarInner) {
        if inner.entries.len() <= self.keep_at_least {
            return;
        }
        let mut idle: Vec<(KeyHandle, Duration)> = inner
            .entries
            .iter()
            .filter_map(|(&h, e)| {
                let idle_for = e.last_used.elapsed();
                (idle_for > self.max_idle).then_some((h, idle_for))
            })
            .collect();
        if idle.is_empty() {
            return;
        }
        // Oldest first, so the floor keeps the most recently used keys.
        idle.sort_by_key(|&(_, idle_for)| std::cmp::Reverse(idle_for));
        let evictable = inner.entries.len() - self.keep_at_least;
        let mut evicted = 0usize;
        for (handle, _) in idle.into_iter().take(evictable) {
            inner.entries.remove(&handle);
            evicted += 1;
        }
        if evicted > 0 {
            debug!("key jar evicted {} idle entries", evicted);
        }
    }
}

impl Default for KeyJar {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_handle(entries: &HashMap<KeyHandle, KeyEntry>) -> KeyHandle {
    // Cryptographically strong draw over the full 64-bit space; collisions
    // are negligible but the loop still rejects 0 and anything in use.
    loop {
        let handle = OsRng.next_u64();
        if handle != 0 && !entries.contains_key(&handle) {
            return handle;
        }
    }
}

/// Scoped borrow of a stored key.
///
/// Holds the jar lock for its lifetime: the underlying key cannot be
/// removed, and the jar cannot be mutated, until the guard is dropped.
pub struct KeyGuard<'a> {
    inner: MutexGuard<'a, JarInner>,
    handle: KeyHandle,
}

impl KeyGuard<'_> {
    /// The borrowed key bytes.
    pub fn bytes(&self) -> &[u8] {
        self.inner.entries[&self.handle].key.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> KeyStore {
        KeyStore::from_bytes([byte; 32])
    }

    #[test]
    fn test_store_and_get() {
        let jar = KeyJar::new();
        let handle = jar.store(&key(1), Some("wallet-1"));
        assert_ne!(handle, 0);
        {
            let guard = jar.get(handle).unwrap();
            assert_eq!(guard.bytes(), &[1u8; 32]);
        }
        assert_eq!(jar.label(handle).as_deref(), Some("wallet-1"));
        assert_eq!(jar.access_count(handle), Some(1));
    }

    #[test]
    fn test_dedup_same_key_same_label() {
        let jar = KeyJar::new();
        let first = jar.store(&key(7), Some("a"));
        let second = jar.store(&key(7), Some("a"));
        assert_eq!(first, second);
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_no_dedup_across_labels_or_keys() {
        let jar = KeyJar::new();
        let a = jar.store(&key(7), Some("a"));
        let b = jar.store(&key(7), Some("b"));
        let c = jar.store(&key(8), Some("a"));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn test_remove_revokes_handle() {
        let jar = KeyJar::new();
        let handle = jar.store(&key(3), None);
        assert!(jar.remove(handle));
        assert!(jar.get(handle).is_none());
        assert!(!jar.has(handle));
        assert!(!jar.remove(handle));

        // A fresh store never reuses the removed handle by accident.
        let fresh = jar.store(&key(4), None);
        assert_ne!(fresh, 0);
        assert_ne!(fresh, handle);
    }

    #[test]
    fn test_unknown_handle_is_absent() {
        let jar = KeyJar::new();
        assert!(jar.get(0).is_none());
        assert!(jar.get(42).is_none());
        assert!(!jar.has(42));
        assert_eq!(jar.access_count(42), None);
    }

    #[test]
    fn test_access_count_increments() {
        let jar = KeyJar::new();
        let handle = jar.store(&key(5), None);
        assert_eq!(jar.access_count(handle), Some(0));
        for expected in 1..=3u64 {
            drop(jar.get(handle));
            assert_eq!(jar.access_count(handle), Some(expected));
        }
    }

    #[test]
    fn test_find_by_label() {
        let jar = KeyJar::new();
        let handle = jar.store(&key(9), Some("spend"));
        assert_eq!(jar.find_by_label("spend"), Some(handle));
        assert_eq!(jar.find_by_label("view"), None);
    }

    #[test]
    fn test_seed_back_reference() {
        let jar = KeyJar::new();
        let plain = jar.store(&key(1), None);
        assert_eq!(jar.seed_of(plain), None);
        let linked = jar.store_for_seed(&key(2), None, 99);
        assert_eq!(jar.seed_of(linked), Some(99));
    }

    #[test]
    fn test_cleanup_evicts_idle_entries() {
        // Tight policy: anything idle > 50 ms goes, no floor.
        let jar = KeyJar::with_policy(Duration::from_millis(50), 0);
        let old = jar.store(&key(1), None);
        std::thread::sleep(Duration::from_millis(80));
        let fresh = jar.store(&key(2), None);
        assert!(!jar.has(old), "idle entry should have been evicted");
        assert!(jar.has(fresh));
    }

    #[test]
    fn test_cleanup_respects_floor() {
        let jar = KeyJar::with_policy(Duration::from_millis(10), 16);
        let handles: Vec<_> = (0..8).map(|i| jar.store(&key(i), None)).collect();
        std::thread::sleep(Duration::from_millis(40));
        jar.store(&key(200), None);
        // Below the floor, nothing is evicted no matter how idle.
        for handle in handles {
            assert!(jar.has(handle));
        }
    }

    #[test]
    fn test_concurrent_store_and_get() {
        use std::sync::Arc;
        let jar = Arc::new(KeyJar::new());
        let mut threads = Vec::new();
        for t in 0..4u8 {
            let jar = Arc::clone(&jar);
            threads.push(std::thread::spawn(move || {
                let mut handles = Vec::new();
                for i in 0..16u8 {
                    handles.push(jar.store(&key(t * 16 + i), None));
                }
                for handle in handles {
                    assert!(jar.get(handle).is_some());
                }
            }));
        }
        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(jar.len(), 64);
    }
}
