//! Handle- and fingerprint-indexed seed registry
//!
//! Keeps decoded seeds addressable for the life of a session: a UI lists
//! known seeds, picks one by handle or by its display fingerprint, and the
//! jar hands back a shared reference. Ownership is shared — the jar and any
//! external holder keep the seed alive together, and the underlying key is
//! zeroed when the last reference drops.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::seed::Seed;
use crate::{ErrorKind, SeedHandle};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedJarError {
    #[error("seed not found")]
    NotFound,
}

impl SeedJarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::OutOfRange,
        }
    }
}

struct SeedEntry {
    handle: SeedHandle,
    seed: Arc<Seed>,
}

struct SeedJarInner {
    // Insertion order, the stable order list() reports.
    entries: Vec<SeedEntry>,
    by_handle: HashMap<SeedHandle, usize>,
    by_fingerprint: HashMap<String, usize>,
}

/// Thread-safe registry of seeds, indexed by handle and by fingerprint.
///
/// Constructed explicitly; tests and embedders each get their own jar.
pub struct SeedJar {
    inner: Mutex<SeedJarInner>,
}

impl SeedJar {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SeedJarInner {
                entries: Vec::new(),
                by_handle: HashMap::new(),
                by_fingerprint: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SeedJarInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `seed` and return its handle.
    ///
    /// Registering the same seed object again returns the existing handle
    /// without duplicating storage. Distinct seeds are not expected to
    /// collide on fingerprint; if they ever do, fingerprint lookup keeps
    /// returning the first-registered seed.
    pub fn store(&self, seed: &Arc<Seed>) -> SeedHandle {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.iter().find(|e| Arc::ptr_eq(&e.seed, seed)) {
            return entry.handle;
        }

        let handle = loop {
            let candidate = OsRng.next_u64();
            if candidate != 0 && !inner.by_handle.contains_key(&candidate) {
                break candidate;
            }
        };
        let index = inner.entries.len();
        let fingerprint = seed.fingerprint().to_string();
        inner.entries.push(SeedEntry {
            handle,
            seed: Arc::clone(seed),
        });
        inner.by_handle.insert(handle, index);
        match inner.by_fingerprint.entry(fingerprint) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(index);
            }
            std::collections::hash_map::Entry::Occupied(slot) => {
                warn!(
                    "fingerprint collision on {}; lookup keeps the first-registered seed",
                    slot.key()
                );
            }
        }
        handle
    }

    /// The seed behind `handle`.
    pub fn get(&self, handle: SeedHandle) -> Result<Arc<Seed>, SeedJarError> {
        let inner = self.lock();
        let index = *inner.by_handle.get(&handle).ok_or(SeedJarError::NotFound)?;
        Ok(Arc::clone(&inner.entries[index].seed))
    }

    /// The seed displaying `fingerprint`.
    pub fn get_by_fingerprint(&self, fingerprint: &str) -> Result<Arc<Seed>, SeedJarError> {
        let inner = self.lock();
        let index = *inner
            .by_fingerprint
            .get(fingerprint)
            .ok_or(SeedJarError::NotFound)?;
        Ok(Arc::clone(&inner.entries[index].seed))
    }

    pub fn has(&self, handle: SeedHandle) -> bool {
        self.lock().by_handle.contains_key(&handle)
    }

    pub fn has_fingerprint(&self, fingerprint: &str) -> bool {
        self.lock().by_fingerprint.contains_key(fingerprint)
    }

    /// Snapshot of every registered seed, in registration order.
    pub fn list(&self) -> Vec<Arc<Seed>> {
        self.lock()
            .entries
            .iter()
            .map(|e| Arc::clone(&e.seed))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl Default for SeedJar {
    fn default() -> Self {
        Self::new()
    }
}
