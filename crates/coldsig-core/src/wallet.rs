//! Wallet handoff
//!
//! The wallet/transaction layer lives outside this core; all it may receive
//! from here is a key and a restore height. `Wallet` is that handoff: built
//! from a decrypted seed, and best consumed by registering the key into a
//! [`KeyJar`] so downstream code works with a revocable handle instead of
//! holding bytes.

use crate::keyjar::KeyJar;
use crate::keystore::KeyStore;
use crate::KeyHandle;

/// A key plus its restore height, ready for the wallet layer.
#[derive(Debug)]
pub struct Wallet {
    key: KeyStore,
    height: u64,
}

impl Wallet {
    pub(crate) fn new(key: KeyStore, height: u64) -> Self {
        Self { key, height }
    }

    /// Chain height to start scanning from.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// The spend key. Prefer [`register`](Self::register) over passing this
    /// around.
    pub fn key(&self) -> &KeyStore {
        &self.key
    }

    /// Put the key into custody and return the handle downstream code
    /// should hold instead of the key.
    pub fn register(&self, jar: &KeyJar, label: Option<&str>) -> KeyHandle {
        jar.store(&self.key, label)
    }
}
