//! Custody context
//!
//! The original design reached its jars through process-wide singletons.
//! Here the jars and the chain clock travel together in one explicitly
//! constructed context, passed by reference to whatever needs seed or key
//! custody — call sites stay ergonomic, and every test gets a fresh,
//! isolated context.

use std::sync::Arc;

use crate::height::{ChainClock, LinearClock};
use crate::keyjar::KeyJar;
use crate::memory;
use crate::seed::{Seed, SeedError};
use crate::seedjar::SeedJar;
use crate::{KeyHandle, SeedHandle};

/// Jars plus the chain clock, owned together.
pub struct Custody {
    pub keys: KeyJar,
    pub seeds: SeedJar,
    clock: Box<dyn ChainClock>,
}

impl Custody {
    /// A context with the default linear chain clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(LinearClock))
    }

    /// A context with a caller-supplied estimator.
    pub fn with_clock(clock: Box<dyn ChainClock>) -> Self {
        // Key material is about to live in this process; make sure a crash
        // cannot write it to disk.
        memory::disable_core_dumps();
        Self {
            keys: KeyJar::new(),
            seeds: SeedJar::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &dyn ChainClock {
        &*self.clock
    }

    /// Register a decrypted seed and its key in one step.
    ///
    /// The seed goes into the seed jar, its key into the key jar labelled
    /// with the fingerprint and back-referencing the seed handle. Returns
    /// both handles.
    pub fn adopt(&self, seed: Seed) -> Result<(SeedHandle, KeyHandle), SeedError> {
        let seed = Arc::new(seed);
        // Fail before touching either jar if the seed is still encrypted.
        let key = seed.key()?;
        let seed_handle = self.seeds.store(&seed);
        let key_handle =
            self.keys
                .store_for_seed(key, Some(seed.fingerprint()), seed_handle);
        Ok((seed_handle, key_handle))
    }
}

impl Default for Custody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monero::MoneroSeed;
    use crate::{Network, SeedType};

    #[test]
    fn test_contexts_are_isolated() {
        let a = Custody::new();
        let b = Custody::new();
        let seed = MoneroSeed::generate(Network::Main);
        let (seed_handle, key_handle) = a.adopt(seed).unwrap();
        assert!(a.seeds.has(seed_handle));
        assert!(a.keys.has(key_handle));
        assert!(!b.seeds.has(seed_handle));
        assert!(!b.keys.has(key_handle));
    }

    #[test]
    fn test_adopt_wires_the_back_reference() {
        let custody = Custody::new();
        let seed = MoneroSeed::generate(Network::Main);
        let fingerprint = seed.fingerprint().to_string();
        let (seed_handle, key_handle) = custody.adopt(seed).unwrap();

        assert_eq!(custody.keys.seed_of(key_handle), Some(seed_handle));
        assert_eq!(custody.keys.label(key_handle).as_deref(), Some(fingerprint.as_str()));
        let registered = custody.seeds.get_by_fingerprint(&fingerprint).unwrap();
        assert_eq!(registered.fingerprint(), fingerprint);
    }

    #[test]
    fn test_adopt_rejects_encrypted_seed() {
        let custody = Custody::new();
        let mut seed = MoneroSeed::generate(Network::Main);
        seed.encrypt("password for transport").unwrap();
        let err = custody.adopt(seed).unwrap_err();
        assert_eq!(err, SeedError::Encrypted);
        assert!(custody.seeds.is_empty());
        assert!(custody.keys.is_empty());
    }

    #[test]
    fn test_clock_is_injectable() {
        struct FixedClock;
        impl ChainClock for FixedClock {
            fn height_from_timestamp(&self, _: u64, _: crate::Network) -> u64 {
                7
            }
            fn timestamp_from_height(&self, _: u64, _: crate::Network) -> u64 {
                42
            }
        }
        let custody = Custody::with_clock(Box::new(FixedClock));
        let seed = MoneroSeed::create(b"clock", Network::Main, 1);
        assert_eq!(seed.height(custody.clock()), 7);
        assert_eq!(seed.seed_type(), SeedType::Monero);
    }
}
