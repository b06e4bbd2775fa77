//! Chain height / timestamp estimation boundary
//!
//! A seed's creation point has two equivalent coordinates: a wall-clock
//! birthday and a chain height. Converting between them needs network
//! knowledge this core does not own, so the conversion lives behind
//! [`ChainClock`] and is computed on demand — derived values are never
//! written back into a seed, to avoid staleness if network parameters
//! change.

use crate::Network;

/// Network height/timestamp estimation collaborator.
pub trait ChainClock: Send + Sync {
    /// Estimated chain height at `timestamp` (unix seconds).
    fn height_from_timestamp(&self, timestamp: u64, network: Network) -> u64;

    /// Estimated unix timestamp of `height`.
    fn timestamp_from_height(&self, height: u64, network: Network) -> u64;
}

/// Target seconds between blocks.
const TARGET_SPACING: u64 = 120;

fn genesis_timestamp(network: Network) -> u64 {
    match network {
        Network::Main => 1_397_818_193,
        Network::Test => 1_410_295_020,
        Network::Stage => 1_518_932_025,
    }
}

/// Default estimator: linear extrapolation from each network's genesis at
/// the target block spacing. Good to a few days over the chain's life,
/// which is all a restore height needs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearClock;

impl ChainClock for LinearClock {
    fn height_from_timestamp(&self, timestamp: u64, network: Network) -> u64 {
        timestamp.saturating_sub(genesis_timestamp(network)) / TARGET_SPACING
    }

    fn timestamp_from_height(&self, height: u64, network: Network) -> u64 {
        genesis_timestamp(network).saturating_add(height.saturating_mul(TARGET_SPACING))
    }
}
