//! Password-derived masks for seed encryption
//!
//! An encrypted seed must still render as a fixed-width mnemonic phrase, so
//! there is no room for the salt‖nonce‖ciphertext envelope of an
//! authenticated cipher. Instead the secret bits are XOR-masked with an
//! Argon2id-derived stream, and decryption is verified out of band (see the
//! seed types for the two verification schemes).
//!
//! The salt is a fixed per-scheme domain tag: the phrase is the only thing
//! a holder has, so the mask must be recomputable from the password alone.
//! The memory-hard KDF is what stands between a captured phrase and an
//! offline password search.

use argon2::{Algorithm, Argon2, Params, Version};
use log::warn;
use sha2::{Digest, Sha256};

use crate::password;
use crate::seed::SeedError;

/// Argon2id parameters, sized for interactive seed decryption.
const ARGON2_M_COST: u32 = 8192; // 8 MiB
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 1;

const VERIFIER_DOMAIN: &[u8] = b"coldsig/password-verifier/v1";

/// Fill `mask` with Argon2id output for `password` under `salt`.
pub(crate) fn derive_mask(
    password: &str,
    salt: &[u8],
    mask: &mut [u8],
) -> Result<(), SeedError> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(mask.len()))
        .map_err(|e| SeedError::Kdf(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    argon2
        .hash_password_into(password.as_bytes(), salt, mask)
        .map_err(|e| SeedError::Kdf(e.to_string()))
}

/// Short in-memory verifier for fail-closed decryption of seeds encrypted
/// in this session. Never rendered into the phrase.
pub(crate) fn password_verifier(password: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(VERIFIER_DOMAIN);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    let mut verifier = [0u8; 8];
    verifier.copy_from_slice(&digest[..8]);
    verifier
}

/// Log a warning if `password` falls short of the recommended strength.
pub(crate) fn warn_if_weak(password: &str) {
    let analysis = password::estimate_entropy(password);
    if !analysis.meets_minimum {
        warn!(
            "seed encryption password is {:?} (~{:.0} bits); {} bits recommended",
            analysis.strength, analysis.entropy_bits, password::MIN_RECOMMENDED_ENTROPY as u64
        );
    }
}
