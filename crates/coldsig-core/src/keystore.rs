//! Opaque secret key holder
//!
//! `KeyStore` owns exactly one 32-byte secret scalar and is the only value
//! type cryptographic collaborators accept, keeping the concrete key
//! representation out of every public seed and wallet interface. It performs
//! no validation — whether the bytes are a meaningful key is the decoding
//! algorithm's business, not the container's.

use zeroize::Zeroizing;

/// Owner of one 32-byte secret scalar.
///
/// Not `Clone`: duplicating custody of secret material is forbidden. The
/// default value is the all-zero placeholder used before a decode fills it.
/// Bytes are zeroed on drop.
#[derive(Default)]
pub struct KeyStore {
    key: Zeroizing<[u8; 32]>,
}

impl KeyStore {
    /// Take ownership of raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(bytes),
        }
    }

    /// View of the key bytes for cryptographic collaborators.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Whether this is still the uninitialised placeholder.
    pub fn is_zero(&self) -> bool {
        self.key.iter().all(|&b| b == 0)
    }
}

impl From<[u8; 32]> for KeyStore {
    fn from(bytes: [u8; 32]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl PartialEq for KeyStore {
    fn eq(&self, other: &Self) -> bool {
        *self.key == *other.key
    }
}

impl Eq for KeyStore {}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key bytes.
        f.write_str("KeyStore(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_placeholder() {
        let store = KeyStore::default();
        assert!(store.is_zero());
        assert_eq!(store.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn test_from_bytes_owns_the_value() {
        let bytes = [7u8; 32];
        let store = KeyStore::from_bytes(bytes);
        assert!(!store.is_zero());
        assert_eq!(store.as_bytes(), &bytes);
    }

    #[test]
    fn test_equality_is_by_bytes() {
        let a = KeyStore::from_bytes([1u8; 32]);
        let b = KeyStore::from_bytes([1u8; 32]);
        let c = KeyStore::from_bytes([2u8; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_debug_redacts_key() {
        let store = KeyStore::from_bytes([0xAB; 32]);
        let printed = format!("{:?}", store);
        assert!(!printed.contains("171"));
        assert!(!printed.to_lowercase().contains("ab"));
        assert_eq!(printed, "KeyStore(..)");
    }
}
