//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! The salt is generated once per store and persisted in the clear; the
//! derived key is never persisted.

use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{DiaryError, Result};

/// PBKDF2 iteration count. Changing it invalidates every existing notebook.
pub const PBKDF2_ITERATIONS: u32 = 200_000;

/// Length of the per-store salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (256-bit key for XChaCha20-Poly1305).
pub const KEY_LENGTH: usize = 32;

/// Random per-store salt.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build a salt from stored bytes, rejecting any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SALT_LENGTH] = bytes.try_into().map_err(|_| {
            DiaryError::Storage(format!(
                "Stored salt has {} bytes, expected {}",
                bytes.len(),
                SALT_LENGTH
            ))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Salt({} bytes)", SALT_LENGTH)
    }
}

/// A cryptographic key derived from the master password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password using PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same password and salt always produce the same key.
/// An empty password is accepted and yields a weak but valid key; password
/// policy belongs to the caller.
///
/// # Examples
///
/// ```
/// use diary_core::crypto::{derive_key, Salt};
///
/// let salt = Salt::from_bytes(*b"0123456789abcdef");
/// let key = derive_key("my-password", &salt);
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(password: &str, salt: &Salt) -> DerivedKey {
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key_bytes,
    );
    DerivedKey::from_bytes(key_bytes)
}

/// Generate a fresh salt from the OS randomness source.
///
/// # Errors
///
/// Returns `DiaryError::RandomnessUnavailable` if the OS source fails.
pub fn new_salt() -> Result<Salt> {
    let mut bytes = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| DiaryError::RandomnessUnavailable(e.to_string()))?;
    Ok(Salt(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salt(fill: u8) -> Salt {
        Salt::from_bytes([fill; SALT_LENGTH])
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive_key("test-password", &salt(7));
        let key2 = derive_key("test-password", &salt(7));
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("test-password", &salt(1));
        let key2 = derive_key("test-password", &salt(2));
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let key1 = derive_key("password-one", &salt(3));
        let key2 = derive_key("password-two", &salt(3));
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_allowed() {
        let key1 = derive_key("", &salt(4));
        let key2 = derive_key("", &salt(4));
        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_eq!(key1.as_bytes().len(), KEY_LENGTH);
    }

    #[test]
    fn test_matches_reference_pbkdf2() {
        // Independent computation with the same primitive and parameters.
        let mut expected = [0u8; KEY_LENGTH];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"pw", &[9u8; SALT_LENGTH], 200_000, &mut expected);
        let key = derive_key("pw", &salt(9));
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn test_iteration_count_resists_brute_force() {
        assert!(PBKDF2_ITERATIONS >= 100_000);
    }

    #[test]
    fn test_new_salt_is_random() {
        let a = new_salt().unwrap();
        let b = new_salt().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_salt_from_slice_rejects_wrong_length() {
        assert!(Salt::from_slice(&[0u8; 15]).is_err());
        assert!(Salt::from_slice(&[0u8; 17]).is_err());
        assert!(Salt::from_slice(&[0u8; 16]).is_ok());
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("test-password", &salt(5));
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
