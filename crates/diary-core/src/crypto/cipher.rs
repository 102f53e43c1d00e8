//! Field-level authenticated encryption with XChaCha20-Poly1305.
//!
//! Every blob is self-describing:
//!
//! ```text
//! +---------+------------------+------------------------+
//! | version | nonce (24 bytes) | ciphertext || tag (16) |
//! +---------+------------------+------------------------+
//! ```
//!
//! The 24-byte nonce is random per call, so encrypting the same plaintext
//! twice never yields the same blob.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use zeroize::Zeroizing;

use super::kdf::DerivedKey;
use crate::error::{DiaryError, Result};

/// Current blob format version.
pub const FORMAT_VERSION: u8 = 1;

pub const NONCE_LEN: usize = 24;
pub const TAG_LEN: usize = 16;

/// Smallest well-formed blob: header plus tag of an empty plaintext.
pub const MIN_BLOB_LEN: usize = 1 + NONCE_LEN + TAG_LEN;

/// Associated data binding blobs to this format.
const AAD: &[u8] = b"secret-diary/field/v1";

/// Encrypt a single field under `key`.
///
/// # Errors
///
/// Returns `DiaryError::RandomnessUnavailable` if a nonce cannot be drawn.
///
/// # Examples
///
/// ```
/// use diary_core::crypto::{decrypt, derive_key, encrypt, Salt};
///
/// let key = derive_key("pw", &Salt::from_bytes([7; 16]));
/// let blob = encrypt(&key, b"Diary").unwrap();
/// assert_eq!(&*decrypt(&key, &blob).unwrap(), b"Diary");
/// ```
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| DiaryError::Crypto(format!("Invalid key length: {}", e)))?;

    let mut nonce = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| DiaryError::RandomnessUnavailable(e.to_string()))?;

    let sealed = cipher
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: AAD,
            },
        )
        .map_err(|_| DiaryError::Crypto("Encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(1 + NONCE_LEN + sealed.len());
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns `DiaryError::Decryption` for a wrong key, any modified byte, a
/// truncated blob, or an unknown format version. No partial plaintext is
/// ever returned.
pub fn decrypt(key: &DerivedKey, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if blob.len() < MIN_BLOB_LEN || blob[0] != FORMAT_VERSION {
        return Err(DiaryError::Decryption);
    }
    let (nonce, sealed) = blob[1..].split_at(NONCE_LEN);

    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| DiaryError::Crypto(format!("Invalid key length: {}", e)))?;

    let plaintext = cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: sealed,
                aad: AAD,
            },
        )
        .map_err(|_| DiaryError::Decryption)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::KEY_LENGTH;

    fn key(fill: u8) -> DerivedKey {
        DerivedKey::from_bytes([fill; KEY_LENGTH])
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let k = key(1);
        let plaintext = b"Today was fine";

        let blob = encrypt(&k, plaintext).unwrap();
        let decrypted = decrypt(&k, &blob).unwrap();

        assert_eq!(&*decrypted, plaintext);
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let k = key(1);
        let blob = encrypt(&k, b"").unwrap();
        assert_eq!(blob.len(), MIN_BLOB_LEN);
        assert!(decrypt(&k, &blob).unwrap().is_empty());
    }

    #[test]
    fn test_encryption_is_not_deterministic() {
        let k = key(2);
        let a = encrypt(&k, b"same title").unwrap();
        let b = encrypt(&k, b"same title").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_blob_does_not_contain_plaintext() {
        let k = key(2);
        let blob = encrypt(&k, b"PLAINTEXT_MARKER_123").unwrap();
        let haystack = String::from_utf8_lossy(&blob);
        assert!(!haystack.contains("PLAINTEXT_MARKER_123"));
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = encrypt(&key(3), b"secret").unwrap();
        let result = decrypt(&key(4), &blob);
        assert!(matches!(result, Err(DiaryError::Decryption)));
    }

    #[test]
    fn test_every_single_bit_flip_fails() {
        let k = key(5);
        let blob = encrypt(&k, b"tamper me").unwrap();
        for byte in 0..blob.len() {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    matches!(decrypt(&k, &tampered), Err(DiaryError::Decryption)),
                    "flip of byte {} bit {} was not detected",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_truncated_blob_fails() {
        let k = key(6);
        let blob = encrypt(&k, b"truncate").unwrap();
        assert!(matches!(
            decrypt(&k, &blob[..blob.len() - 1]),
            Err(DiaryError::Decryption)
        ));
        assert!(matches!(decrypt(&k, &[]), Err(DiaryError::Decryption)));
    }

    #[test]
    fn test_blob_layout() {
        let blob = encrypt(&key(7), b"abc").unwrap();
        assert_eq!(blob[0], FORMAT_VERSION);
        assert_eq!(blob.len(), 1 + NONCE_LEN + 3 + TAG_LEN);
    }
}
