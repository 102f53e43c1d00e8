//! Cryptographic operations for the notebook.
//!
//! - **kdf**: PBKDF2-HMAC-SHA256 key derivation from the master password
//!   and the per-store salt
//! - **cipher**: XChaCha20-Poly1305 authenticated encryption of single fields
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the notebook database file
//! - Offline brute-force attacks on the password (slow KDF, random salt)
//! - Tampering with stored ciphertext (AEAD tag)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked process's memory

pub mod cipher;
pub mod kdf;

pub use cipher::{decrypt, encrypt};
pub use kdf::{derive_key, new_salt, DerivedKey, Salt, KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};
