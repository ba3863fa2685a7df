//! Symmetric cipher for fragment payloads.
//!
//! AES-128-GCM with no associated data. Every call draws a fresh 96-bit
//! nonce and prepends it, so a ciphertext is self-contained:
//!
//! ```text
//! nonce (12) || ciphertext || tag (16)
//! ```

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Nonce,
};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use fragseal_core::encoding;
use fragseal_core::{EnvelopeError, Result, WrappedKeyPayload};

use crate::crypto::fill_random;

/// Content key size in bytes (AES-128).
pub const CONTENT_KEY_SIZE: usize = 16;

/// GCM nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// GCM tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// A single-use symmetric key for one fragment.
///
/// Not `Clone`: the one value created per operation is lent to every wrap
/// step and wiped when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ContentKey([u8; CONTENT_KEY_SIZE]);

impl ContentKey {
    /// Generate a new random key.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; CONTENT_KEY_SIZE];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; CONTENT_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; CONTENT_KEY_SIZE] = bytes.try_into().map_err(|_| {
            EnvelopeError::KeyManagement(format!(
                "invalid content key length: expected {CONTENT_KEY_SIZE}, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Recover the key embedded in an unwrapped payload.
    pub fn from_wrapped_payload(payload: &WrappedKeyPayload) -> Result<Self> {
        let mut bytes = payload.key_bytes()?;
        let key = Self::from_slice(&bytes).map_err(|_| {
            EnvelopeError::CorruptPayload(format!(
                "embedded key has length {}, expected {CONTENT_KEY_SIZE}",
                bytes.len()
            ))
        });
        bytes.zeroize();
        key
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; CONTENT_KEY_SIZE] {
        &self.0
    }

    /// Standard base64 of the raw bytes.
    pub fn to_base64(&self) -> String {
        encoding::encode_standard(&self.0)
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentKey(<redacted>)")
    }
}

impl PartialEq for ContentKey {
    fn eq(&self, other: &Self) -> bool {
        let mut diff = 0u8;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            diff |= a ^ b;
        }
        diff == 0
    }
}

impl Eq for ContentKey {}

/// Encrypt a payload under a content key.
pub fn encrypt_payload(key: &ContentKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes128Gcm::new_from_slice(&key.0)
        .map_err(|e| EnvelopeError::KeyManagement(e.to_string()))?;

    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce)?;

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| EnvelopeError::CryptoOperation(format!("payload encryption failed: {e}")))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt a payload produced by [`encrypt_payload`].
pub fn decrypt_payload(key: &ContentKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
        return Err(EnvelopeError::AuthenticationFailure);
    }

    let cipher = Aes128Gcm::new_from_slice(&key.0)
        .map_err(|e| EnvelopeError::KeyManagement(e.to_string()))?;

    let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| EnvelopeError::AuthenticationFailure)
}
