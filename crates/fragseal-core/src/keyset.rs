//! Keysets: opaque containers for a single asymmetric key.
//!
//! A keyset carries a stable key id, an algorithm tag, a material type
//! (public or private), and the raw key bytes. The JSON form is what gets
//! stored on disk or in the environment:
//!
//! ```json
//! {
//!   "keyId": 2874140917,
//!   "algorithm": "X25519_BLAKE3_CHACHA20POLY1305",
//!   "materialType": "ASYMMETRIC_PUBLIC",
//!   "value": "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo="
//! }
//! ```
//!
//! Keysets are immutable once constructed. Interpreting the key bytes is the
//! job of the crypto crate; this module only checks shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::encoding::base64_bytes;
use crate::error::{EnvelopeError, Result};

/// Identifier of the key inside a keyset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub u32);

impl KeyId {
    /// Create from a raw value.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Big-endian bytes, as embedded in ciphertext prefixes.
    pub const fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_be_bytes())
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.to_hex())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<u32> for KeyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Algorithm a keyset is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// X25519 key agreement, BLAKE3 key derivation, ChaCha20-Poly1305 DEM.
    #[serde(rename = "X25519_BLAKE3_CHACHA20POLY1305")]
    X25519Blake3ChaCha20Poly1305,
}

impl KeyAlgorithm {
    /// Length of the raw key value for this algorithm.
    pub const fn key_len(&self) -> usize {
        match self {
            KeyAlgorithm::X25519Blake3ChaCha20Poly1305 => 32,
        }
    }
}

/// Whether a keyset holds public or private material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyMaterialType {
    AsymmetricPublic,
    AsymmetricPrivate,
}

/// A single-key keyset.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyset {
    key_id: KeyId,
    algorithm: KeyAlgorithm,
    material_type: KeyMaterialType,
    #[serde(with = "base64_bytes")]
    value: Vec<u8>,
}

impl Keyset {
    /// Build a public keyset, checking the value length against the algorithm.
    pub fn public(key_id: KeyId, algorithm: KeyAlgorithm, value: Vec<u8>) -> Result<Self> {
        Self::new(key_id, algorithm, KeyMaterialType::AsymmetricPublic, value)
    }

    /// Build a private keyset, checking the value length against the algorithm.
    pub fn private(key_id: KeyId, algorithm: KeyAlgorithm, value: Vec<u8>) -> Result<Self> {
        Self::new(key_id, algorithm, KeyMaterialType::AsymmetricPrivate, value)
    }

    fn new(
        key_id: KeyId,
        algorithm: KeyAlgorithm,
        material_type: KeyMaterialType,
        value: Vec<u8>,
    ) -> Result<Self> {
        let keyset = Self {
            key_id,
            algorithm,
            material_type,
            value,
        };
        keyset.validate()?;
        Ok(keyset)
    }

    /// Parse a keyset from its JSON form.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let keyset: Self = serde_json::from_slice(json)
            .map_err(|e| EnvelopeError::KeyManagement(format!("malformed keyset: {e}")))?;
        keyset.validate()?;
        Ok(keyset)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| EnvelopeError::KeyManagement(format!("keyset serialization: {e}")))
    }

    /// Check the value length against the algorithm.
    pub fn validate(&self) -> Result<()> {
        let expected = self.algorithm.key_len();
        if self.value.len() != expected {
            return Err(EnvelopeError::KeyManagement(format!(
                "keyset {} has invalid key length: expected {expected}, got {}",
                self.key_id,
                self.value.len()
            )));
        }
        Ok(())
    }

    /// Fail unless this keyset holds public material.
    pub fn require_public(&self) -> Result<()> {
        match self.material_type {
            KeyMaterialType::AsymmetricPublic => Ok(()),
            KeyMaterialType::AsymmetricPrivate => Err(EnvelopeError::KeyManagement(format!(
                "keyset {} holds private material where a public key is required",
                self.key_id
            ))),
        }
    }

    /// Fail unless this keyset holds private material.
    pub fn require_private(&self) -> Result<()> {
        match self.material_type {
            KeyMaterialType::AsymmetricPrivate => Ok(()),
            KeyMaterialType::AsymmetricPublic => Err(EnvelopeError::KeyManagement(format!(
                "keyset {} holds public material where a private key is required",
                self.key_id
            ))),
        }
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn material_type(&self) -> KeyMaterialType {
        self.material_type
    }

    pub fn is_private(&self) -> bool {
        self.material_type == KeyMaterialType::AsymmetricPrivate
    }

    /// Raw key bytes.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl fmt::Debug for Keyset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Keyset");
        s.field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .field("material_type", &self.material_type);
        if self.is_private() {
            s.field("value", &"<redacted>");
        } else {
            s.field("value", &hex::encode(&self.value));
        }
        s.finish()
    }
}

impl Drop for Keyset {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALG: KeyAlgorithm = KeyAlgorithm::X25519Blake3ChaCha20Poly1305;

    #[test]
    fn test_keyset_json_roundtrip() {
        let keyset = Keyset::public(KeyId::new(7), ALG, vec![0x42; 32]).unwrap();
        let json = keyset.to_json().unwrap();
        assert!(json.contains("\"materialType\":\"ASYMMETRIC_PUBLIC\""));
        assert!(json.contains("\"algorithm\":\"X25519_BLAKE3_CHACHA20POLY1305\""));

        let recovered = Keyset::from_json(json.as_bytes()).unwrap();
        assert_eq!(keyset, recovered);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = Keyset::public(KeyId::new(1), ALG, vec![0u8; 31]).unwrap_err();
        assert!(matches!(err, EnvelopeError::KeyManagement(_)));

        let json = r#"{"keyId":1,"algorithm":"X25519_BLAKE3_CHACHA20POLY1305","materialType":"ASYMMETRIC_PUBLIC","value":"AAAA"}"#;
        let err = Keyset::from_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, EnvelopeError::KeyManagement(_)));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let json = r#"{"keyId":1,"algorithm":"RSA_OAEP","materialType":"ASYMMETRIC_PUBLIC","value":"AAAA"}"#;
        let err = Keyset::from_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, EnvelopeError::KeyManagement(_)));
    }

    #[test]
    fn test_material_type_checks() {
        let public = Keyset::public(KeyId::new(1), ALG, vec![1; 32]).unwrap();
        let private = Keyset::private(KeyId::new(1), ALG, vec![1; 32]).unwrap();

        assert!(public.require_public().is_ok());
        assert!(public.require_private().is_err());
        assert!(private.require_private().is_ok());
        assert!(private.require_public().is_err());
    }

    #[test]
    fn test_debug_redacts_private_material() {
        let private = Keyset::private(KeyId::new(0xdeadbeef), ALG, vec![0xab; 32]).unwrap();
        let debug = format!("{:?}", private);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("abab"));
        assert!(debug.contains("deadbeef"));
    }
}
