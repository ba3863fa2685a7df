//! Key agreement and key-wrapping primitives.
//!
//! Provides X25519 key agreement, BLAKE3 key derivation, and the
//! ChaCha20-Poly1305 cipher used as the DEM of the hybrid scheme.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use fragseal_core::{EnvelopeError, Result};

/// Context string for wrap-key derivation.
const WRAP_KEY_CONTEXT: &str = "fragseal hybrid v1 wrap key";

/// Fill a buffer from the OS CSPRNG, reporting exhaustion as an error.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| EnvelopeError::CryptoOperation(format!("random source failed: {e}")))
}

/// An X25519 public key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            EnvelopeError::KeyManagement(format!(
                "invalid X25519 public key length: expected 32, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn to_dalek(self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

/// An X25519 static secret key. Zeroized on drop by x25519-dalek.
pub struct X25519StaticSecret(StaticSecret);

impl X25519StaticSecret {
    /// Generate a new random secret.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 32];
        fill_random(&mut bytes)?;
        let secret = Self::from_bytes(bytes);
        bytes.zeroize();
        Ok(secret)
    }

    /// Create from seed bytes. Clamping happens inside x25519-dalek.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut arr: [u8; 32] = bytes.try_into().map_err(|_| {
            EnvelopeError::KeyManagement(format!(
                "invalid X25519 private key length: expected 32, got {}",
                bytes.len()
            ))
        })?;
        let secret = Self::from_bytes(arr);
        arr.zeroize();
        Ok(secret)
    }

    /// Derive the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Perform key agreement with a peer's public key.
    ///
    /// Returns `None` when the peer key is a low-order point and the result
    /// carries no contribution from our secret.
    pub fn diffie_hellman(&self, peer_public: &X25519PublicKey) -> Option<SharedKey> {
        let shared = self.0.diffie_hellman(&peer_public.to_dalek());
        if !shared.was_contributory() {
            return None;
        }
        Some(SharedKey(*shared.as_bytes()))
    }
}

/// Single-use key pair for the sender side of the KEM.
///
/// `diffie_hellman` consumes the pair, so one ephemeral secret can never
/// serve two messages.
pub struct EphemeralKeyPair {
    secret: X25519StaticSecret,
    public: X25519PublicKey,
}

impl EphemeralKeyPair {
    /// Generate a new ephemeral key pair.
    pub fn generate() -> Result<Self> {
        let secret = X25519StaticSecret::generate()?;
        let public = secret.public_key();
        Ok(Self { secret, public })
    }

    /// Get the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        self.public
    }

    /// Perform key agreement with a peer's public key.
    pub fn diffie_hellman(self, peer_public: &X25519PublicKey) -> Option<SharedKey> {
        self.secret.diffie_hellman(peer_public)
    }
}

/// A shared secret derived from X25519 key agreement.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; 32]);

impl SharedKey {
    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive the wrap key for one message.
    ///
    /// Both public keys go into the derivation so the key is bound to this
    /// exact sender/recipient pair.
    pub fn derive_wrap_key(
        &self,
        ephemeral_public: &X25519PublicKey,
        recipient_public: &X25519PublicKey,
    ) -> WrapKey {
        let mut hasher = blake3::Hasher::new_derive_key(WRAP_KEY_CONTEXT);
        hasher.update(&self.0);
        hasher.update(ephemeral_public.as_bytes());
        hasher.update(recipient_public.as_bytes());
        WrapKey(*hasher.finalize().as_bytes())
    }
}

/// A 256-bit ChaCha20-Poly1305 key used to seal a wrapped-key payload.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WrapKey([u8; 32]);

impl WrapKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encrypt data with this key.
    pub fn encrypt(&self, plaintext: &[u8], nonce: &WrapNonce) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| EnvelopeError::CryptoOperation(e.to_string()))?;

        cipher
            .encrypt(Nonce::from_slice(&nonce.0), plaintext)
            .map_err(|e| EnvelopeError::CryptoOperation(e.to_string()))
    }

    /// Decrypt data with this key.
    pub fn decrypt(&self, ciphertext: &[u8], nonce: &WrapNonce) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| EnvelopeError::CryptoOperation(e.to_string()))?;

        cipher
            .decrypt(Nonce::from_slice(&nonce.0), ciphertext)
            .map_err(|_| EnvelopeError::AuthenticationFailure)
    }
}

/// A 96-bit nonce for ChaCha20-Poly1305.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapNonce(pub [u8; 12]);

impl WrapNonce {
    /// Generate a new random nonce.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 12];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x25519_key_agreement() {
        let alice_secret = X25519StaticSecret::generate().unwrap();
        let alice_public = alice_secret.public_key();

        let bob_secret = X25519StaticSecret::generate().unwrap();
        let bob_public = bob_secret.public_key();

        let alice_shared = alice_secret.diffie_hellman(&bob_public).unwrap();
        let bob_shared = bob_secret.diffie_hellman(&alice_public).unwrap();

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn test_ephemeral_key_agreement() {
        let bob_secret = X25519StaticSecret::generate().unwrap();
        let bob_public = bob_secret.public_key();

        let ephemeral = EphemeralKeyPair::generate().unwrap();
        let ephemeral_public = ephemeral.public_key();

        let sender_shared = ephemeral.diffie_hellman(&bob_public).unwrap();
        let bob_shared = bob_secret.diffie_hellman(&ephemeral_public).unwrap();

        assert_eq!(sender_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn test_low_order_point_rejected() {
        let secret = X25519StaticSecret::generate().unwrap();
        let identity = X25519PublicKey::from_bytes([0u8; 32]);
        assert!(secret.diffie_hellman(&identity).is_none());
    }

    #[test]
    fn test_rfc7748_public_key() {
        let secret_bytes: [u8; 32] =
            hex::decode("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a")
                .unwrap()
                .try_into()
                .unwrap();
        let public = X25519StaticSecret::from_bytes(secret_bytes).public_key();
        assert_eq!(
            hex::encode(public.as_bytes()),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
    }

    #[test]
    fn test_wrap_key_roundtrip_and_tamper() {
        let key = WrapKey::from_bytes([0x11; 32]);
        let nonce = WrapNonce::generate().unwrap();

        let mut ciphertext = key.encrypt(b"content key", &nonce).unwrap();
        assert_eq!(key.decrypt(&ciphertext, &nonce).unwrap(), b"content key");

        ciphertext[0] ^= 0x01;
        assert_eq!(
            key.decrypt(&ciphertext, &nonce).unwrap_err(),
            EnvelopeError::AuthenticationFailure
        );
    }

    #[test]
    fn test_wrap_key_bound_to_public_keys() {
        let shared = SharedKey([0x42; 32]);
        let a = X25519PublicKey::from_bytes([1; 32]);
        let b = X25519PublicKey::from_bytes([2; 32]);

        let k1 = shared.derive_wrap_key(&a, &b);
        let k2 = shared.derive_wrap_key(&a, &b);
        let k3 = shared.derive_wrap_key(&b, &a);

        assert_eq!(k1.as_bytes(), k2.as_bytes());
        assert_ne!(k1.as_bytes(), k3.as_bytes());
    }

    #[test]
    fn test_slice_length_checked() {
        assert!(matches!(
            X25519PublicKey::from_slice(&[0u8; 31]).unwrap_err(),
            EnvelopeError::KeyManagement(_)
        ));
        assert!(X25519StaticSecret::from_slice(&[0u8; 33]).is_err());
    }
}
