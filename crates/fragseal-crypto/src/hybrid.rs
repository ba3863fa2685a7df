//! Hybrid public-key encryption for wrapping content keys.
//!
//! Scheme `X25519_BLAKE3_CHACHA20POLY1305`:
//!
//! 1. **KEM**: a fresh ephemeral X25519 key agrees a shared secret with the
//!    recipient's public key.
//! 2. **KDF**: BLAKE3 `derive_key` over the shared secret and both public keys.
//! 3. **DEM**: ChaCha20-Poly1305 under the derived key with a random nonce.
//!
//! Wire format:
//!
//! ```text
//! 0x01 || key_id (u32 BE) || ephemeral_public (32) || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! Every decryption failure, whatever the cause, surfaces as
//! [`EnvelopeError::AuthenticationFailure`].

use fragseal_core::{EnvelopeError, KeyAlgorithm, KeyId, Keyset, Result};

use crate::crypto::{
    fill_random, EphemeralKeyPair, WrapNonce, X25519PublicKey, X25519StaticSecret,
};

/// Leading byte of every hybrid ciphertext.
pub const HYBRID_PREFIX: u8 = 0x01;

const KEY_ID_LEN: usize = 4;
const PUBLIC_KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Bytes before the DEM ciphertext.
pub const HEADER_LEN: usize = 1 + KEY_ID_LEN + PUBLIC_KEY_LEN + NONCE_LEN;

/// Shortest possible ciphertext (empty plaintext).
pub const MIN_CIPHERTEXT_LEN: usize = HEADER_LEN + TAG_LEN;

/// Encrypts small payloads to one recipient's public key.
pub trait HybridEncrypt: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;
}

/// Decrypts payloads produced by the matching [`HybridEncrypt`].
pub trait HybridDecrypt: Send + Sync {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

fn require_algorithm(keyset: &Keyset) -> Result<()> {
    keyset.validate()?;
    match keyset.algorithm() {
        KeyAlgorithm::X25519Blake3ChaCha20Poly1305 => Ok(()),
    }
}

/// Sender side of the X25519 hybrid scheme.
#[derive(Debug, Clone)]
pub struct X25519HybridEncrypt {
    key_id: KeyId,
    recipient: X25519PublicKey,
}

impl X25519HybridEncrypt {
    /// Build from a public keyset.
    pub fn new(keyset: &Keyset) -> Result<Self> {
        keyset.require_public()?;
        require_algorithm(keyset)?;
        Ok(Self {
            key_id: keyset.key_id(),
            recipient: X25519PublicKey::from_slice(keyset.value())?,
        })
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }
}

impl HybridEncrypt for X25519HybridEncrypt {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let ephemeral = EphemeralKeyPair::generate()?;
        let ephemeral_public = ephemeral.public_key();

        let shared = ephemeral.diffie_hellman(&self.recipient).ok_or_else(|| {
            EnvelopeError::KeyManagement(format!(
                "keyset {} holds a low-order public key",
                self.key_id
            ))
        })?;
        let wrap_key = shared.derive_wrap_key(&ephemeral_public, &self.recipient);

        let nonce = WrapNonce::generate()?;
        let sealed = wrap_key.encrypt(plaintext, &nonce)?;

        let mut out = Vec::with_capacity(HEADER_LEN + sealed.len());
        out.push(HYBRID_PREFIX);
        out.extend_from_slice(&self.key_id.to_be_bytes());
        out.extend_from_slice(ephemeral_public.as_bytes());
        out.extend_from_slice(nonce.as_bytes());
        out.extend_from_slice(&sealed);
        Ok(out)
    }
}

/// Recipient side of the X25519 hybrid scheme.
pub struct X25519HybridDecrypt {
    key_id: KeyId,
    secret: X25519StaticSecret,
    public: X25519PublicKey,
}

impl X25519HybridDecrypt {
    /// Build from a private keyset.
    pub fn new(keyset: &Keyset) -> Result<Self> {
        keyset.require_private()?;
        require_algorithm(keyset)?;
        let secret = X25519StaticSecret::from_slice(keyset.value())?;
        let public = secret.public_key();
        Ok(Self {
            key_id: keyset.key_id(),
            secret,
            public,
        })
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }
}

impl HybridDecrypt for X25519HybridDecrypt {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < MIN_CIPHERTEXT_LEN || ciphertext[0] != HYBRID_PREFIX {
            return Err(EnvelopeError::AuthenticationFailure);
        }

        let (header, sealed) = ciphertext.split_at(HEADER_LEN);
        let (key_id, rest) = header[1..].split_at(KEY_ID_LEN);
        let (ephemeral, nonce) = rest.split_at(PUBLIC_KEY_LEN);

        // Blobs wrapped for a different keyset are never attempted.
        if key_id != self.key_id.to_be_bytes().as_slice() {
            return Err(EnvelopeError::AuthenticationFailure);
        }

        let ephemeral_public = X25519PublicKey::from_slice(ephemeral)
            .map_err(|_| EnvelopeError::AuthenticationFailure)?;
        let nonce = WrapNonce::from_bytes(
            nonce
                .try_into()
                .map_err(|_| EnvelopeError::AuthenticationFailure)?,
        );

        let shared = self
            .secret
            .diffie_hellman(&ephemeral_public)
            .ok_or(EnvelopeError::AuthenticationFailure)?;
        let wrap_key = shared.derive_wrap_key(&ephemeral_public, &self.public);

        wrap_key.decrypt(sealed, &nonce)
    }
}

/// Generate a fresh private keyset with a random non-zero key id.
pub fn generate_private_keyset() -> Result<Keyset> {
    let mut id = [0u8; 4];
    let key_id = loop {
        fill_random(&mut id)?;
        let candidate = u32::from_be_bytes(id);
        if candidate != 0 {
            break KeyId::new(candidate);
        }
    };

    let mut secret = [0u8; 32];
    fill_random(&mut secret)?;
    private_keyset_from_seed(key_id, secret)
}

/// Build a private keyset from raw secret bytes.
pub fn private_keyset_from_seed(key_id: KeyId, seed: [u8; 32]) -> Result<Keyset> {
    Keyset::private(
        key_id,
        KeyAlgorithm::X25519Blake3ChaCha20Poly1305,
        seed.to_vec(),
    )
}

/// Derive the public keyset matching a private keyset.
pub fn public_keyset(private: &Keyset) -> Result<Keyset> {
    private.require_private()?;
    require_algorithm(private)?;
    let secret = X25519StaticSecret::from_slice(private.value())?;
    Keyset::public(
        private.key_id(),
        private.algorithm(),
        secret.public_key().as_bytes().to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragseal_core::KeyMaterialType;

    fn keypair() -> (Keyset, Keyset) {
        let private = generate_private_keyset().unwrap();
        let public = public_keyset(&private).unwrap();
        (private, public)
    }

    #[test]
    fn test_hybrid_roundtrip() {
        let (private, public) = keypair();
        let encrypter = X25519HybridEncrypt::new(&public).unwrap();
        let decrypter = X25519HybridDecrypt::new(&private).unwrap();

        let ciphertext = encrypter.encrypt(b"wrapped payload").unwrap();
        assert_eq!(ciphertext[0], HYBRID_PREFIX);
        assert_eq!(&ciphertext[1..5], &public.key_id().to_be_bytes());
        assert_eq!(ciphertext.len(), MIN_CIPHERTEXT_LEN + b"wrapped payload".len());

        assert_eq!(decrypter.decrypt(&ciphertext).unwrap(), b"wrapped payload");
    }

    #[test]
    fn test_each_message_uses_fresh_ephemeral() {
        let (_, public) = keypair();
        let encrypter = X25519HybridEncrypt::new(&public).unwrap();

        let c1 = encrypter.encrypt(b"same").unwrap();
        let c2 = encrypter.encrypt(b"same").unwrap();
        assert_ne!(c1[5..37], c2[5..37]);
    }

    #[test]
    fn test_wrong_private_key_fails() {
        let (_, public) = keypair();
        let (other_private, _) = keypair();

        let ciphertext = X25519HybridEncrypt::new(&public)
            .unwrap()
            .encrypt(b"secret")
            .unwrap();
        let err = X25519HybridDecrypt::new(&other_private)
            .unwrap()
            .decrypt(&ciphertext)
            .unwrap_err();
        assert_eq!(err, EnvelopeError::AuthenticationFailure);
    }

    #[test]
    fn test_wrong_private_key_with_same_key_id_fails() {
        let public = public_keyset(&private_keyset_from_seed(KeyId::new(5), [1; 32]).unwrap())
            .unwrap();
        let other = private_keyset_from_seed(KeyId::new(5), [2; 32]).unwrap();

        let ciphertext = X25519HybridEncrypt::new(&public)
            .unwrap()
            .encrypt(b"secret")
            .unwrap();
        let err = X25519HybridDecrypt::new(&other)
            .unwrap()
            .decrypt(&ciphertext)
            .unwrap_err();
        assert_eq!(err, EnvelopeError::AuthenticationFailure);
    }

    #[test]
    fn test_truncated_and_tampered_fail() {
        let (private, public) = keypair();
        let ciphertext = X25519HybridEncrypt::new(&public)
            .unwrap()
            .encrypt(b"secret")
            .unwrap();
        let decrypter = X25519HybridDecrypt::new(&private).unwrap();

        for len in [0, 1, HEADER_LEN, MIN_CIPHERTEXT_LEN - 1, ciphertext.len() - 1] {
            assert_eq!(
                decrypter.decrypt(&ciphertext[..len]).unwrap_err(),
                EnvelopeError::AuthenticationFailure
            );
        }

        for i in [0, 3, 10, HEADER_LEN - 1, ciphertext.len() - 1] {
            let mut tampered = ciphertext.clone();
            tampered[i] ^= 0x80;
            assert_eq!(
                decrypter.decrypt(&tampered).unwrap_err(),
                EnvelopeError::AuthenticationFailure
            );
        }
    }

    #[test]
    fn test_key_type_mismatch_is_key_management() {
        let (private, public) = keypair();

        assert!(matches!(
            X25519HybridEncrypt::new(&private).unwrap_err(),
            EnvelopeError::KeyManagement(_)
        ));
        assert!(matches!(
            X25519HybridDecrypt::new(&public).err(),
            Some(EnvelopeError::KeyManagement(_))
        ));
        assert!(public_keyset(&public).is_err());
    }

    #[test]
    fn test_low_order_recipient_key_rejected() {
        let public = Keyset::public(
            KeyId::new(9),
            KeyAlgorithm::X25519Blake3ChaCha20Poly1305,
            vec![0u8; 32],
        )
        .unwrap();
        let err = X25519HybridEncrypt::new(&public)
            .unwrap()
            .encrypt(b"secret")
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::KeyManagement(_)));
    }

    #[test]
    fn test_public_keyset_derivation() {
        let private = private_keyset_from_seed(KeyId::new(42), [3; 32]).unwrap();
        let public = public_keyset(&private).unwrap();

        assert_eq!(public.key_id(), KeyId::new(42));
        assert_eq!(public.material_type(), KeyMaterialType::AsymmetricPublic);
        assert_eq!(public, public_keyset(&private).unwrap());
    }
}
