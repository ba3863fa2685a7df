//! # fragseal Crypto
//!
//! Ciphers and the envelope protocol.
//!
//! ## Encryption Model
//!
//! A fragment is protected by a two-layer key model:
//!
//! 1. **Content Key**: a single-use AES-128-GCM key that encrypts the fragment
//! 2. **Wrapped Keys**: the content key plus the access requirements, sealed
//!    to each recipient's X25519 public key with a hybrid (KEM + DEM) scheme
//!
//! The fragment is encrypted once no matter how many recipients there are.
//!
//! ## Usage
//!
//! ```rust
//! use fragseal_core::{AccessRequirements, Domain, RecipientSet};
//! use fragseal_crypto::{
//!     decrypt_fragment, decrypt_wrapped_key, generate_encrypted_fragment,
//!     generate_private_keyset, public_keyset, ContentKey,
//! };
//!
//! let private = generate_private_keyset().unwrap();
//! let recipients = RecipientSet::new()
//!     .with(Domain::new("a.example").unwrap(), public_keyset(&private).unwrap());
//! let requirements: AccessRequirements = ["org.example.Subscription"].into_iter().collect();
//!
//! let result = generate_encrypted_fragment(b"hello world", &requirements, &recipients).unwrap();
//!
//! let payload = decrypt_wrapped_key(&result.keys()["a.example"], &private).unwrap();
//! let key = ContentKey::from_wrapped_payload(&payload).unwrap();
//! assert_eq!(decrypt_fragment(result.fragment(), &key).unwrap(), b"hello world");
//! ```

pub mod aead;
pub mod crypto;
pub mod envelope;
pub mod hybrid;

pub use aead::{decrypt_payload, encrypt_payload, ContentKey, CONTENT_KEY_SIZE};
pub use crypto::{EphemeralKeyPair, SharedKey, WrapKey, WrapNonce, X25519PublicKey, X25519StaticSecret};
pub use envelope::{
    decrypt_fragment, decrypt_wrapped_key, decrypt_wrapped_key_json, generate_encrypted_fragment,
    open_wrapped_key, require_recipients, seal_fragment, SealedFragment,
};
pub use hybrid::{
    generate_private_keyset, private_keyset_from_seed, public_keyset, HybridDecrypt,
    HybridEncrypt, X25519HybridDecrypt, X25519HybridEncrypt,
};
