//! # fragseal
//!
//! Multi-recipient envelope encryption for content fragments.
//!
//! ## Overview
//!
//! A fragment is encrypted once under a fresh content key. The key, bound to
//! a list of access requirements, is wrapped separately for each recipient
//! domain's public key. Any recipient can later unwrap its blob with its own
//! private key and recover the content key; nobody else can.
//!
//! - **Encrypt**: payload + recipients → fragment plus one wrapped key per domain
//! - **Decrypt**: wrapped key + local private key → access requirements and content key
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fragseal::{Gateway, GatewayRequest};
//!
//! async fn example() -> anyhow::Result<()> {
//!     // FRAGSEAL_PSK, FRAGSEAL_PRIVATE_KEY and FRAGSEAL_RECIPIENTS must be set
//!     let gateway = Gateway::from_env().await?;
//!
//!     let result = gateway.encrypt_fragment(b"<p>premium content</p>").await?;
//!     println!("{}", result.fragment());
//!
//!     let response = gateway
//!         .handle(GatewayRequest::decrypt(Some("Bearer secret"), &result.keys()["a.example"]))
//!         .await;
//!     assert_eq!(response.status, 200);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `fragseal::core` - Shared types, keysets, errors and encodings
//! - `fragseal::crypto` - Ciphers and the envelope protocol
//! - `fragseal::keys` - Key material loading

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;

// Re-export component crates
pub use fragseal_core as core;
pub use fragseal_crypto as crypto;
pub use fragseal_keys as keys;

pub use auth::PskAuthenticator;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayRequest, GatewayResponse, Method};

// Re-export commonly used types
pub use fragseal_core::{
    AccessRequirements, Domain, EncryptionResult, EnvelopeError, ErrorKind, Keyset,
    RecipientSet, WrappedKeyPayload,
};
pub use fragseal_crypto::{decrypt_wrapped_key, generate_encrypted_fragment, ContentKey};
