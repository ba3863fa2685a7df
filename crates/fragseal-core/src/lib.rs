//! # fragseal Core
//!
//! Data model for multi-recipient envelope encryption.
//!
//! This crate contains no cryptography and no I/O. It defines the shapes that
//! flow through an envelope operation and the closed set of errors those
//! operations can report.
//!
//! ## Key Types
//!
//! - [`Keyset`] - Opaque single-key container (public or private)
//! - [`Domain`] - Case-normalized recipient identifier
//! - [`RecipientSet`] - Recipient domain to public keyset
//! - [`AccessRequirements`] - Authorization tokens bound to every wrapped key
//! - [`WrappedKeyPayload`] - The plaintext inside a wrapped-key blob
//! - [`EncryptionResult`] - Fragment ciphertext plus wrapped keys per domain
//!
//! ## Errors
//!
//! Every fallible operation returns [`EnvelopeError`]. Use
//! [`EnvelopeError::kind`] to branch on the category.

pub mod encoding;
pub mod error;
pub mod keyset;
pub mod types;

pub use error::{EnvelopeError, ErrorKind, Result};
pub use keyset::{KeyAlgorithm, KeyId, KeyMaterialType, Keyset};
pub use types::{AccessRequirements, Domain, EncryptionResult, RecipientSet, WrappedKeyPayload};
