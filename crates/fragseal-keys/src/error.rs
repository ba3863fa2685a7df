//! Error types for key loading.

use fragseal_core::EnvelopeError;
use thiserror::Error;

/// Errors that can occur while loading key material.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// A keyset was found but is unusable.
    #[error("key error: {0}")]
    Key(#[from] EnvelopeError),

    /// No public keyset is known for a domain.
    #[error("no public key for domain: {0}")]
    NotFound(String),

    /// The domain cannot be mapped to a key location.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// A required environment variable is unset or empty.
    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    /// No recipients were configured.
    #[error("no recipient domains configured")]
    NoRecipients,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for key loading.
pub type Result<T> = std::result::Result<T, KeyStoreError>;
