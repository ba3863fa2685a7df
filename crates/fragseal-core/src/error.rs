//! Error types for envelope operations.
//!
//! The set is closed: callers branch on [`ErrorKind`] and never see the error
//! types of the underlying primitives.

use thiserror::Error;

/// Errors that can occur while sealing or opening an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// A keyset is malformed, of the wrong type, or unusable for the operation.
    #[error("key management error: {0}")]
    KeyManagement(String),

    /// The underlying AEAD or hybrid primitive failed internally.
    #[error("crypto operation failed: {0}")]
    CryptoOperation(String),

    /// Integrity verification failed. Deliberately carries no detail.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Input is not valid base64 or is otherwise malformed on the wire.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Decrypted bytes do not parse as the expected structure.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KeyManagement,
    CryptoOperation,
    AuthenticationFailure,
    Encoding,
}

impl EnvelopeError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvelopeError::KeyManagement(_) => ErrorKind::KeyManagement,
            EnvelopeError::CryptoOperation(_) => ErrorKind::CryptoOperation,
            EnvelopeError::AuthenticationFailure => ErrorKind::AuthenticationFailure,
            EnvelopeError::InvalidEncoding(_) | EnvelopeError::CorruptPayload(_) => {
                ErrorKind::Encoding
            }
        }
    }

    /// Whether this is an integrity failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, EnvelopeError::AuthenticationFailure)
    }
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;
