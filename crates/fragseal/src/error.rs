//! Error types for the gateway.

use fragseal_core::{EnvelopeError, ErrorKind};
use fragseal_keys::KeyStoreError;
use thiserror::Error;

/// Errors that can occur while serving envelope requests.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Envelope encryption or decryption failed.
    #[error("{0}")]
    Envelope(#[from] EnvelopeError),

    /// Key material could not be loaded.
    #[error("key store error: {0}")]
    KeyStore(#[from] KeyStoreError),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request carried no usable bearer credential.
    #[error("Not Authorized")]
    Unauthorized,

    /// The bearer credential did not match.
    #[error("Not Authorized")]
    Forbidden,

    /// The request is malformed.
    #[error("{0}")]
    InvalidRequest(String),

    /// No handler for the method and path.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// A blocking worker failed to complete.
    #[error("worker task failed: {0}")]
    Task(String),
}

impl GatewayError {
    /// HTTP status code a transport should answer with.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Envelope(e) => match e.kind() {
                ErrorKind::Encoding => 400,
                ErrorKind::AuthenticationFailure => 422,
                ErrorKind::KeyManagement | ErrorKind::CryptoOperation => 500,
            },
            GatewayError::Unauthorized | GatewayError::InvalidRequest(_) => 400,
            GatewayError::Forbidden => 403,
            GatewayError::RouteNotFound { .. } => 404,
            GatewayError::KeyStore(_) | GatewayError::Config(_) | GatewayError::Task(_) => 500,
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_by_error_kind() {
        assert_eq!(
            GatewayError::from(EnvelopeError::InvalidEncoding("x".into())).status(),
            400
        );
        assert_eq!(
            GatewayError::from(EnvelopeError::CorruptPayload("x".into())).status(),
            400
        );
        assert_eq!(
            GatewayError::from(EnvelopeError::AuthenticationFailure).status(),
            422
        );
        assert_eq!(
            GatewayError::from(EnvelopeError::KeyManagement("x".into())).status(),
            500
        );
        assert_eq!(GatewayError::Unauthorized.status(), 400);
        assert_eq!(GatewayError::Forbidden.status(), 403);
    }
}
