//! Pre-shared key authentication.
//!
//! Requests carry `Authorization: Bearer <psk>`. A missing header or one
//! without the `Bearer ` prefix is [`GatewayError::Unauthorized`]; a token
//! that does not match is [`GatewayError::Forbidden`].

use std::fmt;

use crate::error::{GatewayError, Result};

const BEARER_PREFIX: &str = "Bearer ";

/// Checks bearer tokens against the configured pre-shared key.
#[derive(Clone)]
pub struct PskAuthenticator {
    psk: String,
}

impl PskAuthenticator {
    pub fn new(psk: impl Into<String>) -> Self {
        Self { psk: psk.into() }
    }

    /// Validate an `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<()> {
        let token = authorization
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(GatewayError::Unauthorized)?;

        if constant_time_eq(token.as_bytes(), self.psk.as_bytes()) {
            Ok(())
        } else {
            Err(GatewayError::Forbidden)
        }
    }
}

impl fmt::Debug for PskAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PskAuthenticator(<redacted>)")
    }
}

/// Compare two byte strings without an early exit on the first difference.
/// Only the length is allowed to leak.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token() {
        let auth = PskAuthenticator::new("s3cret");
        assert!(auth.authenticate(Some("Bearer s3cret")).is_ok());
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let auth = PskAuthenticator::new("s3cret");
        assert!(matches!(
            auth.authenticate(None),
            Err(GatewayError::Unauthorized)
        ));
        assert!(matches!(
            auth.authenticate(Some("s3cret")),
            Err(GatewayError::Unauthorized)
        ));
        assert!(matches!(
            auth.authenticate(Some("Basic s3cret")),
            Err(GatewayError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_token() {
        let auth = PskAuthenticator::new("s3cret");
        assert!(matches!(
            auth.authenticate(Some("Bearer s3cres")),
            Err(GatewayError::Forbidden)
        ));
        assert!(matches!(
            auth.authenticate(Some("Bearer ")),
            Err(GatewayError::Forbidden)
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
