//! Base64 codecs used on the wire.
//!
//! Fragments and content keys use the standard alphabet. Wrapped-key blobs use
//! the URL-safe alphabet because they travel in query strings; decoding of
//! those accepts both padded and unpadded input.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{EnvelopeError, Result};

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode with the standard alphabet (padded).
pub fn encode_standard(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard-alphabet base64.
pub fn decode_standard(s: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|e| EnvelopeError::InvalidEncoding(e.to_string()))
}

/// Encode with the URL-safe alphabet (padded).
pub fn encode_url_safe(bytes: &[u8]) -> String {
    URL_SAFE.encode(bytes)
}

/// Decode URL-safe base64, with or without padding.
pub fn decode_url_safe(s: &str) -> Result<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(s)
        .map_err(|e| EnvelopeError::InvalidEncoding(e.to_string()))
}

/// Serde adapter storing bytes as a standard base64 string.
pub mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_standard(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_standard(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_safe_uses_url_alphabet() {
        // 0xfb 0xff encodes to "+/8=" in the standard alphabet
        let bytes = [0xfb, 0xff];
        assert_eq!(encode_standard(&bytes), "+/8=");
        assert_eq!(encode_url_safe(&bytes), "-_8=");
    }

    #[test]
    fn test_url_safe_accepts_missing_padding() {
        assert_eq!(decode_url_safe("-_8=").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode_url_safe("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_invalid_input_is_encoding_error() {
        let err = decode_url_safe("not base64!!").unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidEncoding(_)));

        let err = decode_standard("-_8=").unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidEncoding(_)));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode_standard(&[]), "");
        assert!(decode_url_safe("").unwrap().is_empty());
    }
}
