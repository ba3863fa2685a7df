//! Known-answer vectors.
//!
//! Only deterministic steps have fixed answers: public key derivation and
//! the wrapped-key payload encoding. Ciphertexts are randomized and are
//! checked by round trip instead.

use serde::Serialize;

use fragseal_core::{AccessRequirements, KeyId, WrappedKeyPayload};
use fragseal_crypto::{private_keyset_from_seed, public_keyset};

/// A public key derivation vector.
#[derive(Debug, Clone, Serialize)]
pub struct KeysetVector {
    pub name: &'static str,
    /// 32-byte private scalar (hex).
    pub secret: &'static str,
    /// Expected public key (hex).
    pub expected_public: &'static str,
}

/// A wrapped-key payload encoding vector.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadVector {
    pub name: &'static str,
    pub access_requirements: &'static [&'static str],
    /// Content key bytes (hex).
    pub key: &'static str,
    /// Expected compact JSON.
    pub expected_json: &'static str,
}

/// RFC 7748 section 6.1 key pairs.
pub fn keyset_vectors() -> Vec<KeysetVector> {
    vec![
        KeysetVector {
            name: "RFC 7748 Alice",
            secret: "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
            expected_public: "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a",
        },
        KeysetVector {
            name: "RFC 7748 Bob",
            secret: "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb",
            expected_public: "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f",
        },
    ]
}

pub fn payload_vectors() -> Vec<PayloadVector> {
    vec![
        PayloadVector {
            name: "single requirement",
            access_requirements: &["org.example.Subscription"],
            key: "000102030405060708090a0b0c0d0e0f",
            expected_json: r#"{"AccessRequirements":["org.example.Subscription"],"Key":"AAECAwQFBgcICQoLDA0ODw=="}"#,
        },
        PayloadVector {
            name: "no requirements",
            access_requirements: &[],
            key: "ffffffffffffffffffffffffffffffff",
            expected_json: r#"{"AccessRequirements":[],"Key":"/////////////////////w=="}"#,
        },
    ]
}

/// Check one keyset vector, returning the derived public key (hex).
pub fn derive_public_from_vector(vector: &KeysetVector) -> String {
    let mut secret = [0u8; 32];
    hex::decode_to_slice(vector.secret, &mut secret).expect("vector secret is 32 hex bytes");
    let private = private_keyset_from_seed(KeyId::new(1), secret).expect("valid secret");
    let public = public_keyset(&private).expect("derived from a private keyset");
    hex::encode(public.value())
}

/// Encode one payload vector, returning the JSON.
pub fn encode_payload_from_vector(vector: &PayloadVector) -> String {
    let key = hex::decode(vector.key).expect("vector key is hex");
    let requirements: AccessRequirements = vector.access_requirements.iter().copied().collect();
    let bytes = WrappedKeyPayload::new(requirements, &key)
        .to_canonical_bytes()
        .expect("payload serializes");
    String::from_utf8(bytes).expect("JSON is UTF-8")
}

/// Verify every vector, reporting `(name, matches, actual)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let keysets = keyset_vectors().into_iter().map(|v| {
        let actual = derive_public_from_vector(&v);
        (v.name.to_string(), actual == v.expected_public, actual)
    });
    let payloads = payload_vectors().into_iter().map(|v| {
        let actual = encode_payload_from_vector(&v);
        (v.name.to_string(), actual == v.expected_json, actual)
    });
    keysets.chain(payloads).collect()
}
