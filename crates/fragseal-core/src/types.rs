//! Strong type definitions for envelopes and their recipients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::encoding;
use crate::error::{EnvelopeError, Result};
use crate::keyset::Keyset;

/// A recipient identifier: a case-normalized domain name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Normalize and validate a domain. Surrounding whitespace is trimmed and
    /// the result lowercased; an empty result is rejected.
    pub fn new(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EnvelopeError::InvalidEncoding(
                "recipient domain is empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Domain({})", self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Domain {
    type Error = EnvelopeError;

    fn try_from(raw: String) -> Result<Self> {
        Self::new(&raw)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mapping from recipient domain to that recipient's public keyset.
///
/// Iteration is ordered by domain so results are deterministic, but nothing
/// depends on the order.
#[derive(Debug, Clone, Default)]
pub struct RecipientSet {
    recipients: BTreeMap<Domain, Keyset>,
}

impl RecipientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient. Replaces and returns any keyset already registered
    /// under the same normalized domain.
    pub fn insert(&mut self, domain: Domain, keyset: Keyset) -> Option<Keyset> {
        self.recipients.insert(domain, keyset)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, domain: Domain, keyset: Keyset) -> Self {
        self.insert(domain, keyset);
        self
    }

    pub fn get(&self, domain: &Domain) -> Option<&Keyset> {
        self.recipients.get(domain)
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Domain, &Keyset)> {
        self.recipients.iter()
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.recipients.keys()
    }
}

impl FromIterator<(Domain, Keyset)> for RecipientSet {
    fn from_iter<I: IntoIterator<Item = (Domain, Keyset)>>(iter: I) -> Self {
        Self {
            recipients: iter.into_iter().collect(),
        }
    }
}

/// Ordered authorization tokens a recipient evaluates before releasing the
/// decrypted payload. Opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRequirements(Vec<String>);

impl AccessRequirements {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for AccessRequirements {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl<'a> FromIterator<&'a str> for AccessRequirements {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(String::from).collect())
    }
}

/// The plaintext sealed inside every wrapped-key blob.
///
/// Field names are part of the wire format:
/// `{"AccessRequirements": [...], "Key": "<base64>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKeyPayload {
    #[serde(rename = "AccessRequirements")]
    pub access_requirements: AccessRequirements,

    /// Content key, standard base64.
    #[serde(rename = "Key")]
    pub key: String,
}

impl WrappedKeyPayload {
    /// Bind raw content-key bytes to a requirement list.
    pub fn new(access_requirements: AccessRequirements, key_bytes: &[u8]) -> Self {
        Self {
            access_requirements,
            key: encoding::encode_standard(key_bytes),
        }
    }

    /// Canonical byte form (compact JSON).
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| EnvelopeError::CorruptPayload(e.to_string()))
    }

    /// Parse from the canonical byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| EnvelopeError::CorruptPayload(e.to_string()))
    }

    /// Decode the embedded content key.
    pub fn key_bytes(&self) -> Result<Vec<u8>> {
        encoding::decode_standard(&self.key).map_err(|_| {
            EnvelopeError::CorruptPayload("embedded key is not valid base64".to_string())
        })
    }
}

/// Output of one envelope encryption: the encrypted fragment plus one
/// wrapped content key per recipient domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionResult {
    /// Payload ciphertext, standard base64.
    fragment: String,

    /// Domain to wrapped-key blob, URL-safe base64.
    keys: BTreeMap<String, String>,
}

impl EncryptionResult {
    pub fn new(fragment: String, keys: BTreeMap<String, String>) -> Self {
        Self { fragment, keys }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn keys(&self) -> &BTreeMap<String, String> {
        &self.keys
    }

    /// The wrapped-key blob for one recipient.
    pub fn key_for(&self, domain: &Domain) -> Option<&str> {
        self.keys.get(domain.as_str()).map(String::as_str)
    }

    /// Serialize to the transport JSON shape.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| EnvelopeError::CorruptPayload(e.to_string()))
    }
}
