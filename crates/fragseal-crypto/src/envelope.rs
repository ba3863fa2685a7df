//! Multi-recipient envelope encryption.
//!
//! A fragment is encrypted once under a fresh [`ContentKey`]. The key,
//! together with the access requirements, is then wrapped separately for
//! every recipient's public keyset.
//!
//! The staged API ([`seal_fragment`] → [`SealedFragment::wrap_for`] →
//! [`SealedFragment::finish`]) lets callers fan wrapping out however they
//! like; [`generate_encrypted_fragment`] is the sequential all-in-one form.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use fragseal_core::encoding;
use fragseal_core::{
    AccessRequirements, EncryptionResult, EnvelopeError, Keyset, RecipientSet, Result,
    WrappedKeyPayload,
};

use crate::aead::{decrypt_payload, encrypt_payload, ContentKey};
use crate::hybrid::{HybridDecrypt, HybridEncrypt, X25519HybridDecrypt, X25519HybridEncrypt};

/// A fragment encrypted under its content key, ready to be wrapped for
/// recipients.
pub struct SealedFragment {
    content_key: ContentKey,
    fragment: String,
    wrapped_payload: Zeroizing<Vec<u8>>,
}

impl SealedFragment {
    /// Base64 of the payload ciphertext.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The content key that encrypted the fragment.
    pub fn content_key(&self) -> &ContentKey {
        &self.content_key
    }

    /// Wrap the content key for one public keyset. Returns URL-safe base64.
    pub fn wrap_for(&self, keyset: &Keyset) -> Result<String> {
        let cipher = X25519HybridEncrypt::new(keyset)?;
        self.wrap_with(&cipher)
    }

    /// Wrap the content key with any hybrid encrypter.
    pub fn wrap_with<H: HybridEncrypt + ?Sized>(&self, cipher: &H) -> Result<String> {
        let wrapped = cipher.encrypt(&self.wrapped_payload)?;
        Ok(encoding::encode_url_safe(&wrapped))
    }

    /// Assemble the final result from one wrapped key per recipient.
    pub fn finish(&self, keys: BTreeMap<String, String>) -> EncryptionResult {
        tracing::debug!(
            recipients = keys.len(),
            fragment_len = self.fragment.len(),
            "encrypted fragment"
        );
        EncryptionResult::new(self.fragment.clone(), keys)
    }
}

/// Reject a recipient set nobody could decrypt for.
pub fn require_recipients(recipients: &RecipientSet) -> Result<()> {
    if recipients.is_empty() {
        return Err(EnvelopeError::KeyManagement(
            "recipient set is empty".to_string(),
        ));
    }
    Ok(())
}

/// Generate a content key and encrypt the payload under it.
///
/// The wrapped-key payload is serialized here once; every recipient gets the
/// same canonical bytes.
pub fn seal_fragment(
    payload: &[u8],
    access_requirements: &AccessRequirements,
) -> Result<SealedFragment> {
    let content_key = ContentKey::generate()?;
    let ciphertext = encrypt_payload(&content_key, payload)?;

    let wrapped_payload =
        WrappedKeyPayload::new(access_requirements.clone(), content_key.as_bytes());
    let wrapped_payload = Zeroizing::new(wrapped_payload.to_canonical_bytes()?);

    Ok(SealedFragment {
        content_key,
        fragment: encoding::encode_standard(&ciphertext),
        wrapped_payload,
    })
}

/// Encrypt a payload once and wrap its key for every recipient.
///
/// Fails as a whole if any recipient cannot be wrapped; a partial result is
/// never returned. An empty recipient set is rejected.
pub fn generate_encrypted_fragment(
    payload: &[u8],
    access_requirements: &AccessRequirements,
    recipients: &RecipientSet,
) -> Result<EncryptionResult> {
    require_recipients(recipients)?;

    let sealed = seal_fragment(payload, access_requirements)?;

    let mut keys = BTreeMap::new();
    for (domain, keyset) in recipients.iter() {
        let wrapped = sealed.wrap_for(keyset).map_err(|e| {
            tracing::warn!(domain = %domain, key_id = %keyset.key_id(), error = %e, "failed to wrap content key");
            e
        })?;
        keys.insert(domain.to_string(), wrapped);
    }

    Ok(sealed.finish(keys))
}

/// Unwrap a wrapped-key blob with the local private keyset.
///
/// Errors are distinguishable: bad base64 is `InvalidEncoding`, a blob not
/// produced for this key (or tampered) is `AuthenticationFailure`, and a
/// successful unwrap that does not parse is `CorruptPayload`.
pub fn decrypt_wrapped_key(blob: &str, private_keyset: &Keyset) -> Result<WrappedKeyPayload> {
    let wrapped = encoding::decode_url_safe(blob)?;
    let cipher = X25519HybridDecrypt::new(private_keyset)?;
    open_wrapped_bytes(&wrapped, &cipher)
}

/// [`decrypt_wrapped_key`] with any hybrid decrypter.
pub fn open_wrapped_key<H: HybridDecrypt + ?Sized>(
    blob: &str,
    cipher: &H,
) -> Result<WrappedKeyPayload> {
    let wrapped = encoding::decode_url_safe(blob)?;
    open_wrapped_bytes(&wrapped, cipher)
}

fn open_wrapped_bytes<H: HybridDecrypt + ?Sized>(
    wrapped: &[u8],
    cipher: &H,
) -> Result<WrappedKeyPayload> {
    let plaintext = Zeroizing::new(cipher.decrypt(wrapped)?);
    let payload = WrappedKeyPayload::from_bytes(&plaintext)?;
    ContentKey::from_wrapped_payload(&payload)?;
    Ok(payload)
}

/// Unwrap a blob and return the payload as JSON bytes for the transport.
pub fn decrypt_wrapped_key_json(blob: &str, private_keyset: &Keyset) -> Result<Vec<u8>> {
    decrypt_wrapped_key(blob, private_keyset)?.to_canonical_bytes()
}

/// Decrypt a base64 fragment with a recovered content key.
pub fn decrypt_fragment(fragment: &str, content_key: &ContentKey) -> Result<Vec<u8>> {
    let ciphertext = encoding::decode_standard(fragment)?;
    decrypt_payload(content_key, &ciphertext)
}
