//! The key material store: every key an envelope service needs, loaded once.
//!
//! Built at startup from a [`PublicKeySource`] and the local private keyset,
//! then shared read-only (typically behind an `Arc`) by every request.

use fragseal_core::{Domain, Keyset, RecipientSet};

use crate::error::{KeyStoreError, Result};
use crate::traits::PublicKeySource;

/// Immutable recipient public keys plus the local private key.
#[derive(Debug, Clone)]
pub struct KeyMaterialStore {
    recipients: RecipientSet,
    private_keyset: Keyset,
    public_keyset: Keyset,
}

impl KeyMaterialStore {
    /// Build from already-parsed key material.
    ///
    /// Every recipient keyset must be public; the local keyset must be
    /// private.
    pub fn new(recipients: RecipientSet, private_keyset: Keyset) -> Result<Self> {
        if recipients.is_empty() {
            return Err(KeyStoreError::NoRecipients);
        }
        for (_, keyset) in recipients.iter() {
            keyset.require_public()?;
        }
        private_keyset.require_private()?;
        let public_keyset = fragseal_crypto::public_keyset(&private_keyset)?;

        Ok(Self {
            recipients,
            private_keyset,
            public_keyset,
        })
    }

    /// Resolve each domain through `source` and build the store.
    ///
    /// Domains are normalized, so `"Example.COM"` and `"example.com"` name
    /// the same recipient. Any lookup failure aborts the load.
    pub async fn load<S, I, D>(source: &S, domains: I, private_keyset: Keyset) -> Result<Self>
    where
        S: PublicKeySource + ?Sized,
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let mut recipients = RecipientSet::new();
        for raw in domains {
            let domain = Domain::new(raw.as_ref())?;
            let keyset = source.fetch(&domain).await.map_err(|e| {
                tracing::warn!(domain = %domain, source = %source.describe(), error = %e, "public key lookup failed");
                e
            })?;
            recipients.insert(domain, keyset);
        }

        let store = Self::new(recipients, private_keyset)?;
        tracing::info!(
            recipients = store.recipients.len(),
            local_key_id = %store.private_keyset.key_id(),
            "key material loaded"
        );
        Ok(store)
    }

    /// Recipient domains and their public keysets.
    pub fn recipients(&self) -> &RecipientSet {
        &self.recipients
    }

    /// The local private keyset used to unwrap blobs addressed to us.
    pub fn private_keyset(&self) -> &Keyset {
        &self.private_keyset
    }

    /// The public half of the local keyset.
    pub fn public_keyset(&self) -> &Keyset {
        &self.public_keyset
    }
}
