//! PublicKeySource trait: where recipient public keys come from.
//!
//! The key material store is source-agnostic. Implementations include a
//! directory of keyset files and an in-memory map (for tests). A remote
//! source fetching keysets over HTTP plugs in behind the same trait.

use async_trait::async_trait;
use fragseal_core::{Domain, Keyset};

use crate::error::Result;

/// Async interface for resolving a recipient domain to its public keyset.
///
/// Sources are only consulted while a [`KeyMaterialStore`](crate::KeyMaterialStore)
/// is being loaded; encryption never calls them.
#[async_trait]
pub trait PublicKeySource: Send + Sync {
    /// Fetch the public keyset for a domain.
    ///
    /// Returns [`KeyStoreError::NotFound`](crate::KeyStoreError::NotFound)
    /// when the source has no key for the domain.
    async fn fetch(&self, domain: &Domain) -> Result<Keyset>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}
