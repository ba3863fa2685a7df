//! In-memory implementation of PublicKeySource.
//!
//! Primarily for testing and for embedding callers that already hold parsed
//! keysets.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use fragseal_core::{Domain, Keyset};

use crate::error::{KeyStoreError, Result};
use crate::traits::PublicKeySource;

/// In-memory key source. Thread-safe via RwLock.
pub struct MemoryKeySource {
    keys: RwLock<HashMap<Domain, Keyset>>,
}

impl MemoryKeySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) the keyset for a domain.
    pub fn insert(&self, domain: Domain, keyset: Keyset) {
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        keys.insert(domain, keyset);
    }

    /// Number of registered domains.
    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(Domain, Keyset)> for MemoryKeySource {
    fn from_iter<I: IntoIterator<Item = (Domain, Keyset)>>(iter: I) -> Self {
        Self {
            keys: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PublicKeySource for MemoryKeySource {
    async fn fetch(&self, domain: &Domain) -> Result<Keyset> {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.get(domain)
            .cloned()
            .ok_or_else(|| KeyStoreError::NotFound(domain.to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
