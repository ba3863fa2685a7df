//! Loading of the local private keyset.

use std::path::Path;

use fragseal_core::Keyset;

use crate::error::{KeyStoreError, Result};

/// Parse a private keyset from its JSON form, rejecting public material.
pub fn parse_private_keyset(json: &[u8]) -> Result<Keyset> {
    let keyset = Keyset::from_json(json)?;
    keyset.require_private()?;
    Ok(keyset)
}

/// Read the private keyset JSON from an environment variable.
pub fn load_private_keyset_from_env(var: &str) -> Result<Keyset> {
    let value = std::env::var(var).unwrap_or_default();
    if value.trim().is_empty() {
        return Err(KeyStoreError::MissingEnv(var.to_string()));
    }
    parse_private_keyset(value.as_bytes())
}

/// Read the private keyset JSON from a file.
pub async fn load_private_keyset_from_file(path: impl AsRef<Path>) -> Result<Keyset> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    parse_private_keyset(&bytes)
}
