//! Directory-backed PublicKeySource.
//!
//! Each recipient's public keyset lives in `<dir>/<domain>.json` in the
//! keyset JSON form.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fragseal_core::{Domain, Keyset};

use crate::error::{KeyStoreError, Result};
use crate::traits::PublicKeySource;

/// Reads public keysets from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct DirectoryKeySource {
    dir: PathBuf,
}

impl DirectoryKeySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a domain's keyset is read from.
    pub fn path_for(&self, domain: &Domain) -> Result<PathBuf> {
        let name = domain.as_str();
        if name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(KeyStoreError::InvalidDomain(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl PublicKeySource for DirectoryKeySource {
    async fn fetch(&self, domain: &Domain) -> Result<Keyset> {
        let path = self.path_for(domain)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KeyStoreError::NotFound(domain.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let keyset = Keyset::from_json(&bytes)?;
        tracing::debug!(domain = %domain, key_id = %keyset.key_id(), path = %path.display(), "loaded public keyset");
        Ok(keyset)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragseal_crypto::{generate_private_keyset, public_keyset};

    #[tokio::test]
    async fn test_directory_source_reads_keyset() {
        let dir = tempfile::tempdir().unwrap();
        let public = public_keyset(&generate_private_keyset().unwrap()).unwrap();
        std::fs::write(dir.path().join("a.example.json"), public.to_json().unwrap()).unwrap();

        let source = DirectoryKeySource::new(dir.path());
        let fetched = source.fetch(&Domain::new("A.Example").unwrap()).await.unwrap();
        assert_eq!(fetched, public);
    }

    #[tokio::test]
    async fn test_directory_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryKeySource::new(dir.path());

        let err = source
            .fetch(&Domain::new("b.example").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, KeyStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_directory_source_malformed_keyset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("c.example.json"), b"{\"keyId\": 1}").unwrap();
        let source = DirectoryKeySource::new(dir.path());

        let err = source
            .fetch(&Domain::new("c.example").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, KeyStoreError::Key(_)));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let source = DirectoryKeySource::new("/keys");
        assert!(source.path_for(&Domain::new("../etc/passwd").unwrap()).is_err());
        assert!(source.path_for(&Domain::new("a/b").unwrap()).is_err());
        assert_eq!(
            source.path_for(&Domain::new("a.example").unwrap()).unwrap(),
            PathBuf::from("/keys/a.example.json")
        );
    }
}
