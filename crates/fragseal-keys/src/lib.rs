//! # fragseal Keys
//!
//! Key material loading for envelope services.
//!
//! ## Overview
//!
//! Recipient public keys are resolved through the [`PublicKeySource`] trait,
//! and the local private key is read from the environment or a file. Both
//! end up in a [`KeyMaterialStore`], which is built once at startup and is
//! read-only afterwards.
//!
//! ## Key Types
//!
//! - [`PublicKeySource`] - Async trait resolving a domain to a public keyset
//! - [`DirectoryKeySource`] - `<dir>/<domain>.json` files
//! - [`MemoryKeySource`] - In-memory map for tests
//! - [`KeyMaterialStore`] - Immutable recipients plus local private key
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fragseal_keys::{load_private_keyset_from_env, DirectoryKeySource, KeyMaterialStore};
//!
//! async fn example() {
//!     let private = load_private_keyset_from_env("FRAGSEAL_PRIVATE_KEY").unwrap();
//!     let source = DirectoryKeySource::new("keys");
//!     let store = KeyMaterialStore::load(&source, ["a.example", "b.example"], private)
//!         .await
//!         .unwrap();
//!     assert_eq!(store.recipients().len(), 2);
//! }
//! ```

pub mod directory;
pub mod error;
pub mod memory;
pub mod private;
pub mod store;
pub mod traits;

pub use directory::DirectoryKeySource;
pub use error::{KeyStoreError, Result};
pub use memory::MemoryKeySource;
pub use private::{load_private_keyset_from_env, load_private_keyset_from_file, parse_private_keyset};
pub use store::KeyMaterialStore;
pub use traits::PublicKeySource;
