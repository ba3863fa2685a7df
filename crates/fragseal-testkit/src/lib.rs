//! # fragseal Testkit
//!
//! Testing utilities for fragseal.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Known-answer vectors**: Key derivation and payload encoding with fixed outputs
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic recipients and ready-made gateways
//!
//! ## Known-Answer Vectors
//!
//! ```rust
//! use fragseal_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use fragseal_testkit::generators::EnvelopeParams;
//!
//! proptest! {
//!     #[test]
//!     fn every_recipient_can_open(params: EnvelopeParams) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use fragseal_testkit::fixtures::{multi_recipient_fixtures, recipient_set};
//!
//! let parties = multi_recipient_fixtures(3);
//! let recipients = recipient_set(&parties);
//! assert_eq!(recipients.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{gateway_fixture, multi_recipient_fixtures, recipient_set, RecipientFixture};
pub use generators::EnvelopeParams;
pub use vectors::{keyset_vectors, payload_vectors, verify_all_vectors, KeysetVector, PayloadVector};
