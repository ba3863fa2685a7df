//! Test fixtures and helpers.
//!
//! Common setup code for envelope and gateway tests.

use std::sync::Arc;

use rand::RngCore;

use fragseal::{Gateway, GatewayConfig};
use fragseal_core::{Domain, KeyId, Keyset, RecipientSet};
use fragseal_crypto::{private_keyset_from_seed, public_keyset};
use fragseal_keys::{KeyMaterialStore, MemoryKeySource};

/// Pre-shared key used by [`gateway_fixture`].
pub const TEST_PSK: &str = "testkit-psk";

/// A recipient domain with both halves of its keyset.
pub struct RecipientFixture {
    pub domain: Domain,
    pub private: Keyset,
    pub public: Keyset,
}

impl RecipientFixture {
    /// Create with a random keyset.
    pub fn new(domain: &str) -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::with_seed(domain, rand::random::<u32>() | 1, seed)
    }

    /// Create with a deterministic keyset from seed.
    pub fn with_seed(domain: &str, key_id: u32, seed: [u8; 32]) -> Self {
        let private = private_keyset_from_seed(KeyId::new(key_id), seed)
            .expect("seed is a valid X25519 secret");
        let public = public_keyset(&private).expect("derived from a private keyset");
        Self {
            domain: Domain::new(domain).expect("fixture domain is non-empty"),
            private,
            public,
        }
    }
}

/// Create `count` recipients named `r0.example`, `r1.example`, ... with
/// deterministic keys.
pub fn multi_recipient_fixtures(count: usize) -> Vec<RecipientFixture> {
    (0..count)
        .map(|i| {
            let n = i as u32 + 1;
            // Byte 0 loses its low bits to clamping; keep the index clear of it.
            let mut seed = [0u8; 32];
            seed[1..5].copy_from_slice(&n.to_be_bytes());
            RecipientFixture::with_seed(&format!("r{i}.example"), n, seed)
        })
        .collect()
}

/// The public recipient set for a group of fixtures.
pub fn recipient_set(fixtures: &[RecipientFixture]) -> RecipientSet {
    fixtures
        .iter()
        .map(|f| (f.domain.clone(), f.public.clone()))
        .collect()
}

/// A key source serving the fixtures' public keysets.
pub fn memory_source(fixtures: &[RecipientFixture]) -> MemoryKeySource {
    fixtures
        .iter()
        .map(|f| (f.domain.clone(), f.public.clone()))
        .collect()
}

/// A gateway that encrypts for `recipients` and decrypts as `local`.
///
/// `local` is typically one of the recipients so round trips can go
/// through the gateway alone.
pub fn gateway_fixture(recipients: &[RecipientFixture], local: &RecipientFixture) -> Gateway {
    let mut config = GatewayConfig::new(TEST_PSK);
    config.recipients = recipients.iter().map(|f| f.domain.to_string()).collect();
    config.access_requirements = ["org.example.Subscription"].into_iter().collect();

    let keys = KeyMaterialStore::new(recipient_set(recipients), local.private.clone())
        .expect("fixture key material is consistent");
    Gateway::new(Arc::new(keys), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use fragseal::GatewayRequest;
    use fragseal_core::{AccessRequirements, ErrorKind};
    use fragseal_crypto::{decrypt_wrapped_key, generate_encrypted_fragment};

    #[test]
    fn test_fixtures_are_deterministic() {
        let a = multi_recipient_fixtures(3);
        let b = multi_recipient_fixtures(3);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.domain, y.domain);
            assert_eq!(x.public, y.public);
        }
    }

    #[test]
    fn test_fixtures_have_distinct_keys() {
        let parties = multi_recipient_fixtures(300);
        let publics: HashSet<Vec<u8>> = parties.iter().map(|p| p.public.value().to_vec()).collect();
        let key_ids: HashSet<u32> = parties.iter().map(|p| p.public.key_id().get()).collect();
        assert_eq!(publics.len(), 300);
        assert_eq!(key_ids.len(), 300);
    }

    #[test]
    fn test_fixture_blob_not_opened_by_neighbour() {
        let parties = multi_recipient_fixtures(8);
        let requirements: AccessRequirements = ["org.example.Subscription"].into_iter().collect();
        let result =
            generate_encrypted_fragment(b"x", &requirements, &recipient_set(&parties)).unwrap();

        for pair in parties.windows(2) {
            let blob = result.key_for(&pair[0].domain).unwrap();
            assert!(decrypt_wrapped_key(blob, &pair[0].private).is_ok());
            let err = decrypt_wrapped_key(blob, &pair[1].private).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
        }
    }

    #[tokio::test]
    async fn test_gateway_fixture_round_trip() {
        let parties = multi_recipient_fixtures(2);
        let gateway = gateway_fixture(&parties, &parties[0]);

        let result = gateway.encrypt_fragment(b"fixture").await.unwrap();
        assert_eq!(result.keys().len(), 2);

        let response = gateway
            .handle(GatewayRequest::decrypt(
                Some(&format!("Bearer {TEST_PSK}")),
                result.key_for(&parties[0].domain).unwrap(),
            ))
            .await;
        assert_eq!(response.status, 200);

        let other = result.key_for(&parties[1].domain).unwrap();
        assert!(decrypt_wrapped_key(other, &parties[1].private).is_ok());
    }
}
