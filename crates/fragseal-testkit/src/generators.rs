//! Proptest generators for property-based testing.

use proptest::prelude::*;

use fragseal_core::{AccessRequirements, Domain, KeyId, Keyset};
use fragseal_crypto::private_keyset_from_seed;

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a requirement token such as `org.example.Subscription`.
pub fn requirement_token() -> impl Strategy<Value = String> {
    "[a-z]{2,8}(\\.[a-z]{2,8}){1,2}\\.[A-Z][A-Za-z]{0,15}".prop_map(String::from)
}

/// Generate a requirement list, possibly empty.
pub fn access_requirements() -> impl Strategy<Value = AccessRequirements> {
    prop::collection::vec(requirement_token(), 0..4).prop_map(AccessRequirements::new)
}

/// Generate a normalized domain name.
pub fn domain() -> impl Strategy<Value = Domain> {
    "[a-z][a-z0-9-]{0,15}\\.(com|org|example)"
        .prop_map(|s| Domain::new(&s).expect("generated domains are non-empty"))
}

/// Generate a private keyset.
pub fn private_keyset() -> impl Strategy<Value = Keyset> {
    (1u32..=u32::MAX, any::<[u8; 32]>()).prop_map(|(id, seed)| {
        private_keyset_from_seed(KeyId::new(id), seed).expect("any 32 bytes are a valid secret")
    })
}

/// Parameters for one envelope encryption.
#[derive(Debug, Clone)]
pub struct EnvelopeParams {
    pub payload: Vec<u8>,
    pub access_requirements: AccessRequirements,
    pub recipients: Vec<(Domain, Keyset)>,
}

impl Arbitrary for EnvelopeParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            payload(512),
            access_requirements(),
            prop::collection::btree_map(domain(), private_keyset(), 1..4),
        )
            .prop_map(|(payload, access_requirements, recipients)| EnvelopeParams {
                payload,
                access_requirements,
                recipients: recipients.into_iter().collect(),
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragseal_core::RecipientSet;
    use fragseal_crypto::{
        decrypt_fragment, decrypt_wrapped_key, generate_encrypted_fragment, public_keyset,
        ContentKey,
    };

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_every_recipient_recovers_payload(params: EnvelopeParams) {
            let recipients: RecipientSet = params
                .recipients
                .iter()
                .map(|(d, k)| (d.clone(), public_keyset(k).unwrap()))
                .collect();

            let result = generate_encrypted_fragment(
                &params.payload,
                &params.access_requirements,
                &recipients,
            )
            .unwrap();
            prop_assert_eq!(result.keys().len(), params.recipients.len());

            let mut keys = Vec::new();
            for (domain, private) in &params.recipients {
                let payload = decrypt_wrapped_key(result.key_for(domain).unwrap(), private).unwrap();
                prop_assert_eq!(&payload.access_requirements, &params.access_requirements);

                let key = ContentKey::from_wrapped_payload(&payload).unwrap();
                let plaintext = decrypt_fragment(result.fragment(), &key).unwrap();
                prop_assert_eq!(&plaintext, &params.payload);
                keys.push(payload.key);
            }
            keys.dedup();
            prop_assert_eq!(keys.len(), 1);
        }

        #[test]
        fn test_domain_generator_is_normalized(d in domain()) {
            prop_assert_eq!(Domain::new(d.as_str()).unwrap(), d);
        }
    }
}
