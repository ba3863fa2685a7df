use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fragseal_core::AccessRequirements;
use fragseal_crypto::{decrypt_wrapped_key, generate_encrypted_fragment};
use fragseal_testkit::fixtures::{multi_recipient_fixtures, recipient_set};

fn bench_encrypt(c: &mut Criterion) {
    let requirements: AccessRequirements = ["org.example.Subscription"].into_iter().collect();
    let payload = vec![0x5a; 4096];

    let mut group = c.benchmark_group("generate_encrypted_fragment");
    for count in [1usize, 2, 8] {
        let recipients = recipient_set(&multi_recipient_fixtures(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &recipients, |b, r| {
            b.iter(|| generate_encrypted_fragment(black_box(&payload), &requirements, r).unwrap())
        });
    }
    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let parties = multi_recipient_fixtures(1);
    let requirements: AccessRequirements = ["org.example.Subscription"].into_iter().collect();
    let result =
        generate_encrypted_fragment(b"hello world", &requirements, &recipient_set(&parties))
            .unwrap();
    let blob = result.key_for(&parties[0].domain).unwrap().to_string();

    c.bench_function("decrypt_wrapped_key", |b| {
        b.iter(|| decrypt_wrapped_key(black_box(&blob), &parties[0].private).unwrap())
    });
}

criterion_group!(benches, bench_encrypt, bench_decrypt);
criterion_main!(benches);
