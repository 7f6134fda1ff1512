use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use recrypt_engine::capabilities::SeededRandom;
use recrypt_engine::{
    Capabilities, EncryptedValue, KeyPair, PairingEngine, RecryptScheme, TransformEncryption,
};

type BE = PairingEngine;

/// Benchmarks every protocol step. Key material is created once outside the
/// measured loops; decryption is measured for 0, 1 and 2 hops.
pub fn bench_recrypt(c: &mut Criterion) {
    // Deterministic randomness for repeatable benchmarks
    let scheme = RecryptScheme::<BE>::new(
        Capabilities::default().with_random(Arc::new(SeededRandom::from_seed(0xdead_beef))),
    );
    let signing = scheme
        .generate_signing_key_pair()
        .expect("signing key pair failed");

    c.bench_function("generate_key_pair", |b| {
        b.iter(|| black_box(scheme.generate_key_pair().expect("keygen failed")))
    });

    let keys: Vec<KeyPair<BE>> = (0..3)
        .map(|_| scheme.generate_key_pair().expect("keygen failed"))
        .collect();
    let plaintext = scheme.generate_plaintext().expect("plaintext failed");

    c.bench_function("encrypt", |b| {
        b.iter(|| {
            let value = scheme
                .encrypt(&plaintext, keys[0].public_key(), &signing.public, &signing.private)
                .expect("encrypt failed");
            black_box(value);
        })
    });

    c.bench_function("generate_transform_key", |b| {
        b.iter(|| {
            let tk = scheme
                .generate_transform_key(
                    keys[0].private_key(),
                    keys[1].public_key(),
                    &signing.public,
                    &signing.private,
                )
                .expect("transform key failed");
            black_box(tk);
        })
    });

    let transform_keys: Vec<_> = keys
        .windows(2)
        .map(|pair| {
            scheme
                .generate_transform_key(
                    pair[0].private_key(),
                    pair[1].public_key(),
                    &signing.public,
                    &signing.private,
                )
                .expect("transform key failed")
        })
        .collect();

    // values[i] has been transformed i times and is readable by keys[i]
    let mut values: Vec<EncryptedValue<BE>> = vec![
        scheme
            .encrypt(&plaintext, keys[0].public_key(), &signing.public, &signing.private)
            .expect("encrypt failed"),
    ];
    for tk in &transform_keys {
        let last = values.last().expect("at least one value");
        let next = scheme
            .transform(last, tk, &signing.public, &signing.private)
            .expect("transform failed");
        values.push(next);
    }

    c.bench_function("transform", |b| {
        b.iter(|| {
            let value = scheme
                .transform(&values[0], &transform_keys[0], &signing.public, &signing.private)
                .expect("transform failed");
            black_box(value);
        })
    });

    let mut group = c.benchmark_group("decrypt");
    for (hops, value) in values.iter().enumerate() {
        group.bench_with_input(BenchmarkId::from_parameter(hops), value, |b, value| {
            b.iter(|| {
                let plaintext = scheme
                    .decrypt(value, keys[hops].private_key())
                    .expect("decrypt failed");
                black_box(plaintext);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_recrypt);
criterion_main!(benches);
