#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use fpast2l::Engine;

fn key() -> Vec<u8> {
    vec![0x42u8; fpast2l::KEY_SIZE]
}

fn bench_encrypt(c: &mut Criterion) {
    let eng = Engine::new(&key()).unwrap();
    let typical = vec![0u8; 128];
    let large = vec![0u8; 4096];

    let mut group = c.benchmark_group("encrypt");
    group.bench_function("typical_payload", |b| {
        b.iter(|| eng.encrypt(std::hint::black_box(typical.clone())));
    });
    group.bench_function("large_payload", |b| {
        b.iter(|| eng.encrypt(std::hint::black_box(large.clone())));
    });
    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let eng = Engine::new(&key()).unwrap();
    let typical_token = eng.encrypt(vec![0u8; 128]);
    let large_token = eng.encrypt(vec![0u8; 4096]);

    let mut group = c.benchmark_group("decrypt");
    group.bench_function("typical_payload", |b| {
        b.iter(|| eng.decrypt(Vec::new(), std::hint::black_box(&typical_token)).unwrap());
    });
    group.bench_function("large_payload", |b| {
        b.iter(|| eng.decrypt(Vec::new(), std::hint::black_box(&large_token)).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_encrypt, bench_decrypt);
criterion_main!(benches);
