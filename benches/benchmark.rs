//! Benchmarks for Lorenz SZ40 machine operations.
//!
//! Measures key generation, raw wheel stepping, and text encryption and
//! decryption throughput under both shift stepping rules.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lorenz_sz40::{keygen, Decryptor, Encryptor, MachineConfig, ShiftStepping, StepEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed used consistently across all benchmarks.
const BENCH_SEED: u64 = 0x5A40_1943;

/// Mixed letters/figures message, about one teleprinter line.
const BENCH_TEXT: &str = "SUPPLY COLUMN 7 ARRIVES 0415 AT GRID 22/96, ESCORT (3) TANKS. ";

/// Benchmarks `keygen::generate_with_rng()`.
fn bench_keygen(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(BENCH_SEED);
    c.bench_function("keygen", |b| {
        b.iter(|| black_box(keygen::generate_with_rng(&mut rng)));
    });
}

/// Benchmarks one keystream character (sense + step).
///
/// The engine is created once and its wheels advance naturally between
/// iterations.
fn bench_keystream(c: &mut Criterion) {
    let key = keygen::generate_with_rng(&mut StdRng::seed_from_u64(BENCH_SEED));
    let mut engine = StepEngine::new(&key);

    let mut group = c.benchmark_group("keystream");
    group.throughput(Throughput::Elements(1));
    group.bench_function("next_keystream", |b| {
        b.iter(|| black_box(engine.next_keystream()));
    });
    group.finish();
}

/// Benchmarks whole-message encryption and decryption per shift rule.
fn bench_message(c: &mut Criterion) {
    let key = keygen::generate_with_rng(&mut StdRng::seed_from_u64(BENCH_SEED));

    let mut group = c.benchmark_group("message");
    group.throughput(Throughput::Bytes(BENCH_TEXT.len() as u64));

    for stepping in [ShiftStepping::OwnCycle, ShiftStepping::Combined] {
        let config = MachineConfig::default().with_shift_stepping(stepping);
        let cipher = Encryptor::new(&key, &config)
            .encrypt_str(BENCH_TEXT)
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("encrypt", format!("{:?}", stepping)),
            &config,
            |b, config| {
                b.iter(|| {
                    Encryptor::new(&key, config)
                        .encrypt_str(black_box(BENCH_TEXT))
                        .unwrap()
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("decrypt", format!("{:?}", stepping)),
            &config,
            |b, config| {
                b.iter(|| {
                    Decryptor::new(&key, config)
                        .decrypt_units(black_box(&cipher))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_keygen, bench_keystream, bench_message);
criterion_main!(benches);
