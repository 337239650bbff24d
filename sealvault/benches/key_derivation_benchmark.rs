// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Benchmarks the composite-key strengthening loop (§4.1) across a range
//! of round counts, so a regression in `derive_composite_key` itself
//! (rather than just a changed round count) shows up as a throughput
//! change at a fixed round count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sealvault_domain::services::derive_composite_key;
use sealvault_domain::value_objects::KeySource;

fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_composite_key");

    for rounds in [1_000u64, 10_000, 60_000] {
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let sources = vec![KeySource::Passphrase(b"correct horse battery staple".to_vec())];
                let key = derive_composite_key(&sources, &[0x11u8; 32], rounds, &[0x22u8; 32], None).unwrap();
                black_box(key);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_key_derivation);
criterion_main!(benches);
