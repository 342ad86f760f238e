// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use msgpgen_wire::{append_array_header, append_int64, append_string, Raw};

fn bench_append(c: &mut Criterion) {
    c.bench_function("append_int64_x1000", |bench| {
        bench.iter(|| {
            let mut b = Vec::new();
            for i in -500..500i64 {
                append_int64(&mut b, black_box(i * 977));
            }
            b
        });
    });

    let text = "x".repeat(64);
    c.bench_function("append_string_64b_x100", |bench| {
        bench.iter(|| {
            let mut b = Vec::new();
            for _ in 0..100 {
                append_string(&mut b, black_box(&text));
            }
            b
        });
    });
}

fn bench_raw(c: &mut Criterion) {
    let mut encoded = Vec::new();
    append_array_header(&mut encoded, 64);
    for i in 0..64i64 {
        append_int64(&mut encoded, i * -1_000);
    }
    c.bench_function("raw_unmarshal_array64", |bench| {
        bench.iter(|| {
            let mut raw = Raw::default();
            raw.unmarshal_msg(black_box(&encoded)).map(|rest| rest.len())
        });
    });
}

criterion_group!(benches, bench_append, bench_raw);
criterion_main!(benches);
