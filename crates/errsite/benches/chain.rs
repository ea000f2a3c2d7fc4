// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(
    missing_docs,
    clippy::unwrap_used,
    reason = "Benchmarks don't require documentation and should fail fast on errors"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use errsite::{AnnotatedError, Link};

const DEPTH: usize = 32;

fn deep_chain(base: &Link) -> AnnotatedError {
    let mut error = errsite::wrap!(base.clone(), "level", "0");
    for level in 1..DEPTH {
        error = errsite::wrapf!(error, "level {level}");
    }
    error
}

fn entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    group.bench_function("new", |b| {
        b.iter(|| errsite::new!(black_box("db"), "timeout"));
    });

    group.bench_function("wrap_foreign", |b| {
        b.iter(|| errsite::wrap!(std::io::Error::other("disk full"), "saving file"));
    });

    let base = Link::new(std::io::Error::other("disk full"));
    let chain = deep_chain(&base);

    group.bench_function("render_deep", |b| {
        b.iter(|| black_box(&chain).to_string());
    });

    group.bench_function("is_deep", |b| {
        b.iter(|| black_box(&chain).is(black_box(&base)));
    });

    group.bench_function("root_cause_deep", |b| {
        b.iter(|| black_box(&chain).root_cause());
    });

    let members: Vec<Link> = (0..DEPTH).map(|i| Link::new(format!("member {i}"))).collect();
    group.bench_function("join", |b| {
        b.iter(|| errsite::join(errsite::site!(), members.iter().cloned().map(Some)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, entry);
criterion_main!(benches);
