//! Prepend latency benchmarks.
//!
//! Measures the per-thread prepend path in the steady state (no growth)
//! and under overflow, where every prepend truncates the oldest context.

use criterion::{Criterion, criterion_group, criterion_main};
use errstr::{BufferLimits, ErrorBuffer};
use std::hint::black_box;

fn bench_prepend_steady(c: &mut Criterion) {
    c.bench_function("prepend_steady", |b| {
        b.iter(|| {
            errstr::clear();
            errstr::errstr!("{}", black_box("file not found"));
            errstr::errstr!("open {:?} failed: ", black_box("/etc/app.toml"));
            errstr::errstr!("config load failed: ");
        });
    });
}

fn bench_prepend_overflow(c: &mut Criterion) {
    let mut buf = ErrorBuffer::try_new(BufferLimits::DEFAULT).expect("alloc");
    for i in 0..1024 {
        buf.prepend_fmt(format_args!("context {i}: "));
    }

    c.bench_function("prepend_overflow_keep_newest", |b| {
        b.iter(|| {
            black_box(buf.prepend_fmt(format_args!("retry {}: ", black_box(42))));
        });
    });
}

fn bench_read_contents(c: &mut Criterion) {
    errstr::clear();
    errstr::errstr!("{}", "a".repeat(200));

    c.bench_function("with_contents_len", |b| {
        b.iter(|| black_box(errstr::with_contents(str::len)));
    });
}

criterion_group!(
    benches,
    bench_prepend_steady,
    bench_prepend_overflow,
    bench_read_contents
);
criterion_main!(benches);
