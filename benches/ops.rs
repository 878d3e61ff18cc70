//! Batch operation benchmarks against scalar loops.

use std::hint::black_box;

use batchly::simd::traits::{SimdBatch, SimdInt, SimdLoad, SimdStore};
use batchly::simd::{F32s, I32s, U8s};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VECTOR_SIZES: &[usize] = &[1_024, 16_384, 262_144, 1_048_576];

fn generate_f32(len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.random_range(-100.0..100.0)).collect()
}

fn generate_u8(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.random()).collect()
}

fn batched_mul_add(a: &[f32], b: &[f32], out: &mut [f32]) {
    let lanes = F32s::LANES;
    for ((ca, cb), co) in a
        .chunks_exact(lanes)
        .zip(b.chunks_exact(lanes))
        .zip(out.chunks_exact_mut(lanes))
    {
        unsafe {
            let x = F32s::load_unaligned(ca.as_ptr());
            let y = F32s::load_unaligned(cb.as_ptr());
            (x * y + x).store_unaligned_at(co.as_mut_ptr());
        }
    }
}

fn benchmark_mul_add(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("mul_add {size}"));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let a = generate_f32(size);
        let b = generate_f32(size);
        let mut out = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("Scalar", size), &size, |bench, _| {
            bench.iter(|| {
                for i in 0..size {
                    out[i] = a[i] * b[i] + a[i];
                }
                black_box(&out);
            })
        });

        group.bench_with_input(BenchmarkId::new("Batched", size), &size, |bench, _| {
            bench.iter(|| {
                batched_mul_add(black_box(&a), black_box(&b), &mut out);
                black_box(&out);
            })
        });

        group.finish();
    }
}

fn benchmark_hadd(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("reduce {size}"));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<i32>()) as u64));

        let mut rng = StdRng::seed_from_u64(7);
        let data: Vec<i32> = (0..size).map(|_| rng.random_range(-1000..1000)).collect();

        group.bench_with_input(BenchmarkId::new("Scalar", size), &size, |bench, _| {
            bench.iter(|| black_box(data.iter().fold(0i32, |acc, &v| acc.wrapping_add(v))))
        });

        group.bench_with_input(BenchmarkId::new("Batched", size), &size, |bench, _| {
            bench.iter(|| {
                let mut acc = I32s::splat(0);
                for chunk in data.chunks_exact(I32s::LANES) {
                    acc = acc + unsafe { I32s::load_unaligned(chunk.as_ptr()) };
                }
                black_box(acc.hadd())
            })
        });

        group.finish();
    }
}

fn benchmark_saturating_add(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("sadd_u8 {size}"));
        group.throughput(Throughput::Bytes(size as u64));

        let a = generate_u8(size);
        let b = generate_u8(size);
        let mut out = vec![0u8; size];

        group.bench_with_input(BenchmarkId::new("Scalar", size), &size, |bench, _| {
            bench.iter(|| {
                for i in 0..size {
                    out[i] = a[i].saturating_add(b[i]);
                }
                black_box(&out);
            })
        });

        group.bench_with_input(BenchmarkId::new("Batched", size), &size, |bench, _| {
            bench.iter(|| {
                for ((ca, cb), co) in a
                    .chunks_exact(U8s::LANES)
                    .zip(b.chunks_exact(U8s::LANES))
                    .zip(out.chunks_exact_mut(U8s::LANES))
                {
                    unsafe {
                        let x = U8s::load_unaligned(ca.as_ptr());
                        let y = U8s::load_unaligned(cb.as_ptr());
                        x.sadd(y).store_unaligned_at(co.as_mut_ptr());
                    }
                }
                black_box(&out);
            })
        });

        group.finish();
    }
}

criterion_group!(
    benches,
    benchmark_mul_add,
    benchmark_hadd,
    benchmark_saturating_add
);
criterion_main!(benches);
