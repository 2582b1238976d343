//! Codec throughput benchmarks
//!
//! Measures the synchronous provider paths (buffer, brotli, zstd) across
//! input sizes. The streaming provider is async and yields cooperatively,
//! which makes it unsuitable for Criterion's tight iteration loops; use the
//! CLI with a large file for end-to-end streaming numbers.

use compress_bench::provider::{CodecHost, Family, ProviderKind};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn sample_data(size: usize) -> Vec<u8> {
    // Compressible but not trivial: repeating phrase with a rolling counter
    let phrase = b"pack my box with five dozen liquor jugs ";
    let mut data = Vec::with_capacity(size);
    let mut counter = 0u8;
    while data.len() < size {
        data.extend_from_slice(phrase);
        data.push(counter);
        counter = counter.wrapping_add(1);
    }
    data.truncate(size);
    data
}

fn bench_compress_by_size(c: &mut Criterion) {
    let host = CodecHost::new();
    let mut group = c.benchmark_group("compress");

    let codecs = [
        ("deflate_buffer", ProviderKind::Buffer, Family::Deflate, Some(6)),
        ("zlib_buffer", ProviderKind::Buffer, Family::Zlib, Some(6)),
        ("brotli", ProviderKind::BrotliEngine, Family::Brotli, Some(6)),
        ("zstd", ProviderKind::ZstdEngine, Family::Zstd, Some(3)),
    ];

    for size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let data = sample_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for (name, provider, family, level) in codecs {
            group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
                b.iter(|| {
                    black_box(
                        host.compress_sync(provider, family, level, black_box(data))
                            .unwrap(),
                    )
                })
            });
        }
    }

    group.finish();
}

fn bench_decompress_by_size(c: &mut Criterion) {
    let host = CodecHost::new();
    let mut group = c.benchmark_group("decompress");

    let codecs = [
        ("deflate_buffer", ProviderKind::Buffer, Family::Deflate, Some(6)),
        ("zlib_buffer", ProviderKind::Buffer, Family::Zlib, Some(6)),
        ("brotli", ProviderKind::BrotliEngine, Family::Brotli, Some(6)),
        ("zstd", ProviderKind::ZstdEngine, Family::Zstd, Some(3)),
    ];

    for size in [64 * 1024, 1024 * 1024] {
        let data = sample_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for (name, provider, family, level) in codecs {
            let compressed = host.compress_sync(provider, family, level, &data).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &compressed, |b, payload| {
                b.iter(|| {
                    black_box(
                        host.decompress_sync(provider, family, black_box(payload))
                            .unwrap(),
                    )
                })
            });
        }
    }

    group.finish();
}

fn bench_zstd_levels(c: &mut Criterion) {
    let host = CodecHost::new();
    let data = sample_data(256 * 1024);
    let mut group = c.benchmark_group("zstd_levels");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for level in [1, 3, 10, 19] {
        group.bench_with_input(BenchmarkId::from_parameter(level), &data, |b, data| {
            b.iter(|| {
                black_box(
                    host.compress_sync(
                        ProviderKind::ZstdEngine,
                        Family::Zstd,
                        Some(level),
                        black_box(data),
                    )
                    .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compress_by_size,
    bench_decompress_by_size,
    bench_zstd_levels
);
criterion_main!(benches);
