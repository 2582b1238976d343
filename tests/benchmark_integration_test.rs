//! End-to-end benchmark runs through the public API
//!
//! These tests drive real codecs against small inputs, so they exercise the
//! full probe → plan → measure → verify pipeline rather than mocks.

use bytes::Bytes;
use compress_bench::config::{AlgorithmSpec, BenchmarkConfig};
use compress_bench::planner::plan_tasks;
use compress_bench::provider::{CodecHost, Family, ProviderKind};
use compress_bench::runner::run_benchmarks;
use compress_bench::summary::{best_per_family, best_values};

fn spec(
    id: &str,
    family: Family,
    provider: ProviderKind,
    levels: Vec<u32>,
) -> AlgorithmSpec {
    AlgorithmSpec {
        id: id.into(),
        name: format!("{} ({})", family.display(), provider.tag()),
        family,
        enabled: true,
        supports_levels: !levels.is_empty(),
        available_levels: (0..=22).collect(),
        levels,
        extension: family.extension().into(),
        provider,
        supported: true,
    }
}

#[tokio::test]
async fn test_leveled_run_produces_one_result_per_level() {
    let host = CodecHost::new();
    let data = Bytes::from(vec![0u8; 1000]);
    let config = BenchmarkConfig {
        iterations: 3,
        algorithms: vec![spec("deflate-mz", Family::Deflate, ProviderKind::Buffer, vec![1, 9])],
    };

    let results = run_benchmarks(&host, &data, &config, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for r in &results {
        assert!(r.verified);
        assert!(r.compressed_size < r.original_size);
        assert_eq!(r.original_size, 1000);
        assert_eq!(r.iterations, 3);
        assert!(r.compression_ratio > 1.0);
    }
    assert_eq!(results[0].level, Some(1));
    assert_eq!(results[1].level, Some(9));
}

#[tokio::test]
async fn test_full_default_catalog_round_trips() {
    let host = CodecHost::new();
    let mut config = BenchmarkConfig::detect(&host).await;
    config.iterations = 1;
    // Keep the run quick: one level per leveled entry
    for s in &mut config.algorithms {
        if s.supports_levels {
            s.set_levels(&[6]);
        }
    }

    let data = Bytes::from(b"the quick brown fox jumps over the lazy dog ".repeat(64));
    let results = run_benchmarks(&host, &data, &config, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(results.len(), config.planned_task_count());
    for r in &results {
        assert!(r.verified, "{} failed round-trip verification", r.algorithm);
        assert!(r.compressed_size > 0);
        assert!(r.compress_time.min_ms <= r.compress_time.avg_ms);
        assert!(r.compress_time.avg_ms <= r.compress_time.max_ms);
    }
}

#[tokio::test]
async fn test_planner_matches_predicted_count() {
    let host = CodecHost::new();
    let config = BenchmarkConfig::detect(&host).await;
    assert_eq!(plan_tasks(&config).len(), config.planned_task_count());
    // Planning twice yields the identical list
    assert_eq!(plan_tasks(&config), plan_tasks(&config));
}

#[tokio::test]
async fn test_unsupported_family_task_vanishes_without_failing_run() {
    let host = CodecHost::new();
    let data = Bytes::from(vec![7u8; 256]);
    // The buffer provider has no zstd codec; its task must fail and be dropped
    let config = BenchmarkConfig {
        iterations: 1,
        algorithms: vec![
            spec("bogus", Family::Zstd, ProviderKind::Buffer, vec![3]),
            spec("zlib-mz", Family::Zlib, ProviderKind::Buffer, vec![6]),
        ],
    };

    let results = run_benchmarks(&host, &data, &config, |_, _, _| {})
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].family, Family::Zlib);
}

#[tokio::test]
async fn test_progress_reports_before_each_task_and_completion() {
    let host = CodecHost::new();
    let data = Bytes::from(vec![0u8; 128]);
    let config = BenchmarkConfig {
        iterations: 1,
        algorithms: vec![
            spec("deflate-mz", Family::Deflate, ProviderKind::Buffer, vec![1, 6, 9]),
            spec("gzip-stream", Family::Gzip, ProviderKind::Stream, vec![]),
        ],
    };

    let mut calls = Vec::new();
    run_benchmarks(&host, &data, &config, |done, total, label| {
        calls.push((done, total, label.to_string()));
    })
    .await
    .unwrap();

    assert_eq!(calls.len(), 5);
    for (i, (done, total, _)) in calls.iter().take(4).enumerate() {
        assert_eq!(*done, i);
        assert_eq!(*total, 4);
    }
    assert_eq!(calls[4], (4, 4, "Complete".to_string()));
}

#[tokio::test]
async fn test_best_marking_over_real_results() {
    let host = CodecHost::new();
    let data = Bytes::from(b"abcabcabc".repeat(500));
    let config = BenchmarkConfig {
        iterations: 1,
        algorithms: vec![
            spec("deflate-mz", Family::Deflate, ProviderKind::Buffer, vec![1, 9]),
            spec("zstd", Family::Zstd, ProviderKind::ZstdEngine, vec![3]),
        ],
    };

    let results = run_benchmarks(&host, &data, &config, |_, _, _| {})
        .await
        .unwrap();
    assert_eq!(results.len(), 3);

    let best = best_values(&results).unwrap();
    // Exactly the entries matching each extremum are marked best
    let ratio_best: Vec<_> = results.iter().filter(|r| best.is_best_ratio(r)).collect();
    assert!(!ratio_best.is_empty());
    for r in &ratio_best {
        assert_eq!(r.compression_ratio, best.best_ratio);
    }

    // One winner per family present in the results
    let per_family = best_per_family(&results);
    assert_eq!(per_family.len(), 2);
    let families: Vec<Family> = per_family.iter().map(|r| r.family).collect();
    assert!(families.contains(&Family::Deflate));
    assert!(families.contains(&Family::Zstd));
}

#[tokio::test]
async fn test_incompressible_input_reports_negative_reduction() {
    let host = CodecHost::new();
    // 64 distinct bytes repeated once: tiny input, headers dominate
    let data = Bytes::from((0u8..64).collect::<Vec<u8>>());
    let config = BenchmarkConfig {
        iterations: 1,
        algorithms: vec![spec("gzip-stream", Family::Gzip, ProviderKind::Stream, vec![])],
    };

    let results = run_benchmarks(&host, &data, &config, |_, _, _| {})
        .await
        .unwrap();
    let r = &results[0];
    assert!(r.verified);
    assert!(r.compressed_size > r.original_size);
    assert!(r.compression_loss_pct < 0.0);
    assert!(r.compression_ratio < 1.0);
}
