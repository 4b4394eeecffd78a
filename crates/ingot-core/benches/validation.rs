//! Validation benchmarks for ingot.
//!
//! Measures the per-entry checks that run for every archive entry:
//! - Path safety (target: < 1 us per entry)
//! - Media classification
//! - Compression ratio checks
//! - Structure checks over a full entry list

#![allow(clippy::unwrap_used, missing_docs)]

use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use ingot_core::ExtractedEntry;
use ingot_core::SafePath;
use ingot_core::ValidationLimits;
use ingot_core::classify;
use ingot_core::is_safe_path;
use ingot_core::relocate::detect_wrapper;
use ingot_core::security::structure::check_entries;
use ingot_core::security::validate_compression_ratio;
use std::hint::black_box;

fn benchmark_path_safety(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_safety");

    group.bench_function("simple", |b| {
        b.iter(|| is_safe_path(black_box("export/audio/a.wav")));
    });

    group.bench_function("with_dot_components", |b| {
        b.iter(|| is_safe_path(black_box("./export/./audio/./a.wav")));
    });

    group.bench_function("backslashes", |b| {
        b.iter(|| is_safe_path(black_box("export\\audio\\a.wav")));
    });

    // Should fail fast
    group.bench_function("traversal_reject", |b| {
        b.iter(|| is_safe_path(black_box("export/../../etc/passwd")));
    });

    group.bench_function("strip_wrapper", |b| {
        let path = SafePath::parse("root/dalle-generations/img.webp").unwrap();
        b.iter(|| black_box(&path).strip_prefix_segment(black_box("root")));
    });

    group.finish();
}

fn benchmark_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for (name, path) in [
        ("prefix_match", "file-abc123-report.pdf"),
        ("extension_match", "photos/2024/IMG_0001.HEIC"),
        ("video_last_rule", "clips/demo.m4v"),
        ("no_match", "conversations.json"),
    ] {
        group.bench_function(name, |b| b.iter(|| classify(black_box(path))));
    }

    group.finish();
}

fn benchmark_compression_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_ratio");

    group.bench_function("normal_ratio", |b| {
        b.iter(|| validate_compression_ratio(black_box(1000), black_box(2000), black_box(100.0)));
    });

    group.bench_function("bomb_ratio_reject", |b| {
        b.iter(|| {
            validate_compression_ratio(black_box(100), black_box(100_000_000), black_box(100.0))
        });
    });

    group.finish();
}

fn benchmark_entry_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_list");

    let entries: Vec<ExtractedEntry> = std::iter::once(ExtractedEntry::directory("export/"))
        .chain((0..10_000).map(|i| ExtractedEntry::file(format!("export/dir_{}/file_{i}.json", i % 50), 512)))
        .collect();
    let limits = ValidationLimits::default();

    group.bench_function("check_10k_entries", |b| {
        b.iter(|| check_entries(black_box(&entries), black_box(1_000_000), black_box(&limits)));
    });

    group.bench_function("detect_wrapper_10k", |b| {
        b.iter(|| detect_wrapper(black_box(&entries)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_path_safety,
    benchmark_classify,
    benchmark_compression_ratio,
    benchmark_entry_list
);
criterion_main!(benches);
