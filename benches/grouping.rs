//! Grouping and scanning benchmarks
//!
//! Benchmarks for:
//! - Grouping synthetic file lists of increasing size
//! - A full scan of a generated HuggingFace cache tree

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use model_janitor::models::group_files;
use model_janitor::{ArtifactFile, ArtifactType, Inventory, ModelSource};
use std::hint::black_box;
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Files spread over `repos` repositories, every fifth one ungrouped
fn synthetic_files(count: usize, repos: usize) -> Vec<ArtifactFile> {
    (0..count)
        .map(|i| {
            let name = format!("model-{:05}-of-{:05}.safetensors", i, count);
            let repo = (i % 5 != 0).then(|| format!("org/repo-{}", i % repos));
            ArtifactFile {
                id: format!("llamacpp-{}", name),
                path: PathBuf::from("/cache").join(&name),
                file_type: ArtifactType::from_file_name(&name),
                name,
                size: (i as u64 + 1) * 4096,
                revision: None,
                last_modified: Utc::now(),
                repo,
            }
        })
        .collect()
}

fn bench_group_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_files");

    for count in [100, 1_000, 10_000] {
        let files = synthetic_files(count, 50);
        group.bench_with_input(BenchmarkId::from_parameter(count), &files, |b, files| {
            b.iter(|| black_box(group_files(files.clone(), ModelSource::LlamaCpp)));
        });
    }

    group.finish();
}

fn bench_scan_all(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let hf = dir.path().join("hub");

    for repo in 0..20 {
        let rev = hf.join(format!("models--org--repo-{}/snapshots/main", repo));
        std::fs::create_dir_all(&rev).unwrap();
        for shard in 0..10 {
            std::fs::write(rev.join(format!("model-{}.safetensors", shard)), b"x").unwrap();
        }
        std::fs::write(rev.join("config.json"), b"{}").unwrap();
    }

    let inventory = Inventory::new(&hf, dir.path().join("llama"));

    c.bench_function("scan_all_200_files", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(inventory.scan_all().await) });
    });
}

criterion_group!(benches, bench_group_files, bench_scan_all);
criterion_main!(benches);
