//! Cache scanners
//!
//! Two on-disk conventions are understood. HuggingFace hub cache:
//! ```text
//! ~/.cache/huggingface/hub/
//! ├── models--BAAI--bge-small-en-v1.5/
//! │   ├── blobs/
//! │   ├── refs/
//! │   └── snapshots/
//! │       └── {revision}/
//! │           ├── config.json        -> ../../blobs/...
//! │           └── model.safetensors  -> ../../blobs/...
//! └── models--TheBloke--Llama-2-7B-GGUF/
//!     └── ...
//! ```
//! llama.cpp cache:
//! ```text
//! ~/.cache/llama.cpp/
//! ├── gemma-3-1b-it-Q4_K_M.gguf
//! └── gemma-3-1b-it-Q4_K_M.gguf.json   (optional, {"url": "https://huggingface.co/..."})
//! ```
//!
//! Scanning never fails. A missing or unreadable directory at any level simply
//! contributes no files, and a file that vanishes mid-scan is skipped.

use super::infer::{
    GGUF_SUFFIX, HF_REPO_DIR_PREFIX, METADATA_SUFFIX, repo_from_cache_dir_name,
    repo_from_sidecar, sidecar_name,
};
use super::types::{ArtifactFile, ArtifactType, ModelSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A cache layout that can be walked into raw artifact records
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Source tag attached to every group built from this scanner's output
    fn source(&self) -> ModelSource;

    /// Walk `root` and return every retained file
    ///
    /// `root` does not need to exist.
    async fn scan(&self, root: &Path) -> Vec<ArtifactFile>;
}

/// Scanner for the HuggingFace repo-snapshot layout
#[derive(Debug, Default, Clone, Copy)]
pub struct HfSnapshotScanner;

/// Scanner for the llama.cpp flat-file layout
#[derive(Debug, Default, Clone, Copy)]
pub struct LlamaCppScanner;

/// Directory entry with its (non-followed) file type
struct Entry {
    name: String,
    path: PathBuf,
    file_type: FileType,
}

impl Entry {
    fn is_file_like(&self) -> bool {
        self.file_type.is_file() || self.file_type.is_symlink()
    }
}

/// List the immediate children of `dir`
///
/// Returns an empty list if the directory is missing or unreadable.
async fn list_dir(dir: &Path) -> Vec<Entry> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!(path = ?dir, error = %e, "Skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                // Entry removed between listing and stat
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                entries.push(Entry {
                    name: entry.file_name().to_string_lossy().to_string(),
                    path: entry.path(),
                    file_type,
                });
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(path = ?dir, error = %e, "Directory listing interrupted");
                break;
            }
        }
    }

    entries
}

/// Metadata for a file, following symlinks when the target resolves
///
/// A dangling symlink falls back to the link's own metadata. Returns `None` if
/// the path is gone or resolves to a directory.
async fn stat_file(path: &Path) -> Option<Metadata> {
    let metadata = match fs::metadata(path).await {
        Ok(m) => m,
        Err(_) => match fs::symlink_metadata(path).await {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(path = ?path, error = %e, "File vanished during scan");
                return None;
            }
        },
    };

    if metadata.is_dir() {
        return None;
    }

    Some(metadata)
}

fn modified_at(metadata: &Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_default()
}

impl HfSnapshotScanner {
    async fn scan_repo_dir(&self, repo_dir: &Entry) -> Vec<ArtifactFile> {
        let repo = repo_from_cache_dir_name(&repo_dir.name);
        let snapshots = list_dir(&repo_dir.path.join("snapshots")).await;

        let revisions = snapshots.iter().filter(|e| e.file_type.is_dir());
        let per_revision = join_all(
            revisions.map(|revision| self.scan_revision(&repo_dir.name, revision, repo.as_deref())),
        )
        .await;

        per_revision.into_iter().flatten().collect()
    }

    async fn scan_revision(
        &self,
        repo_dir_name: &str,
        revision: &Entry,
        repo: Option<&str>,
    ) -> Vec<ArtifactFile> {
        let mut files = Vec::new();

        for entry in list_dir(&revision.path).await {
            if !entry.is_file_like() {
                continue;
            }

            let file_type = ArtifactType::from_file_name(&entry.name);
            if file_type == ArtifactType::Other && !entry.name.ends_with(METADATA_SUFFIX) {
                continue;
            }

            let Some(metadata) = stat_file(&entry.path).await else {
                continue;
            };

            files.push(ArtifactFile {
                id: format!("{}/{}/{}", repo_dir_name, revision.name, entry.name),
                size: metadata.len(),
                last_modified: modified_at(&metadata),
                file_type,
                revision: Some(revision.name.clone()),
                repo: repo.map(str::to_string),
                name: entry.name,
                path: entry.path,
            });
        }

        files
    }
}

#[async_trait]
impl Scanner for HfSnapshotScanner {
    fn source(&self) -> ModelSource {
        ModelSource::HuggingFace
    }

    async fn scan(&self, root: &Path) -> Vec<ArtifactFile> {
        let entries = list_dir(root).await;

        let repo_dirs = entries
            .iter()
            .filter(|e| e.file_type.is_dir() && e.name.starts_with(HF_REPO_DIR_PREFIX));
        let per_repo = join_all(repo_dirs.map(|dir| self.scan_repo_dir(dir))).await;

        let files: Vec<ArtifactFile> = per_repo.into_iter().flatten().collect();
        tracing::debug!(root = ?root, files = files.len(), "Scanned HuggingFace cache");
        files
    }
}

#[async_trait]
impl Scanner for LlamaCppScanner {
    fn source(&self) -> ModelSource {
        ModelSource::LlamaCpp
    }

    async fn scan(&self, root: &Path) -> Vec<ArtifactFile> {
        let mut files = Vec::new();

        for entry in list_dir(root).await {
            if !entry.is_file_like()
                || !entry.name.ends_with(GGUF_SUFFIX)
                || entry.name.ends_with(METADATA_SUFFIX)
            {
                continue;
            }

            let Some(metadata) = stat_file(&entry.path).await else {
                continue;
            };

            let repo = match fs::read_to_string(root.join(sidecar_name(&entry.name))).await {
                Ok(content) => repo_from_sidecar(&content),
                Err(_) => None,
            };

            files.push(ArtifactFile {
                id: format!("llamacpp-{}", entry.name),
                size: metadata.len(),
                last_modified: modified_at(&metadata),
                file_type: ArtifactType::from_file_name(&entry.name),
                revision: None,
                repo,
                name: entry.name,
                path: entry.path,
            });
        }

        tracing::debug!(root = ?root, files = files.len(), "Scanned llama.cpp cache");
        files
    }
}
