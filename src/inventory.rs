//! Inventory across all known caches
//!
//! Each scan walks every configured cache root from scratch. Nothing is kept
//! between calls, so concurrent scans are safe but do redundant I/O.

use crate::config::JanitorConfig;
use crate::error::{JanitorError, JanitorResult};
use crate::models::{
    HfSnapshotScanner, LlamaCppScanner, ModelGroup, ModelSource, Scanner, delete_group,
    format_bytes, group_files, sort_by_size,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// A scanner bound to the directory it walks
#[derive(Clone)]
pub struct CacheRoot {
    scanner: Arc<dyn Scanner>,
    root: PathBuf,
}

impl CacheRoot {
    pub fn new(scanner: Arc<dyn Scanner>, root: impl Into<PathBuf>) -> Self {
        Self {
            scanner,
            root: root.into(),
        }
    }

    pub fn source(&self) -> ModelSource {
        self.scanner.source()
    }

    /// Scan and group this root; groups never mix sources
    async fn scan(&self) -> Vec<ModelGroup> {
        let files = self.scanner.scan(&self.root).await;
        group_files(files, self.scanner.source())
    }
}

/// Model inventory over the HuggingFace and llama.cpp caches
#[derive(Clone)]
pub struct Inventory {
    roots: Vec<CacheRoot>,
}

impl Inventory {
    /// Create an inventory over the two standard cache layouts
    pub fn new(hf_cache_dir: impl Into<PathBuf>, llamacpp_cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_roots(vec![
            CacheRoot::new(Arc::new(HfSnapshotScanner), hf_cache_dir),
            CacheRoot::new(Arc::new(LlamaCppScanner), llamacpp_cache_dir),
        ])
    }

    pub fn with_roots(roots: Vec<CacheRoot>) -> Self {
        Self { roots }
    }

    pub fn from_config(config: &JanitorConfig) -> Self {
        Self::new(
            config.hf_cache_dir.clone(),
            config.llamacpp_cache_dir.clone(),
        )
    }

    /// Scan every cache and return all models, largest first
    ///
    /// Never fails: missing or unreadable caches contribute nothing.
    pub async fn scan_all(&self) -> Vec<ModelGroup> {
        let per_root = join_all(self.roots.iter().map(|root| root.scan())).await;

        let mut groups: Vec<ModelGroup> = per_root.into_iter().flatten().collect();
        sort_by_size(&mut groups);

        tracing::info!(
            models = groups.len(),
            total_bytes = groups.iter().map(|g| g.total_size).sum::<u64>(),
            "Scan complete"
        );
        crate::metrics::record_scan(&groups);

        groups
    }

    /// Rescan and return the model with the given id
    ///
    /// The same repository cached by both layouts yields two groups with one
    /// id; `source` picks between them, and without it the lookup is rejected
    /// as ambiguous.
    pub async fn find(&self, id: &str, source: Option<ModelSource>) -> JanitorResult<ModelGroup> {
        let mut matches: Vec<ModelGroup> = self
            .scan_all()
            .await
            .into_iter()
            .filter(|g| g.id == id && source.is_none_or(|s| g.source == s))
            .collect();

        match matches.len() {
            0 => Err(JanitorError::ModelNotFound { id: id.to_string() }),
            1 => Ok(matches.remove(0)),
            _ => Err(JanitorError::AmbiguousId { id: id.to_string() }),
        }
    }

    /// Delete every file of a previously returned model
    pub async fn delete(&self, group: &ModelGroup) -> bool {
        let deleted = delete_group(group).await;

        if deleted {
            tracing::info!(
                model = %group.repo,
                files = group.files.len(),
                bytes = group.total_size,
                "Deleted model"
            );
        }
        crate::metrics::record_deletion(group.source, deleted);

        deleted
    }

    /// Rescan, look up a model by id and delete it
    pub async fn delete_by_id(
        &self,
        id: &str,
        source: Option<ModelSource>,
    ) -> JanitorResult<ModelGroup> {
        let group = self.find(id, source).await?;

        if self.delete(&group).await {
            Ok(group)
        } else {
            Err(JanitorError::DeletionFailed { id: id.to_string() })
        }
    }
}

/// Aggregate figures over an inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_models: usize,
    pub total_size: u64,
    pub size_formatted: String,
    pub huggingface_count: usize,
    pub llamacpp_count: usize,
}

pub fn summarize(groups: &[ModelGroup]) -> InventorySummary {
    let total_size: u64 = groups.iter().map(|g| g.total_size).sum();
    let count = |source: ModelSource| groups.iter().filter(|g| g.source == source).count();

    InventorySummary {
        total_models: groups.len(),
        total_size,
        size_formatted: format_bytes(total_size),
        huggingface_count: count(ModelSource::HuggingFace),
        llamacpp_count: count(ModelSource::LlamaCpp),
    }
}

/// Source and free-text filter over models
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFilter {
    /// Keep only this source; `None` keeps all
    pub source: Option<ModelSource>,
    /// Case-insensitive substring of repo or subtitle
    #[serde(rename = "q")]
    pub query: Option<String>,
}

impl ModelFilter {
    pub fn matches(&self, group: &ModelGroup) -> bool {
        if let Some(source) = self.source
            && group.source != source
        {
            return false;
        }

        let query = match self.query.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(q) => q.to_lowercase(),
        };

        group.repo.to_lowercase().contains(&query)
            || group
                .subtitle
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&query))
    }

    pub fn apply(&self, groups: Vec<ModelGroup>) -> Vec<ModelGroup> {
        groups.into_iter().filter(|g| self.matches(g)).collect()
    }
}
