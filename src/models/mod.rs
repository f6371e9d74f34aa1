//! Model cache inventory
//!
//! Provides functionality for:
//! - Scanning the HuggingFace hub cache and the llama.cpp cache
//! - Inferring which repository each cached file came from
//! - Grouping files into logical models with size, type and freshness
//! - Deleting every file of a model

pub mod delete;
pub mod format;
pub mod group;
pub mod infer;
pub mod scanner;
pub mod types;

pub use delete::{delete_group, try_delete_group};
pub use format::format_bytes;
pub use group::{group_files, sort_by_size};
pub use infer::{repo_from_cache_dir_name, repo_from_sidecar, repo_from_url};
pub use scanner::{HfSnapshotScanner, LlamaCppScanner, Scanner};
pub use types::{ArtifactFile, ArtifactType, GroupType, ModelGroup, ModelSource};
