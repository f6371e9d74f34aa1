//! Model Janitor - local model cache inventory
//!
//! Finds model files in the HuggingFace hub cache and the llama.cpp cache,
//! groups them into logical models with size, type and freshness, and deletes
//! whole models on request.

pub mod api;
pub mod config;
pub mod error;
pub mod inventory;
pub mod metrics;
pub mod models;

pub use config::JanitorConfig;
pub use error::{JanitorError, JanitorResult};
pub use inventory::{CacheRoot, Inventory, InventorySummary, ModelFilter, summarize};
pub use models::{ArtifactFile, ArtifactType, GroupType, ModelGroup, ModelSource, format_bytes};
