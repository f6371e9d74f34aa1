//! Inventory data model
//!
//! [`ArtifactFile`] is one physical file found by a scanner. [`ModelGroup`] is the
//! logical, user-facing unit built from those files by the grouper. Both are
//! rebuilt from disk on every scan; nothing here is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Artifact format, derived only from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    Gguf,
    Safetensors,
    Pytorch,
    Other,
}

impl ArtifactType {
    /// Classify a file by its final extension (case-insensitive)
    ///
    /// `.gguf` -> gguf, `.safetensors` -> safetensors, `.bin`/`.pt`/`.pth` -> pytorch,
    /// anything else (including no extension) -> other.
    pub fn from_file_name(name: &str) -> Self {
        let ext = std::path::Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        match ext.as_deref() {
            Some("gguf") => Self::Gguf,
            Some("safetensors") => Self::Safetensors,
            Some("bin") | Some("pt") | Some("pth") => Self::Pytorch,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gguf => write!(f, "gguf"),
            Self::Safetensors => write!(f, "safetensors"),
            Self::Pytorch => write!(f, "pytorch"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Format of a whole group: the shared file type, or `mixed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Gguf,
    Safetensors,
    Pytorch,
    Other,
    Mixed,
}

impl From<ArtifactType> for GroupType {
    fn from(t: ArtifactType) -> Self {
        match t {
            ArtifactType::Gguf => Self::Gguf,
            ArtifactType::Safetensors => Self::Safetensors,
            ArtifactType::Pytorch => Self::Pytorch,
            ArtifactType::Other => Self::Other,
        }
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gguf => write!(f, "gguf"),
            Self::Safetensors => write!(f, "safetensors"),
            Self::Pytorch => write!(f, "pytorch"),
            Self::Other => write!(f, "other"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// Which cache convention a group was discovered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelSource {
    /// Repo-snapshot layout (`models--owner--name/snapshots/<rev>/...`)
    #[serde(rename = "huggingface", alias = "hf")]
    HuggingFace,
    /// Flat-file layout (`<file>.gguf` with optional `<file>.gguf.json`)
    #[serde(rename = "llamacpp", alias = "llama.cpp")]
    LlamaCpp,
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HuggingFace => write!(f, "huggingface"),
            Self::LlamaCpp => write!(f, "llamacpp"),
        }
    }
}

impl FromStr for ModelSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "llamacpp" | "llama.cpp" => Ok(Self::LlamaCpp),
            other => Err(format!(
                "unknown source '{}' (expected 'huggingface' or 'llamacpp')",
                other
            )),
        }
    }
}

/// One physical file on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFile {
    /// Location-derived key, unique within one scanner's output
    pub id: String,
    /// Base filename
    pub name: String,
    /// Absolute path; deletion trusts this verbatim
    pub path: PathBuf,
    /// Byte length at scan time
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: ArtifactType,
    /// Snapshot revision (repo-snapshot layout only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub revision: Option<String>,
    pub last_modified: DateTime<Utc>,
    /// Repository inferred while scanning. Never serialized.
    #[serde(skip)]
    pub repo: Option<String>,
}

/// A logical model: every file of one repository, or a single ungroupable file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelGroup {
    /// `group-<repo>` for grouped entries, the file id for ungrouped ones
    pub id: String,
    /// Repository name, or the bare filename when there is none
    pub repo: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subtitle: Option<String>,
    pub files: Vec<ArtifactFile>,
    pub total_size: u64,
    pub size_formatted: String,
    pub source: ModelSource,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub last_modified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_list_tooltip: Option<String>,
}
