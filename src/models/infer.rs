//! Repository inference
//!
//! Side-effect free helpers that work out which remote repository a cached file
//! belongs to, either from a HuggingFace cache directory name or from the `url`
//! recorded in a llama.cpp sidecar file.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Prefix of repository directories in the HuggingFace hub cache
pub const HF_REPO_DIR_PREFIX: &str = "models--";

/// Suffix of informational / sidecar metadata files
pub const METADATA_SUFFIX: &str = ".json";

/// Extension of llama.cpp cached artifacts
pub const GGUF_SUFFIX: &str = ".gguf";

static HF_URL_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"huggingface\.co/([^/]+/[^/]+)").expect("static regex is valid")
});

/// Convert a cache directory name to a repository id
///
/// The name is `models--{owner}--{name...}`. The owner is the first segment and
/// the remaining segments are rejoined with `-`.
/// e.g., "models--BAAI--bge-small-en-v1.5" -> "BAAI/bge-small-en-v1.5"
///
/// Returns `None` without the prefix or with fewer than two segments.
pub fn repo_from_cache_dir_name(dir_name: &str) -> Option<String> {
    let rest = dir_name.strip_prefix(HF_REPO_DIR_PREFIX)?;
    let parts: Vec<&str> = rest.split("--").collect();

    if parts.len() < 2 {
        return None;
    }

    Some(format!("{}/{}", parts[0], parts[1..].join("-")))
}

/// Recover the repository from a repo-snapshot file id (`<repo-dir>/<rev>/<file>`)
pub fn repo_from_snapshot_file_id(id: &str) -> Option<String> {
    id.split('/').next().and_then(repo_from_cache_dir_name)
}

/// Extract `<owner>/<name>` from a HuggingFace URL
///
/// e.g., "https://huggingface.co/TheBloke/Llama-2-7B-GGUF/resolve/main/x.gguf"
/// -> "TheBloke/Llama-2-7B-GGUF". URLs on any other host yield `None`.
pub fn repo_from_url(url: &str) -> Option<String> {
    HF_URL_REPO
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Partial llama.cpp sidecar (`<file>.gguf.json`)
#[derive(Debug, Deserialize)]
struct Sidecar {
    url: Option<String>,
}

/// Infer the repository from sidecar JSON text
///
/// Malformed JSON, a missing `url`, or a non-HuggingFace URL all yield `None`.
pub fn repo_from_sidecar(content: &str) -> Option<String> {
    let sidecar: Sidecar = serde_json::from_str(content).ok()?;
    repo_from_url(sidecar.url.as_deref()?)
}

/// Sidecar filename for a llama.cpp artifact
pub fn sidecar_name(file_name: &str) -> String {
    format!("{}{}", file_name, METADATA_SUFFIX)
}
