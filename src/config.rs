//! Configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Janitor configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct JanitorConfig {
    /// Root of the HuggingFace hub cache (repo-snapshot layout)
    pub hf_cache_dir: PathBuf,
    /// Root of the llama.cpp cache (flat-file layout)
    pub llamacpp_cache_dir: PathBuf,
    pub api_host: String,
    pub api_port: u16,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            hf_cache_dir: default_hf_cache_dir(),
            llamacpp_cache_dir: default_llamacpp_cache_dir(),
            api_host: default_api_host(),
            api_port: default_api_port(),
        }
    }
}

impl JanitorConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content).context("Failed to parse TOML config")?
        } else {
            Self::default()
        };

        if let Ok(dir) = std::env::var("MODEL_JANITOR_HF_CACHE") {
            config.hf_cache_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("MODEL_JANITOR_LLAMACPP_CACHE") {
            config.llamacpp_cache_dir = PathBuf::from(dir);
        }
        if let Ok(port) = std::env::var("MODEL_JANITOR_API_PORT") {
            config.api_port = port
                .parse()
                .context("Invalid MODEL_JANITOR_API_PORT value")?;
        }

        Ok(config)
    }

    /// Validate configuration
    ///
    /// Cache roots are not required to exist.
    pub fn validate(&self) -> Result<()> {
        if self.api_port < 1024 {
            anyhow::bail!("API port must be >= 1024 (got {})", self.api_port);
        }

        if self.hf_cache_dir.as_os_str().is_empty() || self.llamacpp_cache_dir.as_os_str().is_empty()
        {
            anyhow::bail!("Cache directories cannot be empty");
        }

        if self.hf_cache_dir == self.llamacpp_cache_dir {
            anyhow::bail!(
                "HuggingFace and llama.cpp caches must be different directories (both {:?})",
                self.hf_cache_dir
            );
        }

        Ok(())
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(std::env::temp_dir)
}

// Default functions
fn default_hf_cache_dir() -> PathBuf {
    home_dir().join(".cache").join("huggingface").join("hub")
}
fn default_llamacpp_cache_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library").join("Caches").join("llama.cpp")
    } else {
        home_dir().join(".cache").join("llama.cpp")
    }
}
fn default_api_host() -> String {
    "127.0.0.1".to_string()
}
fn default_api_port() -> u16 {
    9400
}
