//! Configuration types for the retrieval pipeline.
//!
//! Configuration is typically loaded from a `rag.toml` file. Every section is
//! optional; missing sections and fields fall back to their defaults.

use crate::error::{RagError, Result};
use crate::provider::EmbeddingProviderType;
use crate::{
    DEFAULT_API_KEY_ENV, DEFAULT_EMBEDDING_BASE_URL, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MAX_CONCURRENT_REQUESTS,
    DEFAULT_OVERLAP_SIZE, DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_SIMILARITY_THRESHOLD,
    DEFAULT_STUB_SEED, DEFAULT_TOP_K,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "liveguide";
const CONFIG_FILE_NAME: &str = "rag.toml";

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Configuration for the embedding stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider produces vectors
    pub provider_type: EmbeddingProviderType,

    /// Model name sent with every request
    pub model: String,

    /// Base URL of the OpenAI-compatible API (without the `/embeddings` suffix)
    pub base_url: String,

    /// Inline API key. Takes precedence over `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable consulted when no inline key is set
    pub api_key_env: String,

    /// Vector length produced by the model
    pub dimension: usize,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// Upper bound on embedding requests in flight during a batch
    pub max_concurrent_requests: usize,

    /// Retries per request on failure (0 = fail on first error)
    pub max_retries: u32,

    /// Seed for the stub provider
    pub stub_seed: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider_type: EmbeddingProviderType::default(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_retries: 0,
            stub_seed: DEFAULT_STUB_SEED,
        }
    }
}

impl EmbeddingConfig {
    /// Create a new embedding configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration for an OpenAI-compatible provider.
    pub fn new_openai<S: Into<String>>(model: S, dimension: usize) -> Self {
        Self {
            provider_type: EmbeddingProviderType::OpenAi,
            model: model.into(),
            dimension,
            ..Self::default()
        }
    }

    /// Create a stub configuration producing vectors of the given dimension.
    pub fn new_stub(dimension: usize) -> Self {
        Self {
            provider_type: EmbeddingProviderType::Stub,
            dimension,
            ..Self::default()
        }
    }

    /// Set the provider type.
    pub fn with_provider_type(mut self, provider_type: EmbeddingProviderType) -> Self {
        self.provider_type = provider_type;
        self
    }

    /// Set the model name.
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an inline API key.
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the environment variable holding the API key.
    pub fn with_api_key_env<S: Into<String>>(mut self, name: S) -> Self {
        self.api_key_env = name.into();
        self
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the batch concurrency limit.
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit;
        self
    }

    /// Set the number of retries per request.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the stub seed.
    pub fn with_stub_seed(mut self, seed: u64) -> Self {
        self.stub_seed = seed;
        self
    }

    /// The API key to use: the inline key if set, otherwise the value of `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(RagError::configuration("model must not be empty"));
        }

        if self.dimension == 0 {
            return Err(RagError::configuration("dimension must be greater than 0"));
        }

        if self.max_concurrent_requests == 0 {
            return Err(RagError::configuration(
                "max_concurrent_requests must be greater than 0",
            ));
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(RagError::configuration(format!(
                "max_retries ({}) must not exceed {}",
                self.max_retries, MAX_RETRIES_LIMIT
            )));
        }

        if self.provider_type == EmbeddingProviderType::OpenAi {
            if self.base_url.trim().is_empty() {
                return Err(RagError::configuration(
                    "base_url is required for the openai provider",
                ));
            }
            if self.timeout_seconds == 0 {
                return Err(RagError::configuration(
                    "timeout_seconds must be greater than 0",
                ));
            }
        }

        Ok(())
    }
}

/// Configuration for the chunking stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk length in characters
    pub max_chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub overlap_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            overlap_size: DEFAULT_OVERLAP_SIZE,
        }
    }
}

impl ChunkingConfig {
    pub fn new(max_chunk_size: usize, overlap_size: usize) -> Self {
        Self {
            max_chunk_size,
            overlap_size,
        }
    }

    /// Validate the configuration. `overlap_size` must stay below `max_chunk_size`
    /// or the chunk walk could stop advancing.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(RagError::validation("max_chunk_size must be greater than 0"));
        }
        if self.overlap_size >= self.max_chunk_size {
            return Err(RagError::validation(format!(
                "overlap_size ({}) must be smaller than max_chunk_size ({})",
                self.overlap_size, self.max_chunk_size
            )));
        }
        Ok(())
    }
}

/// Configuration for the ranking stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of results
    pub top_k: usize,
    /// Minimum similarity for a result to be kept
    pub threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl RetrievalConfig {
    pub fn new(top_k: usize, threshold: f32) -> Self {
        Self { top_k, threshold }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::validation("top_k must be greater than 0"));
        }
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(RagError::validation(format!(
                "threshold must be within [-1, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.embedding.validate()?;
        self.chunking.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }

    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        let config: RagConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `override_path` if given; otherwise from the default location,
    /// falling back to defaults when no file exists there.
    pub fn load_or_default(override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            return Self::load(path);
        }

        let path = default_config_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            log::info!(
                "No configuration found at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Write the configuration as TOML, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| RagError::configuration(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        log::debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// `<config dir>/liveguide/rag.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| RagError::configuration("Could not determine config directory"))?;
    Ok(config_dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}
