//! Factory for creating embedding providers based on configuration.

use crate::config::EmbeddingConfig;
use crate::error::{RagError, Result};
use crate::provider::{
    EmbeddingProvider, EmbeddingProviderType, OpenAiEmbeddingProvider, StubEmbeddingProvider,
};
use std::sync::Arc;

/// Create an embedding provider based on the configuration.
///
/// A live provider without an API key is a configuration error; it never degrades to the stub.
pub fn create_embedding_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    config.validate()?;
    log::debug!("Creating embedding provider of type {}", config.provider_type);

    match config.provider_type {
        EmbeddingProviderType::OpenAi => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                RagError::configuration(format!(
                    "No API key for the openai provider: set `api_key` or the {} environment variable",
                    config.api_key_env
                ))
            })?;
            let provider = OpenAiEmbeddingProvider::new(config, api_key)?;
            log::info!(
                "Using OpenAI embedding model {} ({} dimensions)",
                config.model,
                config.dimension
            );
            Ok(Arc::new(provider))
        }
        EmbeddingProviderType::Stub => {
            log::debug!("Using stub embedding provider ({} dimensions)", config.dimension);
            Ok(Arc::new(StubEmbeddingProvider::new(
                config.dimension,
                config.stub_seed,
            )))
        }
    }
}
