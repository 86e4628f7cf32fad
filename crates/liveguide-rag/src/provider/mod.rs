//! Embedding provider implementations and traits.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Which kind of provider produces vectors. Chosen explicitly in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmbeddingProviderType {
    /// An OpenAI-compatible embeddings API
    #[serde(rename = "openai")]
    OpenAi,
    /// Deterministic pseudo-random vectors for local development. Not semantically meaningful.
    #[default]
    #[serde(rename = "stub")]
    Stub,
}

impl EmbeddingProviderType {
    /// True when vectors come from a real model.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Stub)
    }
}

impl fmt::Display for EmbeddingProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Stub => write!(f, "stub"),
        }
    }
}

/// A trait for embedding providers, defining a common interface for generating embeddings.
/// Providers are passed into the [`Embedder`](crate::Embedder) explicitly, so tests can
/// substitute their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Get the embedding dimension of the model.
    fn dimension(&self) -> usize;

    /// Name of the model behind this provider.
    fn model_name(&self) -> String;

    /// Get the type of the provider.
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

pub mod factory;
pub mod openai;
pub mod stub;

pub use factory::create_embedding_provider;
pub use openai::OpenAiEmbeddingProvider;
pub use stub::StubEmbeddingProvider;
