//! Text-to-vector stage of the pipeline.

use crate::chunking::TextChunk;
use crate::config::EmbeddingConfig;
use crate::error::{RagError, Result};
use crate::provider::{create_embedding_provider, EmbeddingProvider, EmbeddingProviderType};
use crate::retrieval::EmbeddedChunk;
use crate::DEFAULT_MAX_CONCURRENT_REQUESTS;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A chunk paired with its vector, ready to be handed to a corpus store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkEmbedding {
    pub chunk: TextChunk,
    pub embedding: Vec<f32>,
}

impl ChunkEmbedding {
    /// Attach the id assigned by the store.
    pub fn into_embedded<S: Into<String>>(self, id: S) -> EmbeddedChunk {
        EmbeddedChunk {
            id: id.into(),
            text: self.chunk.text,
            embedding: self.embedding,
        }
    }
}

/// Validates input, delegates to an injected provider and checks the output shape.
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    max_concurrent_requests: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        if provider.provider_type() == EmbeddingProviderType::Stub {
            log::warn!(
                "Embedder is using the stub provider ({} dimensions): vectors are development stand-ins and similarity scores are not meaningful",
                provider.dimension()
            );
        }
        Self {
            provider,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }

    /// Build the provider described by `config` and wrap it.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let provider = create_embedding_provider(config)?;
        Ok(Self::new(provider).with_max_concurrent_requests(config.max_concurrent_requests))
    }

    /// Limit the number of requests in flight during a batch. Values below 1 are raised to 1.
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit.max(1);
        self
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// True when vectors come from the stub provider and carry no meaning.
    pub fn is_stub(&self) -> bool {
        !self.provider.provider_type().is_live()
    }

    /// Embed a single non-empty text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(RagError::validation("Cannot embed empty or whitespace-only text"));
        }
        self.embed_checked(text).await
    }

    /// Embed each text concurrently, preserving input order. The first failure fails the batch.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Reject the whole batch before any request goes out
        if let Some(index) = texts.iter().position(|text| text.trim().is_empty()) {
            return Err(RagError::validation(format!(
                "Text at index {} is empty or whitespace-only",
                index
            )));
        }

        log::debug!(
            "Embedding batch of {} texts with up to {} concurrent requests",
            texts.len(),
            self.max_concurrent_requests
        );

        stream::iter(texts.iter().copied())
            .map(|text| self.embed_checked(text))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await
    }

    /// Embed chunks produced by the chunker.
    pub async fn embed_chunks(&self, chunks: Vec<TextChunk>) -> Result<Vec<ChunkEmbedding>> {
        let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
        let embeddings = self.embed_batch(&texts).await?;

        Ok(chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| ChunkEmbedding { chunk, embedding })
            .collect())
    }

    async fn embed_checked(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.provider.embed(text).await?;
        let expected = self.provider.dimension();
        if embedding.len() != expected {
            return Err(RagError::embedding_generation(format!(
                "Provider {} returned {} dimensions, expected {}",
                self.provider.model_name(),
                embedding.len(),
                expected
            )));
        }
        Ok(embedding)
    }
}
