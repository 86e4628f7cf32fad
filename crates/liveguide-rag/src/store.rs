//! Seam to the external chunk corpus store.

use crate::embedder::ChunkEmbedding;
use crate::error::{RagError, Result};
use crate::retrieval::EmbeddedChunk;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persists embedded chunks per scope (e.g. a knowledge base) and hands them back for ranking.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Store chunks under `scope` and return the ids assigned to them, in input order.
    async fn insert(&self, scope: &str, chunks: Vec<ChunkEmbedding>) -> Result<Vec<String>>;

    /// All chunks stored under `scope`. An unknown scope yields an empty corpus.
    async fn fetch(&self, scope: &str) -> Result<Vec<EmbeddedChunk>>;
}

/// A process-local store for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryCorpusStore {
    scopes: RwLock<HashMap<String, Vec<EmbeddedChunk>>>,
}

impl InMemoryCorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks stored under `scope`.
    pub async fn len(&self, scope: &str) -> usize {
        self.scopes.read().await.get(scope).map_or(0, Vec::len)
    }

    /// Drop every chunk stored under `scope`, returning how many were removed.
    pub async fn clear(&self, scope: &str) -> usize {
        self.scopes
            .write()
            .await
            .remove(scope)
            .map_or(0, |chunks| chunks.len())
    }
}

#[async_trait]
impl CorpusStore for InMemoryCorpusStore {
    /// Every vector in a scope must share one length. A batch that would break
    /// this is rejected whole, leaving the scope unchanged.
    async fn insert(&self, scope: &str, chunks: Vec<ChunkEmbedding>) -> Result<Vec<String>> {
        let mut scopes = self.scopes.write().await;

        let expected = scopes
            .get(scope)
            .and_then(|entries| entries.first())
            .map(|entry| entry.embedding.len())
            .or_else(|| chunks.first().map(|chunk| chunk.embedding.len()));
        if let Some(expected) = expected {
            if let Some(chunk) = chunks
                .iter()
                .find(|chunk| chunk.embedding.len() != expected)
            {
                return Err(RagError::store(format!(
                    "Scope {} holds {}-dimensional vectors, refusing a {}-dimensional chunk",
                    scope,
                    expected,
                    chunk.embedding.len()
                )));
            }
        }

        let embedded: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .map(|chunk| chunk.into_embedded(Uuid::new_v4().to_string()))
            .collect();
        let ids = embedded.iter().map(|chunk| chunk.id.clone()).collect();

        let entries = scopes.entry(scope.to_string()).or_default();
        entries.extend(embedded);
        log::debug!("Scope {} now holds {} chunks", scope, entries.len());

        Ok(ids)
    }

    async fn fetch(&self, scope: &str) -> Result<Vec<EmbeddedChunk>> {
        Ok(self
            .scopes
            .read()
            .await
            .get(scope)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextChunk;

    fn chunk_embedding(text: &str, embedding: Vec<f32>) -> ChunkEmbedding {
        ChunkEmbedding {
            chunk: TextChunk {
                text: text.to_string(),
                start_offset: 0,
                end_offset: text.chars().count(),
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let store = InMemoryCorpusStore::new();
        let ids = store
            .insert(
                "kb-1",
                vec![
                    chunk_embedding("alpha", vec![1.0, 0.0]),
                    chunk_embedding("beta", vec![0.0, 1.0]),
                ],
            )
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        let corpus = store.fetch("kb-1").await.unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].id, ids[0]);
        assert_eq!(corpus[0].text, "alpha");
        assert_eq!(corpus[1].embedding, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let store = InMemoryCorpusStore::new();
        store
            .insert("kb-1", vec![chunk_embedding("alpha", vec![1.0])])
            .await
            .unwrap();

        assert!(store.fetch("kb-2").await.unwrap().is_empty());
        assert_eq!(store.len("kb-1").await, 1);
        assert_eq!(store.len("kb-2").await, 0);
    }

    #[tokio::test]
    async fn test_clear_scope() {
        let store = InMemoryCorpusStore::new();
        store
            .insert("kb-1", vec![chunk_embedding("alpha", vec![1.0])])
            .await
            .unwrap();

        assert_eq!(store.clear("kb-1").await, 1);
        assert_eq!(store.clear("kb-1").await, 0);
        assert!(store.fetch("kb-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_dimensions_rejected() {
        let store = InMemoryCorpusStore::new();
        store
            .insert("kb-1", vec![chunk_embedding("alpha", vec![1.0, 0.0])])
            .await
            .unwrap();

        let err = store
            .insert(
                "kb-1",
                vec![
                    chunk_embedding("beta", vec![0.0, 1.0]),
                    chunk_embedding("gamma", vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Store { .. }));
        assert!(err.to_string().contains("2-dimensional"));
        assert_eq!(store.len("kb-1").await, 1);

        // A fresh scope takes its length from the first chunk of the batch
        let err = store
            .insert(
                "kb-2",
                vec![
                    chunk_embedding("a", vec![1.0]),
                    chunk_embedding("b", vec![1.0, 2.0]),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Store { .. }));
        assert_eq!(store.len("kb-2").await, 0);
    }
}
