//! Chunk → embed → rank, composed.

use crate::chunking::TextChunker;
use crate::config::RagConfig;
use crate::embedder::{ChunkEmbedding, Embedder};
use crate::error::Result;
use crate::retrieval::{EmbeddedChunk, Retriever, SimilarityResult};
use crate::store::CorpusStore;

/// The full retrieval pipeline. Holds no state between calls beyond its configuration.
#[derive(Debug, Clone)]
pub struct RagPipeline {
    chunker: TextChunker,
    embedder: Embedder,
    retriever: Retriever,
}

impl RagPipeline {
    pub fn new(chunker: TextChunker, embedder: Embedder, retriever: Retriever) -> Self {
        Self {
            chunker,
            embedder,
            retriever,
        }
    }

    /// Validate `config` and build every stage from it.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            TextChunker::new(config.chunking)?,
            Embedder::from_config(&config.embedding)?,
            Retriever::new(config.retrieval)?,
        ))
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Chunk and embed a document. Any embedding failure fails the whole document,
    /// so a partially embedded document is never reported as indexed.
    pub async fn index_document(&self, document: &str) -> Result<Vec<ChunkEmbedding>> {
        let chunks = self.chunker.chunk(document);
        log::info!("Indexing document: {} chunks", chunks.len());
        self.embedder.embed_chunks(chunks).await
    }

    /// Index a document and persist the result under `scope`. Returns the store ids.
    pub async fn index_into<S: CorpusStore + ?Sized>(
        &self,
        store: &S,
        scope: &str,
        document: &str,
    ) -> Result<Vec<String>> {
        let embedded = self.index_document(document).await?;
        if embedded.is_empty() {
            return Ok(Vec::new());
        }
        let ids = store.insert(scope, embedded).await?;
        log::info!("Stored {} chunks under scope {}", ids.len(), scope);
        Ok(ids)
    }

    /// Embed `query` and rank `corpus` against it.
    pub async fn query(&self, query: &str, corpus: &[EmbeddedChunk]) -> Result<Vec<SimilarityResult>> {
        let query_vector = self.embedder.embed(query).await?;
        self.retriever.find_similar(&query_vector, corpus)
    }

    /// Fetch the corpus for `scope` and rank it against `query`.
    pub async fn query_store<S: CorpusStore + ?Sized>(
        &self,
        store: &S,
        scope: &str,
        query: &str,
    ) -> Result<Vec<SimilarityResult>> {
        // Embed first so a failed query never triggers a corpus fetch
        let query_vector = self.embedder.embed(query).await?;
        let corpus = store.fetch(scope).await?;
        log::debug!("Querying {} chunks in scope {}", corpus.len(), scope);
        self.retriever.find_similar(&query_vector, &corpus)
    }
}
