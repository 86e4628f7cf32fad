//! Similarity ranking over a corpus of embedded chunks.

use crate::config::RetrievalConfig;
use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};

pub mod similarity;

pub use similarity::cosine_similarity;

/// A stored chunk with its vector. `id` is assigned by the corpus store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// One ranked match for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: String,
    pub text: String,
    pub similarity: f32,
}

/// Rank `corpus` against `query_vector`.
///
/// Entries scoring below `threshold` are dropped, the rest are sorted by
/// descending similarity (ties keep corpus order) and truncated to `top_k`.
/// Every corpus vector must have the query's length; a mismatch fails the
/// whole call rather than skipping the entry.
pub fn find_similar(
    query_vector: &[f32],
    corpus: &[EmbeddedChunk],
    top_k: usize,
    threshold: f32,
) -> Result<Vec<SimilarityResult>> {
    RetrievalConfig::new(top_k, threshold).validate()?;
    if query_vector.is_empty() {
        return Err(RagError::validation("Query vector cannot be empty"));
    }

    if let Some(entry) = corpus
        .iter()
        .find(|entry| entry.embedding.len() != query_vector.len())
    {
        log::error!(
            "Corpus entry {} has {} dimensions, query has {}",
            entry.id,
            entry.embedding.len(),
            query_vector.len()
        );
        return Err(RagError::dimension_mismatch(
            query_vector.len(),
            entry.embedding.len(),
        ));
    }

    let mut results = Vec::new();
    for entry in corpus {
        let similarity = cosine_similarity(query_vector, &entry.embedding)?;
        if similarity >= threshold {
            results.push(SimilarityResult {
                id: entry.id.clone(),
                text: entry.text.clone(),
                similarity,
            });
        }
    }

    let above_threshold = results.len();

    // sort_by is stable, so equal scores keep corpus order
    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results.truncate(top_k);

    log::debug!(
        "Ranked {} corpus entries: {} above threshold {}, returning {}",
        corpus.len(),
        above_threshold,
        threshold,
        results.len()
    );
    Ok(results)
}

/// Ranking with a fixed `top_k` and threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retriever {
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn find_similar(
        &self,
        query_vector: &[f32],
        corpus: &[EmbeddedChunk],
    ) -> Result<Vec<SimilarityResult>> {
        find_similar(query_vector, corpus, self.config.top_k, self.config.threshold)
    }
}
