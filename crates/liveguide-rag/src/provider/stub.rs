//! Stand-in provider for local development when no embedding API is configured.

use crate::error::Result;
use crate::provider::{EmbeddingProvider, EmbeddingProviderType};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STUB_MODEL_NAME: &str = "stub";

/// Generates pseudo-random unit vectors seeded from the provider seed and the text.
/// The same text always maps to the same vector, but the vectors carry no meaning:
/// similarity scores computed against them say nothing about the texts.
#[derive(Debug, Clone)]
pub struct StubEmbeddingProvider {
    dimension: usize,
    seed: u64,
}

impl StubEmbeddingProvider {
    pub fn new(dimension: usize, seed: u64) -> Self {
        Self { dimension, seed }
    }

    fn text_seed(&self, text: &str) -> u64 {
        // FNV-1a, stable across runs and platforms
        let hash = text.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
        hash ^ self.seed
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> String {
        STUB_MODEL_NAME.to_string()
    }

    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Stub
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(self.text_seed(text));
        let mut embedding: Vec<f32> = (0..self.dimension)
            .map(|_| rng.gen_range(-1.0f32..1.0f32))
            .collect();

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in embedding.iter_mut() {
                *val /= norm;
            }
        }

        Ok(embedding)
    }
}
