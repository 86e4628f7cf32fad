//! # LiveGuide Retrieval Pipeline
//!
//! Contextual memory for LiveGuide coaching agents: documents are split into
//! overlapping chunks, each chunk is embedded, and at query time the stored
//! chunks are ranked against the embedded query by cosine similarity.
//!
//! ## Features
//!
//! - **Boundary-aware chunking**: prefers sentence and paragraph breaks over mid-word splits
//! - **Pluggable providers**: an OpenAI-compatible HTTP provider, or a typed stub for local development
//! - **Bounded concurrency**: batch embedding runs requests concurrently and fails fast
//! - **Ranking**: cosine similarity with threshold filtering and stable top-k
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use liveguide_rag::{InMemoryCorpusStore, RagConfig, RagPipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = RagPipeline::from_config(&RagConfig::default())?;
//! let store = InMemoryCorpusStore::new();
//!
//! pipeline
//!     .index_into(&store, "kb-1", "Breathe in slowly. Hold for four counts. Exhale.")
//!     .await?;
//! let results = pipeline.query_store(&store, "kb-1", "breathing exercise").await?;
//! println!("Found {} matching chunks", results.len());
//! # Ok(())
//! # }
//! ```

pub mod chunking;
pub mod config;
pub mod embedder;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod retrieval;
pub mod store;

pub use chunking::{chunk_text, TextChunk, TextChunker};
pub use config::{ChunkingConfig, EmbeddingConfig, RagConfig, RetrievalConfig};
pub use embedder::{ChunkEmbedding, Embedder};
pub use error::{RagError, Result};
pub use pipeline::RagPipeline;
pub use provider::{
    create_embedding_provider, EmbeddingProvider, EmbeddingProviderType, OpenAiEmbeddingProvider,
    StubEmbeddingProvider,
};
pub use retrieval::{cosine_similarity, find_similar, EmbeddedChunk, Retriever, SimilarityResult};
pub use store::{CorpusStore, InMemoryCorpusStore};

/// Current version of the liveguide-rag crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model name
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default embedding dimension (matches the default model)
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

/// Default base URL of the OpenAI-compatible embeddings API
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com/v1";

/// Default environment variable holding the embedding API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default target chunk length in characters
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters
pub const DEFAULT_OVERLAP_SIZE: usize = 200;

/// Default number of results returned by a query
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum similarity for a result to be returned
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

/// Default number of embedding requests in flight during a batch
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

/// Default HTTP timeout for embedding requests
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default seed for the stub provider
pub const DEFAULT_STUB_SEED: u64 = 42;
