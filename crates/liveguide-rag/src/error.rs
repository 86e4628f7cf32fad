//! Error types for the LiveGuide retrieval pipeline.

use thiserror::Error;

/// Result type alias for the retrieval pipeline.
pub type Result<T> = std::result::Result<T, RagError>;

/// Errors surfaced by chunking, embedding and ranking.
#[derive(Error, Debug)]
pub enum RagError {
    /// Invalid input to a pure function (empty text, bad chunk sizes, bad ranking parameters)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Two vectors compared in one call have different lengths
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A configured embedding provider failed to produce a vector
    #[error("Embedding generation failed: {message}")]
    EmbeddingGeneration { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The corpus store refused or failed an operation
    #[error("Store error: {message}")]
    Store { message: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an embedding generation error
    pub fn embedding_generation<S: Into<String>>(message: S) -> Self {
        Self::EmbeddingGeneration {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// True for errors caused by invalid caller input. These are never worth retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DimensionMismatch { .. })
    }
}

impl From<toml::de::Error> for RagError {
    fn from(error: toml::de::Error) -> Self {
        Self::configuration(format!("Invalid TOML: {}", error))
    }
}
