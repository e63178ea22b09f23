// Embeddings module
// Provider seam plus the HTTP client for OpenAI-compatible embedding APIs

pub mod client;

pub use client::{EmbeddingClient, known_model_dimension};

use crate::Result;

/// A provider that turns chunk text into fixed-length vectors.
///
/// One vector per input, in input order, all of [`dimension`] length.
/// Implementations are substitutable so the pipeline can run against a
/// remote service or a test double.
///
/// [`dimension`]: EmbeddingProvider::dimension
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Length of every produced vector.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
