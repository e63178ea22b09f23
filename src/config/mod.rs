// Configuration management module
// TOML-backed settings for the search index, embeddings, and chunking

pub mod settings;

pub use settings::{Config, ConfigError, EmbeddingsConfig, SearchConfig};
