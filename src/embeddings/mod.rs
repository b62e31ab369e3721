//! Embeddings generation module
//!
//! Turns text into fixed-length vectors. The search engine depends only on
//! the [`TextEmbedder`] trait; [`EmbeddingClient`] implements it against
//! remote providers:
//! - OpenAI (text-embedding-3-small, etc.)
//! - Ollama (local models such as all-minilm)
//!
//! # Examples
//!
//! ```rust,no_run
//! use coverwise::config::AppConfig;
//! use coverwise::embeddings::{EmbeddingClient, TextEmbedder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_config(&config.embeddings)?;
//!
//!     let embedding = client.embed("Which plans cover preventive care?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod text_preprocessing;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::errors::Result;

/// Maximum batch size for embedding generation
pub const MAX_BATCH_SIZE: usize = 100;

/// Text to fixed-length vector.
///
/// Implementations must return identical vectors for identical text, all of
/// the same dimensionality as the stored document embeddings.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, one vector per input in input order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
