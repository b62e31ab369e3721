//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - recommend: Plan matching and ranking
//! - ask: Chat questions and semantic search
//! - index: Embedding generation for the document corpus
//! - info: Information display (data statistics, config)

pub mod ask;
pub mod index;
pub mod info;
pub mod recommend;

use std::sync::Arc;

// Re-export all public handlers
pub use ask::*;
pub use index::*;
pub use info::*;
pub use recommend::*;

use crate::embeddings::EmbeddingClient;
use crate::rag::SemanticSearchEngine;
use crate::AppConfig;
use crate::Result;

/// Load the corpus and connect the configured embedding provider
pub(crate) fn build_search_engine(config: &AppConfig) -> Result<SemanticSearchEngine> {
    let index = crate::data::load_corpus(&config.data)?;
    if !index.is_empty() && index.dimension() != config.embedding_dimension() {
        tracing::warn!(
            "Corpus embeddings have dimension {} but config declares {}",
            index.dimension(),
            config.embedding_dimension()
        );
    }
    let embedder = EmbeddingClient::from_config(&config.embeddings)?;
    Ok(SemanticSearchEngine::new(Arc::new(index), Arc::new(embedder)))
}
