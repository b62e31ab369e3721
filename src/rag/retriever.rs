//! Semantic retrieval over the regulatory document corpus

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::TextEmbedder;
use crate::errors::CoverwiseError;
use crate::errors::Result;
use crate::models::Document;
use crate::rag::index::VectorIndex;

/// Document with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Embeds a query and returns the nearest documents from a [`VectorIndex`]
#[derive(Clone)]
pub struct SemanticSearchEngine {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn TextEmbedder>,
}

impl SemanticSearchEngine {
    /// Create a new search engine
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { index, embedder }
    }

    #[must_use]
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Top `top_k` documents by descending cosine similarity
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Document>> {
        Ok(self
            .search_scored(query, top_k)
            .await?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }

    /// Same as [`search`](Self::search) but keeps the similarity scores
    pub async fn search_scored(&self, query: &str, top_k: usize) -> Result<Vec<ScoredDocument>> {
        if query.trim().is_empty() {
            return Err(CoverwiseError::invalid("search query must not be blank"));
        }
        if self.index.is_empty() || top_k == 0 {
            debug!("Skipping search: corpus size {}, top_k {}", self.index.len(), top_k);
            return Ok(Vec::new());
        }

        debug!("Performing semantic search: {}", query);
        let query_embedding = self.embedder.embed(query).await?;

        let hits = self.index.nearest(&query_embedding, top_k)?;
        debug!("Semantic search returned {} documents", hits.len());

        Ok(hits
            .into_iter()
            .map(|hit| ScoredDocument {
                document: hit.document.clone(),
                score: hit.score,
            })
            .collect())
    }
}
