//! In-memory nearest-neighbor index over precomputed document embeddings

use std::cmp::Ordering;

use tracing::debug;
use tracing::warn;

use crate::errors::CoverwiseError;
use crate::errors::Result;
use crate::models::Document;
use crate::models::IndexedDocument;

/// Search result with cosine similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    /// Position of the document in the corpus
    pub index: usize,
    /// Cosine similarity, or `f32::NEG_INFINITY` when undefined
    pub score: f32,
    pub document: &'a Document,
}

/// Read-only document corpus with one embedding per document.
///
/// Row norms are computed once at construction; queries never mutate the
/// index, so it can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexedDocument>,
    norms: Vec<f32>,
    dimension: usize,
}

impl VectorIndex {
    /// Build an index from paired records; every embedding must share one width
    pub fn new(entries: Vec<IndexedDocument>) -> Result<Self> {
        let dimension = entries.first().map_or(0, |e| e.embedding.len());
        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimension) {
            return Err(CoverwiseError::DimensionMismatch {
                expected: dimension,
                actual: bad.embedding.len(),
            });
        }

        let norms: Vec<f32> = entries.iter().map(|e| l2_norm(&e.embedding)).collect();
        let degenerate = norms.iter().filter(|n| !is_usable_norm(**n)).count();
        if degenerate > 0 {
            warn!(
                "{} of {} document embeddings have zero or non-finite norm; they will rank last",
                degenerate,
                entries.len()
            );
        }

        debug!(
            "Built vector index: {} documents, dimension {}",
            entries.len(),
            dimension
        );
        Ok(Self {
            entries,
            norms,
            dimension,
        })
    }

    /// Pair row `i` of `embeddings` with document `i`
    pub fn from_aligned(documents: Vec<Document>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if documents.len() != embeddings.len() {
            return Err(CoverwiseError::CorpusMisaligned {
                documents: documents.len(),
                embeddings: embeddings.len(),
            });
        }
        let entries = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| IndexedDocument {
                document,
                embedding,
            })
            .collect();
        Self::new(entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding width, 0 for an empty index
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|e| &e.document)
    }

    /// The `top_k` documents most similar to `query`, best first.
    ///
    /// Returns exactly `min(top_k, len())` hits. Equal scores keep corpus
    /// order. Documents with an undefined similarity score
    /// `f32::NEG_INFINITY`; so does every document when the query itself has
    /// zero norm.
    pub fn nearest(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit<'_>>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(CoverwiseError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        if !is_usable_norm(query_norm) {
            warn!("Query embedding has zero or non-finite norm; similarity is undefined");
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(index, (entry, &doc_norm))| SearchHit {
                index,
                score: cosine_with_norms(query, query_norm, &entry.embedding, doc_norm),
                document: &entry.document,
            })
            .collect();

        // Stable sort keeps corpus order among ties
        hits.sort_by(|a, b| descending(a.score, b.score));
        hits.truncate(top_k);
        Ok(hits)
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `f32::NEG_INFINITY` when the widths differ or either vector has
/// zero or non-finite norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::NEG_INFINITY;
    }
    cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

fn cosine_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    if !is_usable_norm(norm_a) || !is_usable_norm(norm_b) {
        return f32::NEG_INFINITY;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let score = dot / (norm_a * norm_b);
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn is_usable_norm(norm: f32) -> bool {
    norm.is_finite() && norm > 0.0
}

fn descending(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(rows: &[(&str, Vec<f32>)]) -> VectorIndex {
        let (docs, embeddings): (Vec<_>, Vec<_>) = rows
            .iter()
            .map(|(text, emb)| (Document::new(*text), emb.clone()))
            .unzip();
        VectorIndex::from_aligned(docs, embeddings).unwrap()
    }

    fn contents<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|h| h.document.content.as_str()).collect()
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[3.0, 4.0], &[6.0, 8.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), f32::NEG_INFINITY);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), f32::NEG_INFINITY);
    }

    #[test]
    fn test_nearest_orders_by_similarity() {
        let idx = index(&[
            ("orthogonal", vec![0.0, 1.0]),
            ("exact", vec![1.0, 0.0]),
            ("close", vec![0.9, 0.1]),
        ]);
        let hits = idx.nearest(&[1.0, 0.0], 3).unwrap();
        assert_eq!(contents(&hits), vec!["exact", "close", "orthogonal"]);
        assert_eq!(hits[0].index, 1);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let idx = index(&[
            ("first", vec![1.0, 0.0]),
            ("second", vec![2.0, 0.0]),
            ("third", vec![0.5, 0.0]),
        ]);
        let hits = idx.nearest(&[1.0, 0.0], 3).unwrap();
        assert_eq!(contents(&hits), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_top_k_bounds() {
        let idx = index(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
        assert_eq!(idx.nearest(&[1.0, 0.0], 10).unwrap().len(), 2);
        assert_eq!(idx.nearest(&[1.0, 0.0], 1).unwrap().len(), 1);
        assert!(idx.nearest(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let idx = VectorIndex::from_aligned(Vec::new(), Vec::new()).unwrap();
        assert!(idx.is_empty());
        assert_eq!(idx.dimension(), 0);
        assert!(idx.nearest(&[1.0, 0.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_document_ranks_last() {
        let idx = index(&[
            ("zero", vec![0.0, 0.0]),
            ("opposite", vec![-1.0, 0.0]),
            ("nan", vec![f32::NAN, 1.0]),
            ("same", vec![1.0, 0.0]),
        ]);
        let hits = idx.nearest(&[1.0, 0.0], 4).unwrap();
        assert_eq!(contents(&hits), vec!["same", "opposite", "zero", "nan"]);
        assert!(hits.iter().all(|h| !h.score.is_nan()));
        assert_eq!(hits[2].score, f32::NEG_INFINITY);
    }

    #[test]
    fn test_zero_query_keeps_corpus_order() {
        let idx = index(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0]), ("c", vec![1.0, 1.0])]);
        let hits = idx.nearest(&[0.0, 0.0], 2).unwrap();
        assert_eq!(contents(&hits), vec!["a", "b"]);
        assert!(hits.iter().all(|h| h.score == f32::NEG_INFINITY));
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let idx = index(&[("a", vec![1.0, 0.0])]);
        let err = idx.nearest(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            CoverwiseError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_misaligned_corpus_rejected() {
        let err = VectorIndex::from_aligned(vec![Document::new("a")], Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CoverwiseError::CorpusMisaligned {
                documents: 1,
                embeddings: 0
            }
        ));
    }

    #[test]
    fn test_ragged_embeddings_rejected() {
        let err = VectorIndex::from_aligned(
            vec![Document::new("a"), Document::new("b")],
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, CoverwiseError::DimensionMismatch { .. }));
    }
}
