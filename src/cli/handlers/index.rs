//! Embedding generation for the regulatory corpus

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::embeddings::EmbeddingClient;
use crate::embeddings::TextEmbedder;
use crate::embeddings::MAX_BATCH_SIZE;
use crate::errors::CoverwiseError;
use crate::rag::VectorIndex;
use crate::AppConfig;
use crate::Result;

pub async fn handle_index_command(config: &AppConfig, batch_size: usize) -> Result<()> {
    let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
    let documents = crate::data::load_documents(&config.data.documents_path)?;
    let client = EmbeddingClient::from_config(&config.embeddings)?;

    print_info(&format!(
        "🚀 Embedding {} documents with {} ({} per batch)...",
        documents.len(),
        client.model(),
        batch_size
    ));

    let embeddings = embed_corpus(&client, &documents, batch_size).await?;

    // Rejects ragged output before anything is written
    let index = VectorIndex::from_aligned(documents, embeddings.clone())?;
    if !index.is_empty() && index.dimension() != config.embedding_dimension() {
        print_warning(&format!(
            "Provider returned {}-dimensional embeddings; config declares {}",
            index.dimension(),
            config.embedding_dimension()
        ));
    }

    crate::data::write_embeddings(&config.data.embeddings_path, &embeddings)?;
    print_success(&format!(
        "Wrote {} embeddings to {}",
        embeddings.len(),
        config.data.embeddings_path.display()
    ));
    Ok(())
}

/// One embedding per document, in corpus order
pub async fn embed_corpus(
    embedder: &dyn TextEmbedder,
    documents: &[crate::models::Document],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut embeddings = Vec::with_capacity(documents.len());
    for (batch_idx, batch) in documents.chunks(batch_size.max(1)).enumerate() {
        let texts: Vec<&str> = batch.iter().map(|d| d.content.as_str()).collect();
        let batch_embeddings = embedder.embed_batch(&texts).await?;
        if batch_embeddings.len() != texts.len() {
            return Err(CoverwiseError::EmbeddingError(format!(
                "batch {batch_idx}: expected {} embeddings, got {}",
                texts.len(),
                batch_embeddings.len()
            )));
        }
        embeddings.extend(batch_embeddings);
        tracing::debug!("Embedded {}/{} documents", embeddings.len(), documents.len());
    }
    Ok(embeddings)
}
