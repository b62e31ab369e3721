//! Regulatory document corpus and its embedding matrix

use std::io::BufWriter;
use std::path::Path;

use tracing::info;

use super::open_reader;
use crate::config::DataConfig;
use crate::errors::CoverwiseError;
use crate::errors::Result;
use crate::models::Document;
use crate::rag::VectorIndex;

/// Documents as a JSON array of `{page_content, metadata}` objects
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let documents: Vec<Document> = serde_json::from_reader(open_reader(path)?)
        .map_err(|e| CoverwiseError::DataError(format!("{}: {e}", path.display())))?;
    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Embedding matrix as a JSON array of rows; row `i` belongs to document `i`
pub fn load_embeddings(path: &Path) -> Result<Vec<Vec<f32>>> {
    let embeddings: Vec<Vec<f32>> = serde_json::from_reader(open_reader(path)?)
        .map_err(|e| CoverwiseError::DataError(format!("{}: {e}", path.display())))?;
    info!(
        "Loaded {} embeddings from {}",
        embeddings.len(),
        path.display()
    );
    Ok(embeddings)
}

pub fn write_embeddings(path: &Path, embeddings: &[Vec<f32>]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer(writer, embeddings)?;
    info!("Wrote {} embeddings to {}", embeddings.len(), path.display());
    Ok(())
}

/// Load the documents and embeddings named in the config into an index
pub fn load_corpus(config: &DataConfig) -> Result<VectorIndex> {
    let documents = load_documents(&config.documents_path)?;
    let embeddings = load_embeddings(&config.embeddings_path)?;
    VectorIndex::from_aligned(documents, embeddings)
}
