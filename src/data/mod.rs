//! Loaders for the catalog tables and the regulatory corpus
//!
//! Files ending in `.gz` are decompressed transparently.

pub mod corpus;
pub mod tables;

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

pub use corpus::load_corpus;
pub use corpus::load_documents;
pub use corpus::load_embeddings;
pub use corpus::write_embeddings;
use flate2::read::GzDecoder;
pub use tables::build_rates;
pub use tables::load_benefits;
pub use tables::load_plans;
pub use tables::load_rates;
pub use tables::RawRate;

use crate::errors::CoverwiseError;
use crate::errors::Result;

pub(crate) fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        CoverwiseError::DataError(format!("failed to open {}: {e}", path.display()))
    })?;
    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}
