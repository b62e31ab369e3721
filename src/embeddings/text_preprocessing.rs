//! Text preprocessing utilities for embedding generation
//!
//! Cleans and bounds text before it is sent to an embedding provider.

use tracing::debug;
use tracing::warn;

use crate::errors::CoverwiseError;
use crate::errors::Result;

/// Longest input, in characters, sent to the embedding provider
pub const MAX_EMBEDDING_CHARS: usize = 2000;

/// Preprocess text for embedding generation
///
/// This function handles:
/// - Normalizing whitespace and newlines
/// - Replacing control characters
/// - Truncating long text at a word boundary
pub fn preprocess_text_for_embedding(text: &str) -> Result<String> {
    let sanitized = sanitize_text(&normalize_whitespace(text));

    if sanitized.is_empty() {
        return Err(CoverwiseError::EmbeddingError(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    let char_count = sanitized.chars().count();
    if char_count > MAX_EMBEDDING_CHARS {
        warn!(
            "Text too long ({} chars), truncating to {}",
            char_count, MAX_EMBEDDING_CHARS
        );
        return Ok(smart_truncate_text(&sanitized, MAX_EMBEDDING_CHARS));
    }

    debug!("Preprocessed text: {} -> {} chars", text.len(), sanitized.len());
    Ok(sanitized)
}

/// Collapse every run of whitespace (newlines, tabs) into a single space
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Replace control characters with spaces
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Truncate to `max_chars` characters, backing up to a word boundary when
/// one is close to the cut
fn smart_truncate_text(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    if let Some(last_space) = truncated.rfind(' ') {
        if truncated[..last_space].chars().count() > max_chars * 3 / 4 {
            return truncated[..last_space].to_string();
        }
    }
    truncated
}
