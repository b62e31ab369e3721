//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `coverwise` CLI

use crate::advisor::Recommendation;
use crate::rag::ScoredDocument;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the truncated string with a "..." suffix if it was cut, otherwise
/// the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print ranked plans, their explanations and the rules summary
pub fn print_recommendation(recommendation: &Recommendation) {
    println!(
        "📋 Found {} recommended plans:",
        recommendation.plans.len()
    );
    println!();
    for explanation in &recommendation.explanations {
        println!("{explanation}");
        println!();
    }

    if let Some(rules) = &recommendation.rules {
        println!("📘 Relevant regulations:");
        println!("{rules}");
    }
}

pub fn print_search_header(query: &str, top_k: usize) {
    println!("🔍 Searching regulatory documents for: \"{query}\" (top {top_k})");
}

pub fn print_search_results(results: &[ScoredDocument]) {
    if results.is_empty() {
        print_warning("No documents found");
        return;
    }
    println!("Found {} documents:", results.len());
    for (rank, result) in results.iter().enumerate() {
        let source = result
            .document
            .metadata
            .get("source")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("N/A");
        println!();
        println!("  {}. score {:.4} | source: {}", rank + 1, result.score, source);
        println!("     {}", truncate_str(result.document.content.trim(), 200));
    }
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 Coverwise Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Directory: {}", config.logging.directory);
    println!("  File output: {}", config.logging.file_output);
    println!();

    println!("📂 Data:");
    println!("  Plans: {}", config.data.plans_path.display());
    println!("  Rates: {}", config.data.rates_path.display());
    println!("  Benefits: {}", config.data.benefits_path.display());
    println!("  Documents: {}", config.data.documents_path.display());
    println!("  Embeddings: {}", config.data.embeddings_path.display());
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embedding_endpoint());
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!(
        "  API key: {}",
        if config.embeddings.resolve_api_key().is_some() {
            "***set***"
        } else {
            "not set"
        }
    );
    println!();

    println!("🎯 Matching:");
    println!("  Tolerance: {}%", config.tolerance_pct());
    println!("  Top plans: {}", config.top_n());
    println!("  Coverage multiplier: {}", config.coverage_multiplier());
    println!();

    println!("🔍 Search:");
    println!("  Top K: {}", config.search_top_k());
    println!("  Rules top K: {}", config.search.rules_top_k);
    println!("  Answer length: {} chars", config.search.answer_chars);
    println!("  Policy keywords: {}", config.search.policy_keywords.len());
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}
