//! Retrieval over the regulatory document corpus
//!
//! This module provides:
//! - An in-memory cosine-similarity index over precomputed embeddings
//! - Query embedding and top-K retrieval
//! - A chat responder that redirects plan-specific questions before searching
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use coverwise::config::AppConfig;
//! use coverwise::embeddings::EmbeddingClient;
//! use coverwise::rag::{InsuranceChatbot, SemanticSearchEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let index = coverwise::data::load_corpus(&config.data)?;
//!     let embedder = EmbeddingClient::from_config(&config.embeddings)?;
//!     let engine = SemanticSearchEngine::new(Arc::new(index), Arc::new(embedder));
//!     let chatbot = InsuranceChatbot::new(engine, &config.search)?;
//!
//!     let reply = chatbot.respond("What is an out-of-pocket maximum?").await?;
//!     println!("{}", reply.message());
//!
//!     Ok(())
//! }
//! ```

pub mod chatbot;
pub mod index;
pub mod retriever;

pub use chatbot::ChatReply;
pub use chatbot::InsuranceChatbot;
pub use chatbot::PolicyGate;
pub use index::cosine_similarity;
pub use index::SearchHit;
pub use index::VectorIndex;
pub use retriever::ScoredDocument;
pub use retriever::SemanticSearchEngine;
