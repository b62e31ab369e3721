//! Free-text question answering over the regulatory corpus
//!
//! Questions about one specific plan instance are redirected to the insurer
//! before any embedding call; everything else is answered from the most
//! similar regulatory passage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::SearchConfig;
use crate::errors::CoverwiseError;
use crate::errors::Result;
use crate::models::Document;
use crate::rag::retriever::SemanticSearchEngine;

/// Phrases that mark a question as being about a specific plan
pub const DEFAULT_POLICY_KEYWORDS: &[&str] = &[
    "plan id",
    "planid",
    "specific plan",
    "premium of plan",
    "details of plan",
    "this plan",
    "policy",
    "this insurance",
    "coverage of plan",
    "plan benefits",
    "compare plan",
    "what is the price of plan",
    "cost of plan",
];

pub const REDIRECT_MESSAGE: &str = "🔍 For detailed questions about a specific insurance policy, \
     please visit the respective insurance provider's official website for the latest information.";

pub const NO_RESULT_MESSAGE: &str =
    "❌ Sorry, I couldn't find any relevant information on that topic.";

static DEFAULT_GATE: Lazy<PolicyGate> = Lazy::new(|| PolicyGate {
    pattern: build_pattern(DEFAULT_POLICY_KEYWORDS.iter().copied())
        .and_then(|p| Regex::new(&p).ok()),
});

/// Case-insensitive, word-bounded match against a fixed phrase list
#[derive(Debug, Clone)]
pub struct PolicyGate {
    /// `None` when the phrase list is empty
    pattern: Option<Regex>,
}

impl PolicyGate {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let pattern = match build_pattern(keywords.iter().map(AsRef::as_ref)) {
            Some(p) => Some(Regex::new(&p).map_err(|e| {
                CoverwiseError::ConfigError(format!("invalid policy keyword pattern: {e}"))
            })?),
            None => None,
        };
        Ok(Self { pattern })
    }

    /// True when the query mentions any policy keyword as whole words
    #[must_use]
    pub fn is_policy_specific(&self, query: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(query))
    }
}

impl Default for PolicyGate {
    fn default() -> Self {
        DEFAULT_GATE.clone()
    }
}

fn build_pattern<'a>(keywords: impl Iterator<Item = &'a str>) -> Option<String> {
    let alternatives: Vec<String> = keywords
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    Some(format!(r"(?i)\b(?:{})\b", alternatives.join("|")))
}

/// Outcome of a chat question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatReply {
    /// The question was about a specific plan; no search ran
    Redirect,
    /// Search found nothing
    NoResult,
    Answer {
        document: Document,
        /// Trimmed passage, cut to the configured length
        excerpt: String,
    },
}

impl ChatReply {
    /// Text shown to the user
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Redirect => REDIRECT_MESSAGE.to_string(),
            Self::NoResult => NO_RESULT_MESSAGE.to_string(),
            Self::Answer { excerpt, .. } => {
                format!("📘 **Answer from regulatory document**:\n\n{excerpt}...")
            }
        }
    }
}

/// First `max_chars` characters of the trimmed content
#[must_use]
pub fn excerpt(content: &str, max_chars: usize) -> String {
    content.trim().chars().take(max_chars).collect()
}

/// Answers free-text questions from the regulatory corpus
#[derive(Clone)]
pub struct InsuranceChatbot {
    engine: SemanticSearchEngine,
    gate: PolicyGate,
    top_k: usize,
    answer_chars: usize,
}

impl InsuranceChatbot {
    pub fn new(engine: SemanticSearchEngine, config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            engine,
            gate: PolicyGate::new(config.policy_keywords.as_slice())?,
            top_k: config.top_k,
            answer_chars: config.answer_chars,
        })
    }

    #[must_use]
    pub const fn gate(&self) -> &PolicyGate {
        &self.gate
    }

    pub async fn respond(&self, query: &str) -> Result<ChatReply> {
        if self.gate.is_policy_specific(query) {
            info!("Policy-specific question redirected to the insurer");
            return Ok(ChatReply::Redirect);
        }

        let mut docs = self.engine.search(query, self.top_k).await?;
        if docs.is_empty() {
            debug!("No documents found for chat query");
            return Ok(ChatReply::NoResult);
        }

        let document = docs.swap_remove(0);
        let excerpt = excerpt(&document.content, self.answer_chars);
        Ok(ChatReply::Answer { document, excerpt })
    }
}
