use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::embeddings::EmbeddingProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for the daily rolling log file
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_true")]
    pub file_output: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            file_output: true,
        }
    }
}

/// Locations of the tables and the regulatory corpus loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub plans_path: PathBuf,
    pub rates_path: PathBuf,
    pub benefits_path: PathBuf,
    pub documents_path: PathBuf,
    pub embeddings_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            plans_path: PathBuf::from("data/plan_df.csv.gz"),
            rates_path: PathBuf::from("data/rate-puf.csv.gz"),
            benefits_path: PathBuf::from("data/benefits_df.csv.gz"),
            documents_path: PathBuf::from("data/legal_docs_metadata.json"),
            embeddings_path: PathBuf::from("data/legal_doc_embeddings.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_provider")]
    pub provider: EmbeddingProvider,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    /// API key, either literal or `env:VAR_NAME`
    #[serde(default)]
    pub api_key: Option<String>,
}

const fn default_provider() -> EmbeddingProvider {
    EmbeddingProvider::Ollama
}

fn default_embedding_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

const fn default_embedding_dimension() -> usize {
    384
}

impl EmbeddingsConfig {
    /// Resolve the API key, supporting "env:VAR_NAME" syntax
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.as_ref().and_then(|key| {
            if let Some(var_name) = key.strip_prefix("env:") {
                std::env::var(var_name).ok()
            } else if key.is_empty() {
                None
            } else {
                Some(key.clone())
            }
        })
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Width of the coverage band, in percent of the target
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_pct: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Multiplier applied to a premium to predict its coverage amount
    #[serde(default = "default_coverage_multiplier")]
    pub coverage_multiplier: f64,
}

pub(crate) const fn default_tolerance_pct() -> f64 {
    10.0
}

pub(crate) const fn default_top_n() -> usize {
    20
}

pub(crate) const fn default_coverage_multiplier() -> f64 {
    80.0
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            tolerance_pct: default_tolerance_pct(),
            top_n: default_top_n(),
            coverage_multiplier: default_coverage_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Documents fetched for the regulation summary attached to recommendations
    #[serde(default = "default_rules_top_k")]
    pub rules_top_k: usize,
    /// Characters of document content shown in answers
    #[serde(default = "default_answer_chars")]
    pub answer_chars: usize,
    #[serde(default = "default_policy_keywords")]
    pub policy_keywords: Vec<String>,
}

pub(crate) const fn default_top_k() -> usize {
    5
}

const fn default_rules_top_k() -> usize {
    1
}

const fn default_answer_chars() -> usize {
    1000
}

fn default_policy_keywords() -> Vec<String> {
    crate::rag::chatbot::DEFAULT_POLICY_KEYWORDS
        .iter()
        .map(|kw| (*kw).to_string())
        .collect()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            rules_top_k: default_rules_top_k(),
            answer_chars: default_answer_chars(),
            policy_keywords: default_policy_keywords(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::CoverwiseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let tolerance = self.matching.tolerance_pct;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(crate::CoverwiseError::ConfigError(format!(
                "matching.tolerance_pct must be a non-negative number, got {tolerance}"
            )));
        }
        let multiplier = self.matching.coverage_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(crate::CoverwiseError::ConfigError(format!(
                "matching.coverage_multiplier must be positive, got {multiplier}"
            )));
        }
        if self.embeddings.dimension == 0 {
            return Err(crate::CoverwiseError::ConfigError(
                "embeddings.dimension must be greater than zero".to_string(),
            ));
        }
        if self.embeddings.provider == EmbeddingProvider::OpenAI
            && self.embeddings.resolve_api_key().is_none()
        {
            return Err(crate::CoverwiseError::ConfigError(
                "embeddings.api_key is required for the openai provider".to_string(),
            ));
        }
        Ok(())
    }

    /// Get default coverage tolerance in percent
    #[must_use]
    pub const fn tolerance_pct(&self) -> f64 {
        self.matching.tolerance_pct
    }

    /// Get number of ranked plans returned per recommendation
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.matching.top_n
    }

    /// Get premium-to-coverage multiplier
    #[must_use]
    pub const fn coverage_multiplier(&self) -> f64 {
        self.matching.coverage_multiplier
    }

    /// Get default number of documents returned by search
    #[must_use]
    pub const fn search_top_k(&self) -> usize {
        self.search.top_k
    }

    /// Get embedding dimension
    #[must_use]
    pub const fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    #[must_use]
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding endpoint
    #[must_use]
    pub fn embedding_endpoint(&self) -> &str {
        &self.embeddings.endpoint
    }
}
