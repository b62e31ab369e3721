//! Embedding API clients for various providers

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::text_preprocessing::preprocess_text_for_embedding;
use super::TextEmbedder;
use super::MAX_BATCH_SIZE;
use crate::config::EmbeddingsConfig;
use crate::errors::CoverwiseError;
use crate::errors::Result;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// `OpenAI` embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CoverwiseError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Create a client from the `[embeddings]` config section
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self> {
        info!(
            "Embedding provider: {} (model {}, endpoint {})",
            config.provider, config.model, config.endpoint
        );
        Self::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.resolve_api_key(),
        )
    }

    #[must_use]
    pub const fn provider(&self) -> EmbeddingProvider {
        self.provider
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate embedding for a single text
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, missing embedding)
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let text = preprocess_text_for_embedding(text)?;
        match self.provider {
            EmbeddingProvider::OpenAI => self.generate_openai(&text).await,
            EmbeddingProvider::Ollama => self.generate_ollama(&text).await,
        }
    }

    /// Generate embeddings for multiple texts in batch
    ///
    /// Output order follows input order.
    pub async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let prepared = texts
            .iter()
            .map(|text| preprocess_text_for_embedding(text))
            .collect::<Result<Vec<String>>>()?;

        match self.provider {
            EmbeddingProvider::OpenAI => {
                let mut embeddings = Vec::with_capacity(prepared.len());
                for chunk in prepared.chunks(MAX_BATCH_SIZE) {
                    let inputs: Vec<&str> = chunk.iter().map(String::as_str).collect();
                    embeddings.extend(self.generate_batch_openai(inputs).await?);
                }
                Ok(embeddings)
            }
            EmbeddingProvider::Ollama => {
                // Ollama doesn't support batch, so requests run concurrently
                use futures::stream::StreamExt;
                use futures::stream::{
                    self,
                };

                let concurrency = prepared.len().clamp(1, 16);
                let requests: Vec<_> = prepared
                    .iter()
                    .map(|text| self.generate_ollama(text))
                    .collect();
                let results: Vec<Result<Vec<f32>>> = stream::iter(requests)
                    .buffered(concurrency)
                    .collect()
                    .await;

                results.into_iter().collect()
            }
        }
    }

    /// Generate embedding using `OpenAI` API
    async fn generate_openai(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.generate_batch_openai(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| CoverwiseError::EmbeddingError("No embedding in response".to_string()))
    }

    /// Generate embeddings in batch using `OpenAI` API
    async fn generate_batch_openai(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            CoverwiseError::ConfigError("OpenAI API key not provided".to_string())
        })?;

        #[derive(Serialize)]
        struct OpenAIBatchRequest<'a> {
            input: Vec<&'a str>,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        let expected = texts.len();
        debug!("Calling OpenAI embeddings API: {} items", expected);

        let request = OpenAIBatchRequest {
            input: texts,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CoverwiseError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CoverwiseError::EmbeddingError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let mut result: OpenAIResponse = response.json().await.map_err(|e| {
            CoverwiseError::EmbeddingError(format!("Failed to parse response: {e}"))
        })?;

        if result.data.len() != expected {
            return Err(CoverwiseError::EmbeddingError(format!(
                "Expected {expected} embeddings, got {}",
                result.data.len()
            )));
        }
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CoverwiseError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CoverwiseError::EmbeddingError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response.json().await.map_err(|e| {
            CoverwiseError::EmbeddingError(format!("Failed to parse response: {e}"))
        })?;

        if result.embedding.is_empty() {
            return Err(CoverwiseError::EmbeddingError(
                "Ollama returned an empty embedding".to_string(),
            ));
        }
        Ok(result.embedding)
    }
}

#[async_trait]
impl TextEmbedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.generate_batch(texts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(
            serde_json::to_string(&EmbeddingProvider::OpenAI).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::from_str::<EmbeddingProvider>("\"ollama\"").unwrap(),
            EmbeddingProvider::Ollama
        );
        assert_eq!(EmbeddingProvider::OpenAI.to_string(), "openai");
    }

    #[test]
    fn test_from_config_trims_endpoint() {
        let config = EmbeddingsConfig {
            endpoint: "http://localhost:11434/".to_string(),
            ..EmbeddingsConfig::default()
        };
        let client = EmbeddingClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint, "http://localhost:11434");
        assert_eq!(client.provider(), EmbeddingProvider::Ollama);
        assert_eq!(client.model(), "all-minilm");
    }

    #[tokio::test]
    async fn test_openai_without_key_is_config_error() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::OpenAI,
            "text-embedding-3-small".to_string(),
            "http://127.0.0.1:9".to_string(),
            None,
        )
        .unwrap();

        let err = client.generate("deductible rules").await.unwrap_err();
        assert!(matches!(err, CoverwiseError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_request() {
        let client = EmbeddingClient::from_config(&EmbeddingsConfig::default()).unwrap();
        let err = client.embed("   ").await.unwrap_err();
        assert!(matches!(err, CoverwiseError::EmbeddingError(_)));
    }

    #[tokio::test]
    #[ignore = "Requires API key"]
    async fn test_openai_embedding() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::OpenAI,
            "text-embedding-3-small".to_string(),
            "https://api.openai.com/v1".to_string(),
            std::env::var("OPENAI_API_KEY").ok(),
        )
        .unwrap();

        let embedding = client.generate("Hello, world!").await.unwrap();
        assert_eq!(embedding.len(), 1536);
    }

    #[tokio::test]
    #[ignore = "Requires a running Ollama server"]
    async fn test_ollama_batch_preserves_order() {
        let client = EmbeddingClient::from_config(&EmbeddingsConfig::default()).unwrap();
        let embeddings = client
            .generate_batch(&["preventive care", "out-of-pocket maximum"])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0], client.generate("preventive care").await.unwrap());
    }
}
