//! localrag-llm
//!
//! Minimal client for a local Ollama server. Only non-streaming
//! `/api/generate` is used: one prompt in, the full completion out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use localrag_core::config::LlmSettings;
use localrag_core::traits::LanguageModel;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&LlmSettings> for OllamaConfig {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    error: Option<String>,
}

pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature: self.config.temperature },
        };
        debug!(model = %self.config.model, prompt_chars = prompt.len(), "ollama generate");

        let resp = self.client.post(format!("{}/api/generate", self.config.base_url)).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message: text });
        }

        let data: GenerateResponse = resp.json().await.map_err(|e| LlmError::Parse(e.to_string()))?;
        match (data.response, data.error) {
            (_, Some(error)) => Err(LlmError::Api { status: 200, message: error }),
            (Some(response), None) => Ok(response),
            (None, None) => Err(LlmError::Parse("response field missing".to_string())),
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(self.complete(prompt).await?)
    }
}
