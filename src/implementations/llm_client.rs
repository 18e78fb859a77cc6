use std::time::Duration;
use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::config::{ ApiProvider, ValidatorConfig };
use crate::errors::{ ValidatorError, ValidatorResult };
use crate::traits::language_model::LanguageModel;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")] ApiError(String),

    #[error("Failed to parse API response: {0}")] ParseError(String),

    #[error("Network error: {0}")] NetworkError(String),

    #[error("HTTP error: {status} - {message}")] HttpError {
        status: u16,
        message: String,
    },
}

impl From<LlmError> for ValidatorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ApiError(msg) | LlmError::ParseError(msg) =>
                ValidatorError::ExternalServiceError {
                    service: "LLM API".to_string(),
                    message: msg,
                },
            LlmError::NetworkError(msg) =>
                ValidatorError::ExternalServiceError {
                    service: "Network".to_string(),
                    message: msg,
                },
            LlmError::HttpError { status, message } =>
                ValidatorError::ExternalServiceError {
                    service: "HTTP".to_string(),
                    message: format!("Status {}: {}", status, message),
                },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Language model reached over HTTP, speaking either the Anthropic Messages
/// format or the OpenAI chat-completions format
#[derive(Clone)]
pub struct HttpLanguageModel {
    http_client: reqwest::Client,
    provider: ApiProvider,
    api_key: String,
    api_endpoint: String,
    model: String,
    temperature: Option<f32>,
}

impl HttpLanguageModel {
    /// Build a client for the configured model. Fails when no API key is available.
    pub fn new(config: &ValidatorConfig) -> ValidatorResult<Self> {
        let api_key = config.model_api_key()?.to_string();
        let http_client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            provider: config.llm_api.provider,
            api_key,
            api_endpoint: config.model_endpoint(),
            model: config.llm_api.model.clone(),
            temperature: config.llm_api.temperature,
        })
    }

    /// Same endpoint and credentials, different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request(&self, prompt: &str, max_tokens: usize) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature: self.temperature,
        }
    }

    async fn call_llm_api(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError> {
        info!("Making LLM API request to {} ({})", self.provider, self.model);
        debug!("API endpoint: {}", self.api_endpoint);
        debug!("Max tokens: {}", max_tokens);
        debug!("Prompt length: {} characters", prompt.len());

        let request = self.build_request(prompt, max_tokens);
        let request_builder = match self.provider {
            ApiProvider::Anthropic =>
                self.http_client
                    .post(&self.api_endpoint)
                    .header("Content-Type", "application/json")
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01"),
            ApiProvider::OpenAi =>
                self.http_client
                    .post(&self.api_endpoint)
                    .header("Content-Type", "application/json")
                    .header("Authorization", format!("Bearer {}", self.api_key)),
        };

        let response = request_builder
            .json(&request)
            .send().await
            .map_err(|e| {
                let error_msg = format!("Network error when calling {} API: {}", self.provider, e);
                warn!("{}", error_msg);
                if e.is_timeout() {
                    warn!("Request timed out");
                }
                if e.is_connect() {
                    warn!("Connection error - check network connectivity");
                }
                LlmError::NetworkError(error_msg)
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());

            warn!("API error: HTTP {} - {}", status, error_text);
            return Err(LlmError::HttpError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await.map_err(|e| {
            warn!("Failed to get response text: {}", e);
            LlmError::ParseError(e.to_string())
        })?;
        debug!("Response length: {} characters", response_text.len());

        let content = extract_content(self.provider, &response_text)?;
        info!("API call completed successfully");
        debug!("Content length: {} characters", content.len());
        Ok(content)
    }
}

/// Pull the generated text out of a provider response body
pub fn extract_content(provider: ApiProvider, body: &str) -> Result<String, LlmError> {
    let response_json: serde_json::Value = serde_json
        ::from_str(body)
        .map_err(|e| LlmError::ParseError(format!("Invalid JSON response: {}", e)))?;

    match provider {
        ApiProvider::Anthropic => {
            let content_array = response_json["content"]
                .as_array()
                .ok_or_else(|| {
                    LlmError::ParseError("Unable to find content in Anthropic response".to_string())
                })?;
            if content_array.is_empty() {
                return Err(
                    LlmError::ParseError("Empty content array in Anthropic response".to_string())
                );
            }
            // Non-text blocks carry no answer text
            Ok(
                content_array
                    .iter()
                    .filter_map(|block| block["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            )
        }
        ApiProvider::OpenAi => {
            let choices = response_json["choices"]
                .as_array()
                .ok_or_else(|| LlmError::ParseError("Missing choices in response".to_string()))?;
            let first = choices
                .first()
                .ok_or_else(|| LlmError::ApiError("No response from API".to_string()))?;
            first["message"]["content"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| LlmError::ParseError("Missing message content".to_string()))
        }
    }
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, max_tokens: usize) -> ValidatorResult<String> {
        Ok(self.call_llm_api(prompt, max_tokens).await?)
    }
}
