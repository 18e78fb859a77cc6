use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::errors::{ ValidatorError, ValidatorResult };

pub const EXTRACTION_TEMPLATE: &str = "extraction";
pub const ADJUDICATION_TEMPLATE: &str = "adjudication";
pub const CONSOLIDATION_TEMPLATE: &str = "consolidation";
pub const JUDGE_TEMPLATE: &str = "judge";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),
}

/// Language-model wire formats understood by the HTTP client
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    Anthropic,
    OpenAi,
}

impl ApiProvider {
    /// Environment variable consulted when the config file carries no key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            ApiProvider::Anthropic => "ANTHROPIC_API_KEY",
            ApiProvider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ApiProvider::Anthropic => "https://api.anthropic.com/v1/messages",
            ApiProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }
}

impl std::fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiProvider::Anthropic => write!(f, "anthropic"),
            ApiProvider::OpenAi => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Wire format of the language-model endpoint
    pub provider: ApiProvider,

    /// API key for the LLM service
    pub api_key: Option<String>,

    /// Endpoint override; the provider default is used when absent
    pub api_endpoint: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature, left to the endpoint default when absent
    pub temperature: Option<f32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            provider: ApiProvider::Anthropic,
            api_key: None,
            api_endpoint: None,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchApiConfig {
    /// Brave Search subscription token; retrieval is disabled without it
    pub api_key: Option<String>,
    pub api_endpoint: String,
    /// Number of results requested per claim
    pub result_count: usize,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        SearchApiConfig {
            api_key: None,
            api_endpoint: "https://api.search.brave.com/res/v1/web/search".to_string(),
            result_count: 5,
        }
    }
}

/// Output-length caps per stage, in endpoint tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TokenLimits {
    pub extraction: usize,
    pub adjudication: usize,
    pub consolidation: usize,
    pub judge: usize,
}

impl Default for TokenLimits {
    fn default() -> Self {
        TokenLimits {
            extraction: 1024,
            adjudication: 2048,
            consolidation: 2048,
            judge: 1024,
        }
    }
}

/// Configuration for the whole pipeline, built once at startup and passed down
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Language model used for extraction, adjudication and consolidation
    pub llm_api: ApiConfig,

    /// Web search used to ground adjudication
    pub search_api: SearchApiConfig,

    pub max_tokens: TokenLimits,

    /// Model used by the judge; falls back to `llm_api.model`
    pub judge_model: Option<String>,

    /// Timeout applied to every outbound HTTP request
    pub request_timeout_secs: u64,

    /// Prompt templates with `{{placeholder}}` slots
    pub prompt_templates: HashMap<String, String>,
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text. Templates missing from the text keep their defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: ValidatorConfig = serde_yaml::from_str(contents)?;
        for (name, template) in default_prompt_templates() {
            config.prompt_templates.entry(name).or_insert(template);
        }
        Ok(config)
    }

    /// Load the file if one is given, then fill missing API keys from the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        use log::{ debug, info };

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Fill API keys that the config file left empty from the environment
    pub fn apply_env(&mut self) {
        if self.llm_api.api_key.is_none() {
            self.llm_api.api_key = std::env
                ::var(self.llm_api.provider.api_key_env_var())
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        if self.search_api.api_key.is_none() {
            self.search_api.api_key = std::env
                ::var("BRAVE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }

    /// The language-model key; its absence is fatal
    pub fn model_api_key(&self) -> Result<&str, ConfigError> {
        self.llm_api.api_key
            .as_deref()
            .ok_or_else(||
                ConfigError::MissingApiKey(
                    format!(
                        "set {} or llm_api.api_key in the config file",
                        self.llm_api.provider.api_key_env_var()
                    )
                )
            )
    }

    /// The search key, if retrieval is available
    pub fn search_api_key(&self) -> Option<&str> {
        self.search_api.api_key.as_deref()
    }

    pub fn model_endpoint(&self) -> String {
        self.llm_api.api_endpoint
            .clone()
            .unwrap_or_else(|| self.llm_api.provider.default_endpoint().to_string())
    }

    pub fn judge_model(&self) -> &str {
        self.judge_model.as_deref().unwrap_or(&self.llm_api.model)
    }

    /// Get the template for a specific stage
    pub fn get_template(&self, template_name: &str) -> Option<String> {
        self.prompt_templates.get(template_name).cloned()
    }

    /// Look up a template, failing if the config lost it
    pub fn require_template(&self, template_name: &str) -> ValidatorResult<String> {
        self.get_template(template_name).ok_or_else(||
            ValidatorError::TemplateError(format!("Template not found: {}", template_name))
        )
    }
}

/// Substitute `{{key}}` placeholders in a single pass over the template.
///
/// Inserted values are never scanned again, so a value that itself contains
/// `{{key}}` text reaches the model unchanged. Unknown placeholders are kept.
pub fn render_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let key = &after_open[..close];
        match params.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => {
                result.push_str(value);
                rest = &after_open[close + 2..];
            }
            None => {
                // Keep the braces and resume right after them, so a `{{`
                // inside an unknown key can still open a real placeholder
                result.push_str("{{");
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}

fn default_prompt_templates() -> HashMap<String, String> {
    let mut prompt_templates = HashMap::new();
    prompt_templates.insert(
        EXTRACTION_TEMPLATE.to_string(),
        r#"Analyze the following user prompt and identify any presumptions, assumptions, or claims that should be fact-checked.

Focus on:
1. Medical or health-related claims
2. Scientific or technical assumptions
3. Claims about treatments, procedures, or conditions
4. Statements presented as facts that may not be accurate

User prompt:
{{prompt}}

Extract each presumption as a clear, fact-checkable question. Format your response as a numbered list where each item is a question that can be fact-checked.

Example format:
1. Is [condition] treatable at [stage]?
2. Does [treatment] cause [effect]?

Only include genuine presumptions that need verification. If there are no presumptions to check, respond with "No presumptions found."
"#.to_string(),
    );
    prompt_templates.insert(
        ADJUDICATION_TEMPLATE.to_string(),
        r#"Please fact-check the following question/presumption:

{{claim}}
{{evidence}}

Based on the search results above (if provided) and your knowledge, provide:
1. A direct answer to the question
2. Key facts and evidence
3. Citations to specific sources (use the URLs from search results when relevant)
4. Any important nuances or context
5. Whether the underlying presumption in the original statement appears to be accurate or not

Be clear, accurate, and cite the sources. Keep your response concise but informative."#.to_string(),
    );
    prompt_templates.insert(
        CONSOLIDATION_TEMPLATE.to_string(),
        r#"Create a concise version of the following fact-check results. Only include incorrect presumptions and summarize the key facts and evidence for each. Omit any presumptions that were found to be accurate.

{{report}}
"#.to_string(),
    );
    prompt_templates.insert(
        JUDGE_TEMPLATE.to_string(),
        r#"You are provided with a medical patient question containing some false presuppositions. Evaluate the following presupposition detection results
Please evaluate the answer with the following criteria:

Score -1: The detection fails to recognize or acknowledge false presupposition in the questions.
Score 0: The detection appears aware of false presuppositions but often struggles to identify them clearly, or does not fully address them with the correct information.
Score 1: The detection accurately addresses the false presuppositions, providing comprehensive responses that question the presuppositions.

Evaluate the following question:

Question: {{question}}
Information: {{reference}}
detection: {{summary}}

Return score only.
"#.to_string(),
    );
    prompt_templates
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            llm_api: ApiConfig::default(),
            search_api: SearchApiConfig::default(),
            max_tokens: TokenLimits::default(),
            judge_model: None,
            request_timeout_secs: 120,
            prompt_templates: default_prompt_templates(),
        }
    }
}
