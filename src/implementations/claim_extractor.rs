use std::sync::Arc;
use log::{ debug, info };

use crate::config::{ render_template, ValidatorConfig, EXTRACTION_TEMPLATE };
use crate::errors::ValidatorResult;
use crate::models::claim::Claim;
use crate::traits::language_model::LanguageModel;

/// Phrase the model is told to answer with when the prompt holds nothing to check
pub const NO_CLAIMS_SENTINEL: &str = "No presumptions found";

/// Characters stripped from the front of a list line
fn is_list_marker(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '•' | ')' | ' ')
}

// Any Unicode digit opens a claim line, though only ASCII markers are stripped
fn is_claim_line(line: &str) -> bool {
    match line.chars().next() {
        Some(first) => first.is_numeric() || first == '-' || first == '•',
        None => false,
    }
}

/// Parse the claims out of an extraction response.
///
/// If the sentinel appears anywhere the answer is empty, even when list lines
/// are present too. Otherwise every trimmed line starting with a digit, `-` or
/// `•` loses its leading run of list markers and is kept if anything remains.
/// Other lines (preambles, headers) are dropped.
pub fn parse_claim_lines(text: &str) -> Vec<String> {
    if text.contains(NO_CLAIMS_SENTINEL) {
        return Vec::new();
    }

    text.lines()
        .map(str::trim)
        .filter(|line| is_claim_line(line))
        .map(|line| line.trim_start_matches(is_list_marker).trim())
        .filter(|cleaned| !cleaned.is_empty())
        .map(str::to_string)
        .collect()
}

/// Asks the model to enumerate the fact-checkable presumptions in a prompt
#[derive(Clone)]
pub struct ClaimExtractor {
    model: Arc<dyn LanguageModel>,
    template: String,
    max_tokens: usize,
}

impl ClaimExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, template: String, max_tokens: usize) -> Self {
        Self { model, template, max_tokens }
    }

    pub fn from_config(
        config: &ValidatorConfig,
        model: Arc<dyn LanguageModel>
    ) -> ValidatorResult<Self> {
        Ok(Self::new(model, config.require_template(EXTRACTION_TEMPLATE)?, config.max_tokens.extraction))
    }

    pub fn build_prompt(&self, prompt: &str) -> String {
        render_template(&self.template, &[("prompt", prompt)])
    }

    /// Extract claims in the order the model listed them. Model failures propagate.
    pub async fn extract(&self, prompt: &str) -> ValidatorResult<Vec<Claim>> {
        let instruction = self.build_prompt(prompt);
        let response = self.model.complete(&instruction, self.max_tokens).await?;
        debug!("Extraction response: {}", response);

        let claims: Vec<Claim> = parse_claim_lines(&response).into_iter().map(Claim::new).collect();
        if claims.is_empty() {
            info!("Model reported no presumptions to check");
        }
        Ok(claims)
    }
}
