use std::sync::Arc;
use log::debug;

use crate::config::{ render_template, ValidatorConfig, JUDGE_TEMPLATE };
use crate::errors::ValidatorResult;
use crate::traits::language_model::LanguageModel;

/// Model-as-judge scoring of a consolidated summary against a reference correction
#[derive(Clone)]
pub struct Judge {
    model: Arc<dyn LanguageModel>,
    template: String,
    max_tokens: usize,
}

impl Judge {
    pub fn new(model: Arc<dyn LanguageModel>, template: String, max_tokens: usize) -> Self {
        Self { model, template, max_tokens }
    }

    pub fn from_config(
        config: &ValidatorConfig,
        model: Arc<dyn LanguageModel>
    ) -> ValidatorResult<Self> {
        Ok(Self::new(model, config.require_template(JUDGE_TEMPLATE)?, config.max_tokens.judge))
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn build_prompt(&self, question: &str, reference: &str, summary: &str) -> String {
        render_template(
            &self.template,
            &[
                ("question", question),
                ("reference", reference),
                ("summary", summary),
            ]
        )
    }

    /// Ask for a -1/0/1 rubric score. Returns the raw answer text; use
    /// `JudgeScore::parse` to classify it.
    pub async fn score(
        &self,
        question: &str,
        reference: &str,
        summary: &str
    ) -> ValidatorResult<String> {
        let instruction = self.build_prompt(question, reference, summary);
        let raw = self.model.complete(&instruction, self.max_tokens).await?;
        debug!("Judge answered: {:?}", raw);
        Ok(raw)
    }
}
