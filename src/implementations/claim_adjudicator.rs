use std::sync::Arc;
use log::info;

use crate::config::{ render_template, ValidatorConfig, ADJUDICATION_TEMPLATE };
use crate::errors::ValidatorResult;
use crate::models::claim::{ Claim, EvidenceItem };
use crate::models::report::Verdict;
use crate::traits::evidence_retriever::EvidenceRetriever;
use crate::traits::language_model::LanguageModel;

/// Format search results as the numbered block embedded in the fact-check prompt.
/// No evidence yields an empty block.
pub fn format_evidence_block(evidence: &[EvidenceItem]) -> String {
    if evidence.is_empty() {
        return String::new();
    }

    let mut block = String::from("\n\nHere are search results from the web:\n\n");
    for (i, item) in evidence.iter().enumerate() {
        block.push_str(&format!("{}. {}\n", i + 1, item.title));
        block.push_str(&format!("   URL: {}\n", item.url));
        block.push_str(&format!("   {}\n\n", item.snippet));
    }
    block
}

/// Answers one claim at a time, optionally grounded in web evidence
#[derive(Clone)]
pub struct ClaimAdjudicator {
    model: Arc<dyn LanguageModel>,
    retriever: Option<Arc<dyn EvidenceRetriever>>,
    template: String,
    max_tokens: usize,
    result_count: usize,
}

impl ClaimAdjudicator {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        retriever: Option<Arc<dyn EvidenceRetriever>>,
        template: String,
        max_tokens: usize,
        result_count: usize
    ) -> Self {
        Self { model, retriever, template, max_tokens, result_count }
    }

    pub fn from_config(
        config: &ValidatorConfig,
        model: Arc<dyn LanguageModel>,
        retriever: Option<Arc<dyn EvidenceRetriever>>
    ) -> ValidatorResult<Self> {
        Ok(
            Self::new(
                model,
                retriever,
                config.require_template(ADJUDICATION_TEMPLATE)?,
                config.max_tokens.adjudication,
                config.search_api.result_count
            )
        )
    }

    pub fn uses_retrieval(&self) -> bool {
        self.retriever.is_some()
    }

    pub fn build_prompt(&self, claim: &Claim, evidence: &[EvidenceItem]) -> String {
        render_template(
            &self.template,
            &[
                ("claim", claim.text()),
                ("evidence", &format_evidence_block(evidence)),
            ]
        )
    }

    /// Fact-check a claim. Retrieval failures have already degraded to no
    /// evidence; model failures propagate.
    pub async fn adjudicate(&self, claim: &Claim) -> ValidatorResult<Verdict> {
        let evidence = match &self.retriever {
            Some(retriever) => {
                info!("Searching web for: {}", claim);
                retriever.search(claim.text(), self.result_count).await
            }
            None => Vec::new(),
        };

        let instruction = self.build_prompt(claim, &evidence);
        let narrative = self.model.complete(&instruction, self.max_tokens).await?;

        Ok(Verdict {
            claim: claim.clone(),
            narrative,
            evidence,
            used_retrieval: self.uses_retrieval(),
        })
    }
}
