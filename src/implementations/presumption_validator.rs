use std::fs;
use std::path::Path;
use std::sync::Arc;
use log::{ info, warn };

use crate::config::{ render_template, ValidatorConfig, CONSOLIDATION_TEMPLATE };
use crate::errors::{ ValidatorError, ValidatorResult };
use crate::implementations::brave_search::BraveSearch;
use crate::implementations::claim_adjudicator::ClaimAdjudicator;
use crate::implementations::claim_extractor::ClaimExtractor;
use crate::implementations::llm_client::HttpLanguageModel;
use crate::models::report::ValidationReport;
use crate::traits::evidence_retriever::EvidenceRetriever;
use crate::traits::language_model::LanguageModel;

/// Identifies and fact-checks the presumptions in a prompt.
///
/// A run extracts claims once, then adjudicates them strictly in order; the
/// first model failure aborts the run. Whether web search is used is decided
/// at construction and applies to every claim.
///
/// # Usage Example
/// ```rust,no_run
/// use presumption_validator::{ PresumptionValidator, ValidatorConfig };
///
/// async fn check() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ValidatorConfig::load(None)?;
///     let validator = PresumptionValidator::from_config(&config)?;
///
///     let report = validator.validate_prompt("Stage IV lymphoma is always untreatable.").await?;
///     println!("{}", report.render());
///
///     let summary = validator.consolidate(&report).await?;
///     println!("{}", summary);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PresumptionValidator {
    model: Arc<dyn LanguageModel>,
    extractor: ClaimExtractor,
    adjudicator: ClaimAdjudicator,
    consolidation_template: String,
    consolidation_max_tokens: usize,
}

impl PresumptionValidator {
    pub fn new(
        config: &ValidatorConfig,
        model: Arc<dyn LanguageModel>,
        retriever: Option<Arc<dyn EvidenceRetriever>>
    ) -> ValidatorResult<Self> {
        Ok(Self {
            extractor: ClaimExtractor::from_config(config, model.clone())?,
            adjudicator: ClaimAdjudicator::from_config(config, model.clone(), retriever)?,
            consolidation_template: config.require_template(CONSOLIDATION_TEMPLATE)?,
            consolidation_max_tokens: config.max_tokens.consolidation,
            model,
        })
    }

    /// Wire up the HTTP model and, when a search key is configured, Brave Search
    pub fn from_config(config: &ValidatorConfig) -> ValidatorResult<Self> {
        let model: Arc<dyn LanguageModel> = Arc::new(HttpLanguageModel::new(config)?);
        let retriever: Option<Arc<dyn EvidenceRetriever>> = match BraveSearch::from_config(config)? {
            Some(search) => Some(Arc::new(search)),
            None => {
                warn!("No BRAVE_API_KEY found. Will use the model's knowledge without web search.");
                None
            }
        };
        Self::new(config, model, retriever)
    }

    pub fn uses_web_search(&self) -> bool {
        self.adjudicator.uses_retrieval()
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn extractor(&self) -> &ClaimExtractor {
        &self.extractor
    }

    pub fn adjudicator(&self) -> &ClaimAdjudicator {
        &self.adjudicator
    }

    /// Complete pipeline: extract and fact-check all presumptions
    pub async fn validate_prompt(&self, prompt: &str) -> ValidatorResult<ValidationReport> {
        info!("Extracting presumptions...");
        let claims = self.extractor.extract(prompt).await?;
        info!("Found {} presumption(s) to fact-check", claims.len());

        let mut verdicts = Vec::with_capacity(claims.len());
        for (i, claim) in claims.iter().enumerate() {
            info!("Fact-checking presumption {}/{}...", i + 1, claims.len());
            verdicts.push(self.adjudicator.adjudicate(claim).await?);
        }

        ValidationReport::new(prompt, claims, verdicts, self.uses_web_search())
    }

    pub fn build_consolidation_prompt(&self, report: &ValidationReport) -> String {
        render_template(&self.consolidation_template, &[("report", &report.render())])
    }

    /// Compress a report to the presumptions the model found inaccurate.
    /// The answer is returned as-is.
    pub async fn consolidate(&self, report: &ValidationReport) -> ValidatorResult<String> {
        info!("Consolidating {} fact-check(s)", report.verdicts().len());
        let instruction = self.build_consolidation_prompt(report);
        self.model.complete(&instruction, self.consolidation_max_tokens).await
    }

    pub fn save_report(report: &ValidationReport, path: &Path) -> ValidatorResult<()> {
        write_text(path, &report.render())
    }

    pub fn save_consolidated(consolidated: &str, path: &Path) -> ValidatorResult<()> {
        write_text(path, consolidated)
    }
}

fn write_text(path: &Path, contents: &str) -> ValidatorResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).map_err(|e| {
        ValidatorError::IoError(
            std::io::Error::new(e.kind(), format!("Failed to write {}: {}", path.display(), e))
        )
    })?;
    info!("Saved {}", path.display());
    Ok(())
}
