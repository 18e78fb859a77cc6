use std::fmt;
use serde::{ Deserialize, Serialize };

use crate::errors::{ ValidatorError, ValidatorResult };
use crate::models::claim::{ Claim, EvidenceItem };

const HEAVY_RULE_WIDTH: usize = 80;

/// The model's answer to a single claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub claim: Claim,
    /// Free-form fact-check text; accuracy is stated in prose, not as a flag
    pub narrative: String,
    /// Evidence shown to the model, in search relevance order
    pub evidence: Vec<EvidenceItem>,
    /// Whether retrieval was enabled for this run, not whether it found anything
    pub used_retrieval: bool,
}

/// Outcome of one pipeline run over a prompt.
///
/// `claims[i] == verdicts[i].claim` holds for every index; the constructor
/// rejects anything else, and the fields cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    original_prompt: String,
    claims: Vec<Claim>,
    verdicts: Vec<Verdict>,
    used_web_search: bool,
}

impl ValidationReport {
    pub fn new(
        original_prompt: impl Into<String>,
        claims: Vec<Claim>,
        verdicts: Vec<Verdict>,
        used_web_search: bool
    ) -> ValidatorResult<Self> {
        if claims.len() != verdicts.len() {
            return Err(
                ValidatorError::InvalidInput(
                    format!("{} claims but {} verdicts", claims.len(), verdicts.len())
                )
            );
        }
        if let Some(index) = claims
            .iter()
            .zip(&verdicts)
            .position(|(claim, verdict)| claim != &verdict.claim) {
            return Err(
                ValidatorError::InvalidInput(
                    format!("verdict {} does not answer claim {:?}", index + 1, claims[index].text())
                )
            );
        }

        Ok(ValidationReport {
            original_prompt: original_prompt.into(),
            claims,
            verdicts,
            used_web_search,
        })
    }

    pub fn original_prompt(&self) -> &str {
        &self.original_prompt
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn used_web_search(&self) -> bool {
        self.used_web_search
    }

    pub fn presumptions_found(&self) -> usize {
        self.claims.len()
    }

    /// Plain-text rendering used for display, persistence and consolidation
    pub fn render(&self) -> String {
        let heavy = "=".repeat(HEAVY_RULE_WIDTH);
        let light = "-".repeat(HEAVY_RULE_WIDTH);
        let mut lines = Vec::new();

        lines.push(heavy.clone());
        lines.push("PRESUMPTION VALIDATION REPORT".to_string());
        if self.used_web_search {
            lines.push("(Using real-time web search)".to_string());
        } else {
            lines.push("(Using model knowledge only - no web search)".to_string());
        }
        lines.push(heavy.clone());

        lines.push("\nORIGINAL PROMPT:".to_string());
        lines.push(light.clone());
        lines.push(self.original_prompt.clone());

        lines.push(format!("\n\nPRESUMPTIONS FOUND: {}", self.presumptions_found()));
        lines.push(heavy);

        for (i, verdict) in self.verdicts.iter().enumerate() {
            lines.push(format!("\n{}. PRESUMPTION:", i + 1));
            lines.push(light.clone());
            lines.push(verdict.claim.text().to_string());

            if !verdict.evidence.is_empty() {
                lines.push("\nSOURCES FOUND:".to_string());
                lines.push(light.clone());
                for (j, source) in verdict.evidence.iter().enumerate() {
                    lines.push(format!("  {}. {}", j + 1, source.title));
                    lines.push(format!("     {}", source.url));
                }
            }

            lines.push("\nFACT-CHECK:".to_string());
            lines.push(light.clone());
            lines.push(verdict.narrative.clone());
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
