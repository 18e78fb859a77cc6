pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ ApiProvider, ConfigError, ValidatorConfig };
pub use errors::{ ValidatorError, ValidatorResult };
pub use implementations::{
    batch::{ run_batch, run_evaluation, BatchSummary, EvaluationOutcome, FailurePolicy },
    brave_search::BraveSearch,
    claim_adjudicator::ClaimAdjudicator,
    claim_extractor::{ parse_claim_lines, ClaimExtractor, NO_CLAIMS_SENTINEL },
    dataset::{ Dataset, VALIDATION_SPLIT },
    judge::Judge,
    llm_client::HttpLanguageModel,
    presumption_validator::PresumptionValidator,
};
pub use models::{
    claim::{ Claim, EvidenceItem },
    dataset::DatasetItem,
    judge::{ JudgeScore, ScoreTally },
    report::{ ValidationReport, Verdict },
};
pub use traits::{ EvidenceRetriever, LanguageModel };
