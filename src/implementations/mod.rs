pub mod llm_client;
pub mod brave_search;
pub mod claim_extractor;
pub mod claim_adjudicator;
pub mod presumption_validator;
pub mod judge;
pub mod dataset;
pub mod batch;
