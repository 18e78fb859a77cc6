pub mod language_model;
pub mod evidence_retriever;

// Re-export traits
pub use language_model::LanguageModel;
pub use evidence_retriever::EvidenceRetriever;
