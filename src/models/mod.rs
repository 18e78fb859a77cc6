pub mod claim;
pub mod report;
pub mod judge;
pub mod dataset;

// Re-export common model types
pub use claim::{ Claim, EvidenceItem };
pub use report::{ ValidationReport, Verdict };
pub use judge::{ JudgeScore, ScoreTally };
pub use dataset::DatasetItem;
