use async_trait::async_trait;

use crate::models::claim::EvidenceItem;

/// Source of web evidence for a claim
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    /// Search for `query` and return at most `limit` results in relevance order.
    ///
    /// Implementations never fail: transport and payload problems are logged
    /// and turned into an empty result.
    async fn search(&self, query: &str, limit: usize) -> Vec<EvidenceItem>;
}
