use async_trait::async_trait;

use crate::errors::ValidatorResult;

/// An opaque text-in, text-out model endpoint
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the model answering the calls
    fn model_id(&self) -> &str;

    /// Send a single user-role message and return the generated text.
    /// `max_tokens` caps the output length in endpoint units.
    async fn complete(&self, prompt: &str, max_tokens: usize) -> ValidatorResult<String>;
}
