use async_trait::async_trait;

use crate::error::ModelError;

/// A text-in, text-out language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the model's full text answer.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
