use anyhow::Result;
use async_trait::async_trait;

/// Seam between the planning pipeline and the generative-AI backend.
/// The production implementation talks to Gemini; tests plug in fakes.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one prompt and returns the model's raw text answer.
    /// Single best-effort attempt, no retries.
    async fn complete(&self, prompt: &str) -> Result<String>;

    fn model_name(&self) -> String;
}
