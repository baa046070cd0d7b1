// Text generation trait: the swap-ready abstraction.
//
// The default implementation calls Groq's hosted Llama model. Anything that
// can turn a prompt into text (another hosted API, a local model, a test
// fake) can stand in without touching the pipeline.

use anyhow::Result;
use async_trait::async_trait;

/// Generates text from a prompt. Implementations are shared across
/// concurrent analyses and must not hold per-call mutable state.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// Fails on transport errors, non-success responses, quota errors, or a
    /// response without usable text.
    async fn generate(&self, prompt: &str, temperature: f32, max_output_tokens: u32)
        -> Result<String>;
}

/// Generator used when no API key is configured.
/// Always fails, so every theme carries a diagnostic instead of fake text.
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str, _temperature: f32, _max_output_tokens: u32) -> Result<String> {
        anyhow::bail!("GROQ_API_KEY not set; summarization is disabled")
    }
}
