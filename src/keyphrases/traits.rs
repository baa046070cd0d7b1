// Keyphrase extractor trait.
//
// Keyphrases only steer summarization, so the pipeline treats a failed
// extraction as "no keyphrases" and carries on.

use anyhow::Result;
use async_trait::async_trait;

/// Extracts the most relevant short phrases (unigrams or bigrams) from a
/// block of text, best first.
#[async_trait]
pub trait KeyphraseExtractor: Send + Sync {
    /// Return at most `max_phrases` phrases. Text without usable words
    /// yields an empty list, not an error.
    async fn extract(&self, text: &str, max_phrases: usize) -> Result<Vec<String>>;
}
