// Embedder trait: the swap-ready abstraction over the embedding backend.
//
// The default implementation is the local ONNX sentence transformer. The
// pipeline only ever sees this trait, so tests inject deterministic fakes.

use anyhow::Result;
use async_trait::async_trait;

use super::Embedding;

/// Maps review texts to fixed-length vectors.
///
/// Implementations must return exactly one vector per input, in input order,
/// and must be deterministic for a fixed model and input. They are shared
/// across concurrent analyses, so `&self` must be safe to use from many tasks.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, index-aligned with `texts`.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Embed one text. Default implementation goes through `embed`.
    async fn embed_one(&self, text: &str) -> Result<Embedding> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            anyhow::bail!("Embedder returned {} vectors for 1 text", vectors.len());
        }
        Ok(vectors.remove(0))
    }
}
