// Embedding-based keyphrase extraction.
//
// Embeds the whole block and each candidate phrase with the same sentence
// embedder the pipeline uses for clustering, then ranks candidates by cosine
// similarity to the block. Phrases that mean what the block means win, even
// when they aren't the most frequent words in it.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::traits::KeyphraseExtractor;
use super::{pick_top, Candidate, PhraseCandidates};
use crate::embedding::cosine_similarity;
use crate::embedding::traits::Embedder;

/// Upper bound on candidates embedded per call.
const DEFAULT_MAX_CANDIDATES: usize = 64;

pub struct SemanticKeyphraseExtractor {
    embedder: Arc<dyn Embedder>,
    candidates: PhraseCandidates,
    max_candidates: usize,
}

impl SemanticKeyphraseExtractor {
    pub fn new(embedder: Arc<dyn Embedder>) -> Result<Self> {
        Ok(Self {
            embedder,
            candidates: PhraseCandidates::new()?,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        })
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }

    /// Keep the most frequent candidates, earliest first on ties.
    fn shortlist(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        if candidates.len() > self.max_candidates {
            candidates.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
            candidates.truncate(self.max_candidates);
        }
        candidates
    }
}

#[async_trait]
impl KeyphraseExtractor for SemanticKeyphraseExtractor {
    async fn extract(&self, text: &str, max_phrases: usize) -> Result<Vec<String>> {
        if max_phrases == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.shortlist(self.candidates.candidates(text));
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut inputs = Vec::with_capacity(candidates.len() + 1);
        inputs.push(text.to_string());
        inputs.extend(candidates.iter().map(|c| c.phrase.clone()));

        let vectors = self
            .embedder
            .embed(&inputs)
            .await
            .context("Failed to embed keyphrase candidates")?;

        if vectors.len() != inputs.len() {
            anyhow::bail!(
                "Embedder returned {} vectors for {} keyphrase inputs",
                vectors.len(),
                inputs.len()
            );
        }

        let block = &vectors[0];
        let scored: Vec<(Candidate, f64)> = candidates
            .into_iter()
            .zip(&vectors[1..])
            .map(|(c, v)| (c, cosine_similarity(block, v)))
            .collect();

        debug!(candidates = scored.len(), "Scored semantic keyphrase candidates");

        Ok(pick_top(scored, max_phrases))
    }
}
