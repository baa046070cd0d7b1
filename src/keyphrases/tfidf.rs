// TF-IDF keyphrase extraction.
//
// Uses the `keyword_extraction` crate with each sentence of the block as a
// separate document, so words repeated across many reviews in a theme get
// frequency credit while words spread evenly get a smaller IDF boost.
// Bigrams inherit their words' scores, scaled by how often the two words
// actually occur together.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use tracing::debug;

use super::traits::KeyphraseExtractor;
use super::{pick_top, Candidate, PhraseCandidates};

/// Keyphrase extractor that needs no model files.
pub struct TfIdfKeyphraseExtractor {
    candidates: PhraseCandidates,
    stop_words: Vec<String>,
}

impl TfIdfKeyphraseExtractor {
    pub fn new() -> Result<Self> {
        let candidates = PhraseCandidates::new()?;
        let stop_words = candidates.stop_word_list();
        Ok(Self {
            candidates,
            stop_words,
        })
    }

    /// Synchronous ranking; the trait impl is a thin wrapper.
    pub fn rank(&self, text: &str, max_phrases: usize) -> Vec<String> {
        if max_phrases == 0 {
            return Vec::new();
        }

        let candidates = self.candidates.candidates(text);
        if candidates.is_empty() {
            return Vec::new();
        }

        let documents = self.candidates.sentences(text);
        let params = TfIdfParams::UnprocessedDocuments(&documents, &self.stop_words, None);
        let tfidf = TfIdf::new(params);
        let idf_scores: HashMap<String, f32> = tfidf
            .get_ranked_word_scores(candidates.len())
            .into_iter()
            .collect();

        let word_scores = unigram_scores(&candidates, &idf_scores);
        let scored = score_candidates(candidates, &word_scores);

        debug!(
            documents = documents.len(),
            candidates = scored.len(),
            "Scored TF-IDF keyphrase candidates"
        );

        pick_top(scored, max_phrases)
    }
}

#[async_trait]
impl KeyphraseExtractor for TfIdfKeyphraseExtractor {
    async fn extract(&self, text: &str, max_phrases: usize) -> Result<Vec<String>> {
        Ok(self.rank(text, max_phrases))
    }
}

/// Word score = occurrences x (1 + tf-idf). With a single document the IDF
/// term collapses and this falls back to plain frequency.
fn unigram_scores(
    candidates: &[Candidate],
    idf_scores: &HashMap<String, f32>,
) -> HashMap<String, (f64, usize)> {
    candidates
        .iter()
        .filter(|c| c.words.len() == 1)
        .map(|c| {
            let tfidf = idf_scores.get(&c.phrase).copied().unwrap_or(0.0) as f64;
            (c.phrase.clone(), (c.count as f64 * (1.0 + tfidf), c.count))
        })
        .collect()
}

/// Attach a score to every candidate. A bigram scores the sum of its words,
/// times its cohesion: bigram count over the rarer word's count.
fn score_candidates(
    candidates: Vec<Candidate>,
    word_scores: &HashMap<String, (f64, usize)>,
) -> Vec<(Candidate, f64)> {
    candidates
        .into_iter()
        .filter_map(|c| {
            let score = match c.words.as_slice() {
                [word] => word_scores.get(word)?.0,
                [first, second] => {
                    let (s1, n1) = *word_scores.get(first)?;
                    let (s2, n2) = *word_scores.get(second)?;
                    let cohesion = c.count as f64 / n1.min(n2).max(1) as f64;
                    (s1 + s2) * cohesion
                }
                _ => return None,
            };
            Some((c, score))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_prefers_repeated_theme() {
        let extractor = TfIdfKeyphraseExtractor::new().unwrap();
        let text = "dirty tables everywhere\ndirty tables again\nnoodles";
        let phrases = extractor.rank(text, 3);
        assert_eq!(phrases.first().map(String::as_str), Some("dirty tables"));
    }

    #[test]
    fn test_rank_caps_phrase_count() {
        let extractor = TfIdfKeyphraseExtractor::new().unwrap();
        let text = "noodles rice soup curry satay laksa";
        assert!(extractor.rank(text, 3).len() <= 3);
    }

    #[test]
    fn test_rank_empty_text() {
        let extractor = TfIdfKeyphraseExtractor::new().unwrap();
        assert!(extractor.rank("", 3).is_empty());
        assert!(extractor.rank("noodles", 0).is_empty());
    }

    #[test]
    fn test_cohesion_penalises_rare_pairings() {
        let extractor = TfIdfKeyphraseExtractor::new().unwrap();
        let candidates = extractor
            .candidates
            .candidates("chicken rice\nchicken soup\nchicken curry\nchicken rice");
        let scores = unigram_scores(&candidates, &HashMap::new());
        let scored = score_candidates(candidates, &scores);
        let get = |p: &str| scored.iter().find(|(c, _)| c.phrase == p).unwrap().1;
        assert!(get("chicken rice") > get("chicken soup"));
    }
}
