// Keyphrase extraction: short phrases that steer theme summaries.
//
// Both extractors share the candidate generation here: lowercase word
// tokens, English stop-words removed, unigrams plus bigrams that don't span
// sentence punctuation. They differ only in how candidates are scored.

pub mod semantic;
pub mod tfidf;
pub mod traits;

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Default number of keyphrases per theme.
pub const DEFAULT_MAX_KEYPHRASES: usize = 3;

/// A unigram or bigram found in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The phrase, words joined by a single space.
    pub phrase: String,
    /// One or two lowercase words.
    pub words: Vec<String>,
    /// How many times the phrase occurs in the text.
    pub count: usize,
    /// Token position of the first occurrence.
    pub first_seen: usize,
}

/// Tokenizer and stop-word list used to produce candidates.
pub struct PhraseCandidates {
    word_re: Regex,
    sentence_re: Regex,
    stop_words: HashSet<String>,
}

impl PhraseCandidates {
    pub fn new() -> Result<Self> {
        Ok(Self {
            word_re: Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").context("Invalid word pattern")?,
            sentence_re: Regex::new(r"[.!?;:\n]+").context("Invalid sentence pattern")?,
            stop_words: get(LANGUAGE::English).into_iter().collect(),
        })
    }

    /// The stop-word list in a stable order.
    pub fn stop_word_list(&self) -> Vec<String> {
        let mut words: Vec<String> = self.stop_words.iter().cloned().collect();
        words.sort();
        words
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Non-blank sentences of `text`, trimmed.
    pub fn sentences(&self, text: &str) -> Vec<String> {
        self.sentence_re
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Lowercase word tokens of one sentence.
    pub fn words(&self, sentence: &str) -> Vec<String> {
        let lower = sentence.to_lowercase();
        self.word_re
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Words that can be part of a phrase: not a stop-word, longer than one
    /// character, and not purely numeric.
    fn usable(&self, word: &str) -> bool {
        word.chars().count() > 1
            && !word.chars().all(|c| c.is_ascii_digit())
            && !self.is_stop_word(word)
    }

    /// All unigram and bigram candidates, in order of first occurrence.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let mut found: Vec<Candidate> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut position = 0usize;

        let mut record = |words: &[String], position: usize| {
            let phrase = words.join(" ");
            match index.get(&phrase) {
                Some(&i) => found[i].count += 1,
                None => {
                    index.insert(phrase.clone(), found.len());
                    found.push(Candidate {
                        phrase,
                        words: words.to_vec(),
                        count: 1,
                        first_seen: position,
                    });
                }
            }
        };

        for sentence in self.sentences(text) {
            let words = self.words(&sentence);
            for (i, word) in words.iter().enumerate() {
                if !self.usable(word) {
                    continue;
                }
                record(std::slice::from_ref(word), position + i);
                if let Some(next) = words.get(i + 1) {
                    if self.usable(next) {
                        record(&words[i..i + 2], position + i);
                    }
                }
            }
            position += words.len();
        }

        found
    }
}

/// Pick up to `max` phrases by descending score, earliest first on ties.
///
/// A candidate whose words are all covered by an already picked phrase is
/// skipped, so "dirty tables" and "dirty" don't both take a slot.
pub fn pick_top(mut scored: Vec<(Candidate, f64)>, max: usize) -> Vec<String> {
    scored.sort_by(|(a, sa), (b, sb)| {
        sb.total_cmp(sa)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
            .then_with(|| a.words.len().cmp(&b.words.len()))
    });

    let mut covered: HashSet<String> = HashSet::new();
    let mut picked = Vec::new();

    for (candidate, _) in scored {
        if picked.len() >= max {
            break;
        }
        if candidate.words.iter().all(|w| covered.contains(w)) {
            continue;
        }
        covered.extend(candidate.words.iter().cloned());
        picked.push(candidate.phrase);
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands() -> PhraseCandidates {
        PhraseCandidates::new().unwrap()
    }

    #[test]
    fn test_stop_words_removed() {
        let c = cands().candidates("the noodles are delicious");
        let phrases: Vec<&str> = c.iter().map(|c| c.phrase.as_str()).collect();
        assert!(phrases.contains(&"noodles"));
        assert!(phrases.contains(&"delicious"));
        assert!(!phrases.contains(&"the"));
        assert!(!phrases.contains(&"are"));
    }

    #[test]
    fn test_bigrams_need_adjacent_content_words() {
        let c = cands().candidates("dirty tables and dirty utensils");
        let phrases: Vec<&str> = c.iter().map(|c| c.phrase.as_str()).collect();
        assert!(phrases.contains(&"dirty tables"));
        assert!(phrases.contains(&"dirty utensils"));
        assert!(!phrases.contains(&"tables dirty"));
    }

    #[test]
    fn test_bigrams_do_not_cross_sentences() {
        let c = cands().candidates("tasty noodles. cold drinks");
        assert!(!c.iter().any(|c| c.phrase == "noodles cold"));
    }

    #[test]
    fn test_counts_repeated_phrases() {
        let c = cands().candidates("dirty tables\ndirty tables\ndirty floor");
        let dirty = c.iter().find(|c| c.phrase == "dirty").unwrap();
        let tables = c.iter().find(|c| c.phrase == "dirty tables").unwrap();
        assert_eq!(dirty.count, 3);
        assert_eq!(tables.count, 2);
        assert_eq!(dirty.first_seen, 0);
    }

    #[test]
    fn test_empty_text_has_no_candidates() {
        assert!(cands().candidates("   ").is_empty());
        assert!(cands().candidates("the and of").is_empty());
    }

    #[test]
    fn test_pick_top_skips_covered_words() {
        let c = cands().candidates("dirty tables");
        let scored: Vec<(Candidate, f64)> = c
            .into_iter()
            .map(|c| {
                let s = if c.words.len() == 2 { 2.0 } else { 1.0 };
                (c, s)
            })
            .collect();
        assert_eq!(pick_top(scored, 3), vec!["dirty tables".to_string()]);
    }

    #[test]
    fn test_pick_top_respects_max() {
        let c = cands().candidates("noodles rice soup curry");
        let scored: Vec<(Candidate, f64)> = c.into_iter().map(|c| (c, 1.0)).collect();
        assert_eq!(pick_top(scored, 2).len(), 2);
    }
}
