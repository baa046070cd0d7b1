use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::clustering::kmeans::{KMeans, DEFAULT_SEED};
use crate::pipeline::analyze::AnalyzerSettings;
use crate::summary::generator::SummarySettings;
use crate::summary::groq;

/// How keyphrases are scored.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyphraseBackend {
    /// Rank candidates by embedding similarity to the theme (default)
    Semantic,
    /// Rank candidates by TF-IDF over the theme's sentences; no model needed
    TfIdf,
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded at startup via
/// dotenvy.
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
    /// Client-side cap on generation requests per second (unset = no cap)
    pub groq_requests_per_second: Option<f64>,
    /// Directory holding the ONNX embedding model
    pub model_dir: PathBuf,
    pub keyphrase_backend: KeyphraseBackend,
    /// Seed for k-means initialisation
    pub seed: u64,
    pub summary_timeout: Duration,
    /// Themes summarized in parallel
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables. Everything except the
    /// API key has a default.
    pub fn load() -> Result<Self> {
        let keyphrase_backend = match env::var("REVIEW_THEMES_KEYPHRASES").as_deref() {
            Ok("tfidf") => KeyphraseBackend::TfIdf,
            // "semantic" or unset both default to embedding-based ranking
            _ => KeyphraseBackend::Semantic,
        };

        let model_dir = env::var("REVIEW_THEMES_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embedding::download::default_model_dir());

        Ok(Self {
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| groq::DEFAULT_API_URL.to_string()),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| groq::DEFAULT_MODEL.to_string()),
            groq_requests_per_second: parse_var("GROQ_REQUESTS_PER_SECOND")?,
            model_dir,
            keyphrase_backend,
            seed: parse_var("REVIEW_THEMES_SEED")?.unwrap_or(DEFAULT_SEED),
            summary_timeout: Duration::from_secs(
                parse_var("REVIEW_THEMES_SUMMARY_TIMEOUT_SECS")?.unwrap_or(30),
            ),
            concurrency: parse_var("REVIEW_THEMES_CONCURRENCY")?.unwrap_or(4),
        })
    }

    /// Check that the text-generation API key is configured.
    pub fn require_generator(&self) -> Result<()> {
        if self.groq_api_key.is_empty() {
            anyhow::bail!(
                "GROQ_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that the embedding model has been downloaded.
    pub fn require_embedding_model(&self) -> Result<()> {
        if !crate::embedding::download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `review-themes download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }

    /// Directory containing model.onnx and tokenizer.json.
    pub fn embedding_model_dir(&self) -> PathBuf {
        crate::embedding::download::embedding_model_dir(&self.model_dir)
    }

    /// Pipeline settings derived from this configuration.
    pub fn analyzer_settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            clustering: KMeans::with_seed(self.seed),
            summary: SummarySettings {
                timeout: self.summary_timeout,
                ..SummarySettings::default()
            },
            concurrency: self.concurrency.max(1),
            ..AnalyzerSettings::default()
        }
    }
}

/// Parse an optional env var, failing loudly on a malformed value.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {:?} ({})", name, raw, e)),
        Err(_) => Ok(None),
    }
}
