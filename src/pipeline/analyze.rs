// Review analysis pipeline: reviews -> embeddings -> clusters -> summaries.
//
// 1. Embed every review with the shared Embedder
// 2. Partition the embeddings into k = min(top_themes, N) clusters
// 3. For each non-empty cluster, in parallel: pick representatives, extract
//    keyphrases, and ask the text generator for a one-sentence summary
// 4. Restore topic id order and return
//
// Steps 1 and 2 are fatal on failure. Step 3 never fails: a broken summary
// becomes a diagnostic string and keyphrase failures become empty lists.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::input::normalize_reviews;
use super::result::{AnalysisResult, ThemeAnalysis, ThemeReport};
use crate::clustering::kmeans::KMeans;
use crate::clustering::representatives::{select_representatives, DEFAULT_REPRESENTATIVES};
use crate::embedding::traits::Embedder;
use crate::embedding::Embedding;
use crate::error::AnalysisError;
use crate::keyphrases::traits::KeyphraseExtractor;
use crate::keyphrases::DEFAULT_MAX_KEYPHRASES;
use crate::summary::generator::{SummaryGenerator, SummarySettings};
use crate::summary::traits::TextGenerator;

/// Theme count used when the caller doesn't ask for one.
pub const DEFAULT_TOP_THEMES: usize = 3;

/// Tunables for one analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub clustering: KMeans,
    /// Representatives per theme.
    pub representatives: usize,
    /// Keyphrases per theme.
    pub max_keyphrases: usize,
    pub summary: SummarySettings,
    /// Themes processed at once in step 3.
    pub concurrency: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            clustering: KMeans::default(),
            representatives: DEFAULT_REPRESENTATIVES,
            max_keyphrases: DEFAULT_MAX_KEYPHRASES,
            summary: SummarySettings::default(),
            concurrency: 4,
        }
    }
}

/// The review analysis entry point.
///
/// Holds shared handles to the embedding, keyphrase and text-generation
/// backends. One analyzer can serve many concurrent `analyze` calls; no call
/// mutates it.
pub struct ReviewAnalyzer {
    embedder: Arc<dyn Embedder>,
    keyphrases: Arc<dyn KeyphraseExtractor>,
    summarizer: SummaryGenerator,
    settings: AnalyzerSettings,
}

impl ReviewAnalyzer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        keyphrases: Arc<dyn KeyphraseExtractor>,
        generator: Arc<dyn TextGenerator>,
        settings: AnalyzerSettings,
    ) -> Self {
        let summarizer = SummaryGenerator::new(generator, settings.summary.clone());
        Self {
            embedder,
            keyphrases,
            summarizer,
            settings,
        }
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Analyze `reviews` into at most `top_themes` summarized themes.
    ///
    /// Always returns a well-formed result; fatal problems come back as
    /// `AnalysisResult::Error`.
    pub async fn analyze(&self, reviews: &[String], top_themes: usize) -> AnalysisResult {
        let result = self.analyze_detailed(reviews, top_themes).await;
        if let Err(e) = &result {
            warn!(error = %e, input_error = e.is_input_error(), "Review analysis failed");
        }
        result.into()
    }

    /// Normalize a raw JSON payload, then analyze it.
    pub async fn analyze_payload(&self, payload: &Value, top_themes: usize) -> AnalysisResult {
        match normalize_reviews(payload) {
            Ok(reviews) => self.analyze(&reviews, top_themes).await,
            Err(e) => {
                warn!(error = %e, "Rejected review payload");
                AnalysisResult::from_error(&e)
            }
        }
    }

    /// Run the pipeline and keep the per-theme detail.
    pub async fn analyze_detailed(
        &self,
        reviews: &[String],
        top_themes: usize,
    ) -> Result<ThemeAnalysis, AnalysisError> {
        if reviews.is_empty() {
            return Err(AnalysisError::NoReviews);
        }

        let n = reviews.len();
        info!(reviews = n, top_themes = top_themes, "Analyzing reviews");

        let embeddings = self
            .embedder
            .embed(reviews)
            .await
            .map_err(AnalysisError::Embedding)?;

        if embeddings.len() != n {
            return Err(AnalysisError::Embedding(anyhow::anyhow!(
                "Embedder returned {} vectors for {} reviews",
                embeddings.len(),
                n
            )));
        }

        let k = top_themes.min(n);
        if k < 1 {
            return Err(AnalysisError::NotEnoughReviews);
        }

        let clustering = self.settings.clustering.fit(&embeddings, k)?;
        info!(
            k = k,
            iterations = clustering.iterations,
            inertia = clustering.inertia,
            "Reviews clustered"
        );

        let mut populated = Vec::with_capacity(k);
        let mut empty_clusters = Vec::new();
        for topic_id in 0..clustering.k() {
            let members = clustering.members(topic_id);
            if members.is_empty() {
                debug!(topic_id = topic_id, "Skipping empty cluster");
                empty_clusters.push(topic_id);
            } else {
                populated.push((topic_id, members));
            }
        }

        let embeddings = &embeddings;
        let centroids = &clustering.centroids;
        let mut themes: Vec<ThemeReport> = stream::iter(populated.into_iter().map(
            move |(topic_id, members)| {
                self.build_theme(topic_id, members, reviews, embeddings, &centroids[topic_id])
            },
        ))
        .buffer_unordered(self.settings.concurrency.max(1))
        .collect()
        .await;

        themes.sort_by_key(|t| t.topic_id);

        let analysis = ThemeAnalysis {
            review_count: n,
            k,
            themes,
            empty_clusters,
        };

        info!(
            themes = analysis.themes.len(),
            empty_clusters = analysis.empty_clusters.len(),
            failed_summaries = analysis.failed_summaries(),
            "Review analysis complete"
        );

        Ok(analysis)
    }

    /// Representatives, keyphrases and summary for one cluster.
    async fn build_theme(
        &self,
        topic_id: usize,
        members: Vec<usize>,
        reviews: &[String],
        embeddings: &[Embedding],
        centroid: &[f64],
    ) -> ThemeReport {
        let representatives =
            select_representatives(&members, embeddings, centroid, self.settings.representatives);
        let representative_texts: Vec<String> = representatives
            .iter()
            .map(|r| reviews[r.index].clone())
            .collect();

        let block = members
            .iter()
            .map(|&i| reviews[i].as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let keyphrases = match self
            .keyphrases
            .extract(&block, self.settings.max_keyphrases)
            .await
        {
            Ok(phrases) => phrases,
            Err(e) => {
                warn!(topic_id = topic_id, error = %e, "Keyphrase extraction failed, continuing without");
                Vec::new()
            }
        };

        let summary = self
            .summarizer
            .summarize(&keyphrases, &representative_texts)
            .await;

        debug!(
            topic_id = topic_id,
            members = members.len(),
            keyphrases = ?keyphrases,
            failed = summary.is_failed(),
            "Theme summarized"
        );

        ThemeReport {
            topic_id,
            members,
            representatives,
            keyphrases,
            summary,
        }
    }
}
