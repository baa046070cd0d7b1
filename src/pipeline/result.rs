// Analysis output types.
//
// `AnalysisResult` is the only thing callers of `analyze` ever see, and its
// JSON form is fixed: `{"summaries": [{"topic_id", "summary"}]}` or
// `{"error": "..."}`. `ThemeAnalysis` is the richer in-process view the CLI
// and tests use to look at members, representatives and keyphrases.

use serde::{Deserialize, Serialize};

use crate::clustering::representatives::Representative;
use crate::error::AnalysisError;
use crate::summary::generator::SummaryOutcome;

/// One theme's summary as it appears in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic_id: usize,
    pub summary: String,
}

/// The value returned to callers of the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Summaries { summaries: Vec<TopicSummary> },
    Error { error: String },
}

impl AnalysisResult {
    pub fn from_error(err: &AnalysisError) -> Self {
        AnalysisResult::Error {
            error: err.to_string(),
        }
    }

    pub fn summaries(&self) -> Option<&[TopicSummary]> {
        match self {
            AnalysisResult::Summaries { summaries } => Some(summaries),
            AnalysisResult::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResult::Error { error } => Some(error),
            AnalysisResult::Summaries { .. } => None,
        }
    }
}

impl From<Result<ThemeAnalysis, AnalysisError>> for AnalysisResult {
    fn from(result: Result<ThemeAnalysis, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => analysis.into_result(),
            Err(e) => AnalysisResult::from_error(&e),
        }
    }
}

/// Everything computed for one non-empty cluster.
#[derive(Debug, Clone)]
pub struct ThemeReport {
    pub topic_id: usize,
    /// Indices of every review in the cluster, ascending.
    pub members: Vec<usize>,
    /// Closest members to the centroid, nearest first.
    pub representatives: Vec<Representative>,
    pub keyphrases: Vec<String>,
    pub summary: SummaryOutcome,
}

/// A completed analysis, before it is flattened into `AnalysisResult`.
#[derive(Debug, Clone)]
pub struct ThemeAnalysis {
    pub review_count: usize,
    /// Resolved cluster count, `min(top_themes, review_count)`.
    pub k: usize,
    /// Non-empty themes in ascending topic id order.
    pub themes: Vec<ThemeReport>,
    /// Cluster ids that ended up with no members and were left out.
    pub empty_clusters: Vec<usize>,
}

impl ThemeAnalysis {
    pub fn failed_summaries(&self) -> usize {
        self.themes.iter().filter(|t| t.summary.is_failed()).count()
    }

    pub fn into_result(self) -> AnalysisResult {
        AnalysisResult::Summaries {
            summaries: self
                .themes
                .into_iter()
                .map(|t| TopicSummary {
                    topic_id: t.topic_id,
                    summary: t.summary.text(),
                })
                .collect(),
        }
    }
}
