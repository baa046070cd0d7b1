// Fatal error taxonomy for a single analysis run.
//
// Only input problems and embedding/clustering failures end a run. A failed
// summary for one theme is not an error here: it travels as
// `SummaryOutcome::Failed` and still lands in the output.

use crate::clustering::kmeans::ClusteringError;

/// Errors that abort an analysis and surface as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The review list was empty (or only blank strings after normalization).
    #[error("No reviews provided")]
    NoReviews,

    /// The resolved theme count `min(top_themes, N)` was below 1.
    #[error("Not enough reviews for analysis")]
    NotEnoughReviews,

    /// The payload handed to the analyzer could not be read as a review list.
    #[error("Invalid review payload: {0}")]
    InvalidInput(String),

    /// The embedding backend failed or returned malformed vectors.
    #[error("Embedding failed: {0:#}")]
    Embedding(anyhow::Error),

    /// The clustering step rejected the embeddings.
    #[error("Clustering failed: {0}")]
    Clustering(#[from] ClusteringError),
}

impl AnalysisError {
    /// Input errors come from the caller's data; everything else is a model
    /// or backend problem.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoReviews | AnalysisError::NotEnoughReviews | AnalysisError::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_messages_match_wire_format() {
        assert_eq!(AnalysisError::NoReviews.to_string(), "No reviews provided");
        assert_eq!(
            AnalysisError::NotEnoughReviews.to_string(),
            "Not enough reviews for analysis"
        );
    }

    #[test]
    fn test_embedding_error_keeps_context_chain() {
        let err = anyhow::anyhow!("session closed").context("Embedding ONNX inference failed");
        let msg = AnalysisError::Embedding(err).to_string();
        assert!(msg.contains("Embedding ONNX inference failed"));
        assert!(msg.contains("session closed"));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(AnalysisError::NoReviews.is_input_error());
        assert!(AnalysisError::InvalidInput("x".into()).is_input_error());
        assert!(!AnalysisError::Clustering(ClusteringError::InsufficientData).is_input_error());
    }
}
