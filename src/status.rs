// System status display: model files, API key, pipeline settings.

use std::path::Path;

use colored::Colorize;

use crate::config::{Config, KeyphraseBackend};
use crate::embedding::download::{embedding_files_present, MODEL_FILE};

/// Display readiness of every backend the analyzer needs.
pub fn show(config: &Config) {
    let embed_dir = config.embedding_model_dir();
    if embedding_files_present(&config.model_dir) {
        let size = model_size(&embed_dir.join(MODEL_FILE));
        println!("Embedding model: {} ({})", embed_dir.display(), size);
    } else {
        println!("Embedding model: {}", "not downloaded".yellow());
        println!("  Run `review-themes download-model` to fetch it");
    }

    if config.groq_api_key.is_empty() {
        println!("Summaries: {}", "disabled (GROQ_API_KEY not set)".yellow());
    } else {
        let limit = config
            .groq_requests_per_second
            .map(|r| format!(", {r} req/s"))
            .unwrap_or_default();
        println!("Summaries: {} via {}{}", config.groq_model, config.groq_api_url, limit);
    }

    let backend = match config.keyphrase_backend {
        KeyphraseBackend::Semantic => "semantic",
        KeyphraseBackend::TfIdf => "tfidf",
    };
    println!("Keyphrases: {backend}");
    println!(
        "Clustering: k-means, seed {} | summary timeout {}s | concurrency {}",
        config.seed,
        config.summary_timeout.as_secs(),
        config.concurrency
    );
}

fn model_size(path: &Path) -> String {
    std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown size".to_string())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(90 * 1024 * 1024), "90.0 MB");
    }
}
