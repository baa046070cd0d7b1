use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use review_themes::config::{Config, KeyphraseBackend};
use review_themes::embedding::onnx::SentenceEmbedder;
use review_themes::embedding::traits::Embedder;
use review_themes::keyphrases::semantic::SemanticKeyphraseExtractor;
use review_themes::keyphrases::tfidf::TfIdfKeyphraseExtractor;
use review_themes::keyphrases::traits::KeyphraseExtractor;
use review_themes::pipeline::analyze::{AnalyzerSettings, ReviewAnalyzer, DEFAULT_TOP_THEMES};
use review_themes::pipeline::input::normalize_reviews;
use review_themes::pipeline::result::AnalysisResult;
use review_themes::summary::groq::GroqClient;
use review_themes::summary::traits::{TextGenerator, UnconfiguredGenerator};

/// Review Themes: turn a pile of customer reviews into a few summarized themes.
///
/// Reviews are embedded, clustered with k-means, and each cluster gets a
/// one-sentence summary backed by its most representative reviews.
#[derive(Parser)]
#[command(name = "review-themes", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze reviews into summarized themes
    Analyze {
        /// JSON payload or one review per line ("-" or omitted reads stdin)
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Number of themes to find (default: 3)
        #[arg(long, default_value_t = DEFAULT_TOP_THEMES)]
        themes: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Show members, keyphrases and representative reviews per theme
        #[arg(long, conflicts_with = "json")]
        details: bool,

        /// Override the clustering seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of themes to summarize in parallel
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Download the ONNX sentence embedding model (~90 MB)
    DownloadModel,

    /// Show configuration and model status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so --json output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("review_themes=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            themes,
            json,
            details,
            seed,
            concurrency,
        } => {
            let config = Config::load()?;
            config.require_embedding_model()?;

            let mut settings = config.analyzer_settings();
            if let Some(seed) = seed {
                settings.clustering.seed = seed;
            }
            if let Some(concurrency) = concurrency {
                settings.concurrency = concurrency.max(1);
            }

            let payload = read_payload(file.as_ref())?;
            let analyzer = build_analyzer(&config, settings)?;

            if details {
                let reviews = match normalize_reviews(&payload) {
                    Ok(reviews) => reviews,
                    Err(e) => {
                        review_themes::output::terminal::display_result(&AnalysisResult::from_error(&e));
                        return Ok(());
                    }
                };
                match analyzer.analyze_detailed(&reviews, themes).await {
                    Ok(analysis) => {
                        review_themes::output::terminal::display_analysis(&analysis, &reviews)
                    }
                    Err(e) => review_themes::output::terminal::display_result(
                        &AnalysisResult::from_error(&e),
                    ),
                }
            } else {
                let result = analyzer.analyze_payload(&payload, themes).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    review_themes::output::terminal::display_result(&result);
                }
            }
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX embedding model...");
            println!("  Destination: {}", model_dir.display());

            review_themes::embedding::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `review-themes analyze --file reviews.json`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            review_themes::status::show(&config);
        }
    }

    Ok(())
}

/// Read the review payload. JSON is used as-is; anything else is treated as
/// one review per line.
fn read_payload(file: Option<&PathBuf>) -> Result<serde_json::Value> {
    let raw = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read reviews from stdin")?;
            buf
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(_) => Ok(serde_json::Value::Array(
            raw.lines()
                .map(|line| serde_json::Value::String(line.to_string()))
                .collect(),
        )),
    }
}

/// Load the embedding model once and wire up keyphrase and summary backends.
fn build_analyzer(config: &Config, settings: AnalyzerSettings) -> Result<ReviewAnalyzer> {
    let embedder: Arc<dyn Embedder> = Arc::new(SentenceEmbedder::load(&config.embedding_model_dir())?);
    info!("Loaded sentence embedding model");

    let keyphrases: Arc<dyn KeyphraseExtractor> = match config.keyphrase_backend {
        KeyphraseBackend::Semantic => Arc::new(SemanticKeyphraseExtractor::new(Arc::clone(&embedder))?),
        KeyphraseBackend::TfIdf => Arc::new(TfIdfKeyphraseExtractor::new()?),
    };

    let generator: Arc<dyn TextGenerator> = match config.require_generator() {
        Ok(()) => {
            let mut client = GroqClient::new(
                &config.groq_api_key,
                &config.groq_api_url,
                &config.groq_model,
                config.summary_timeout,
            )?;
            if let Some(rps) = config.groq_requests_per_second {
                client = client.with_rate_limit(rps);
            }
            info!(model = client.model(), "Using Groq text generation");
            Arc::new(client)
        }
        Err(e) => {
            warn!("{e}");
            eprintln!(
                "{} GROQ_API_KEY not set; themes will carry a diagnostic instead of a summary.",
                "Warning:".yellow()
            );
            Arc::new(UnconfiguredGenerator)
        }
    };

    Ok(ReviewAnalyzer::new(embedder, keyphrases, generator, settings))
}
