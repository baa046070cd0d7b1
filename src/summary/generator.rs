// One-sentence theme summaries.
//
// The generator never returns an error. Transport failures, quota errors,
// malformed responses and timeouts all become `SummaryOutcome::Failed`, and
// the theme still shows up in the output carrying the diagnostic.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::traits::TextGenerator;

/// Sampling and time limits for summary calls.
#[derive(Debug, Clone)]
pub struct SummarySettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Hard cap on one generation call, applied on top of any client timeout.
    pub timeout: Duration,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Result of summarizing one theme.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Generated(String),
    Failed { error: String },
}

impl SummaryOutcome {
    /// The text reported for the theme: the summary, or a diagnostic.
    pub fn text(&self) -> String {
        match self {
            SummaryOutcome::Generated(text) => text.clone(),
            SummaryOutcome::Failed { error } => format!("Summary error: {error}"),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SummaryOutcome::Failed { .. })
    }
}

/// Prompts a text generator for a one-sentence summary of a theme.
pub struct SummaryGenerator {
    generator: Arc<dyn TextGenerator>,
    settings: SummarySettings,
}

impl SummaryGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: SummarySettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &SummarySettings {
        &self.settings
    }

    /// Summarize the theme described by `keyphrases` and `representatives`.
    pub async fn summarize(&self, keyphrases: &[String], representatives: &[String]) -> SummaryOutcome {
        let prompt = build_prompt(keyphrases, representatives);

        let call = self.generator.generate(
            &prompt,
            self.settings.temperature,
            self.settings.max_output_tokens,
        );

        match tokio::time::timeout(self.settings.timeout, call).await {
            Ok(Ok(text)) => SummaryOutcome::Generated(text),
            Ok(Err(e)) => {
                warn!(error = %e, "Summary generation failed");
                SummaryOutcome::Failed {
                    error: format!("{e:#}"),
                }
            }
            Err(_) => {
                warn!(timeout = ?self.settings.timeout, "Summary generation timed out");
                SummaryOutcome::Failed {
                    error: format!(
                        "generation timed out after {:.1}s",
                        self.settings.timeout.as_secs_f64()
                    ),
                }
            }
        }
    }
}

/// The user prompt for one theme.
pub fn build_prompt(keyphrases: &[String], representatives: &[String]) -> String {
    format!(
        "Based on these patterns: {:?}\n\
         And these representative reviews: {:?}\n\
         Create one concise sentence summarizing the main point.",
        keyphrases, representatives
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str, temperature: f32, max_output_tokens: u32) -> Result<String> {
            Ok(format!("{}|{}|{}", prompt.lines().count(), temperature, max_output_tokens))
        }
    }

    struct Quota;

    #[async_trait]
    impl TextGenerator for Quota {
        async fn generate(&self, _: &str, _: f32, _: u32) -> Result<String> {
            anyhow::bail!("429 rate limit exceeded")
        }
    }

    struct Slow;

    #[async_trait]
    impl TextGenerator for Slow {
        async fn generate(&self, _: &str, _: f32, _: u32) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    #[test]
    fn test_prompt_contains_inputs() {
        let prompt = build_prompt(
            &["dirty tables".to_string()],
            &["tables were sticky".to_string()],
        );
        assert!(prompt.contains("\"dirty tables\""));
        assert!(prompt.contains("\"tables were sticky\""));
        assert!(prompt.contains("one concise sentence"));
    }

    #[tokio::test]
    async fn test_passes_sampling_settings() {
        let generator = SummaryGenerator::new(Arc::new(Echo), SummarySettings::default());
        let outcome = generator.summarize(&[], &["ok".to_string()]).await;
        assert_eq!(outcome, SummaryOutcome::Generated("3|0.1|100".to_string()));
    }

    #[tokio::test]
    async fn test_failure_becomes_diagnostic() {
        let generator = SummaryGenerator::new(Arc::new(Quota), SummarySettings::default());
        let outcome = generator.summarize(&[], &[]).await;
        assert!(outcome.is_failed());
        assert_eq!(outcome.text(), "Summary error: 429 rate limit exceeded");
    }

    #[tokio::test]
    async fn test_timeout_becomes_diagnostic() {
        let settings = SummarySettings {
            timeout: Duration::from_millis(20),
            ..SummarySettings::default()
        };
        let generator = SummaryGenerator::new(Arc::new(Slow), settings);
        let outcome = generator.summarize(&[], &[]).await;
        assert!(outcome.text().starts_with("Summary error: generation timed out"));
    }
}
