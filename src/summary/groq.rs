// Groq chat-completions client.
//
// Groq exposes an OpenAI-compatible API. We send one system message and one
// user message per theme and read back the first choice. The HTTP client
// carries a request timeout, and an optional rate limiter keeps us inside
// the free tier's request budget.
//
// API docs: https://console.groq.com/docs/api-reference#chat-create

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::TextGenerator;
use crate::output::truncate_chars;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// System prompt sent with every summarization request.
pub const SYSTEM_PROMPT: &str = "You are a concise summarizer.";

/// Text generator backed by Groq's hosted models.
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    rate_limiter: Option<RateLimiter>,
}

impl GroqClient {
    /// Build a client. `timeout` bounds each HTTP request end to end.
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("review-themes/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            rate_limiter: None,
        })
    }

    /// Space requests at most `requests_per_second` apart.
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.rate_limiter = Some(RateLimiter::new(requests_per_second));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, prompt: &str, temperature: f32, max_output_tokens: u32) -> Result<String> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            max_tokens: max_output_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call Groq API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API returned {}: {}", status, truncate_chars(&body, 300));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse Groq API response")?;

        let text = completion_text(completion)?;

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            summary_preview = %truncate_chars(&text, 60),
            "Generated completion"
        );

        Ok(text)
    }
}

/// First choice's message content, trimmed. Missing or blank content is an error.
pub fn completion_text(completion: ChatCompletionResponse) -> Result<String> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .context("Groq API response contained no choices")?;

    let text = choice.message.content.unwrap_or_default().trim().to_string();
    if text.is_empty() {
        anyhow::bail!("Groq API returned an empty completion");
    }
    Ok(text)
}

// --- Chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}
