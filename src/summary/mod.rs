// Theme summarization: trait-based abstraction over the text-generation API.
//
// TextGenerator is the seam: GroqClient talks to an OpenAI-compatible chat
// completions endpoint, tests plug in fakes. SummaryGenerator builds the
// prompt and turns every failure into a diagnostic outcome so one bad call
// never sinks the whole analysis.

pub mod generator;
pub mod groq;
pub mod rate_limiter;
pub mod traits;
