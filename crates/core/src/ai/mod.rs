//! AI collaborators: ranking, summarization and headline generation.
//!
//! The pipeline only depends on the [`Ranker`] and [`Summarizer`] traits.
//! [`LlmAnalyst`] implements both on top of any [`LlmClient`].

mod analyst;
mod llm;
mod traits;

pub use analyst::LlmAnalyst;
pub use llm::{
    complete_json, AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError,
    LlmUsage, OllamaClient,
};
pub use traits::{AiError, Ranker, Summarizer};
