use std::sync::Arc;

use ai_client::{ChatOptions, Message, OpenAi};
use async_trait::async_trait;
use tracing::info;

use crate::config::InsightSettings;
use crate::error::AnalyzeResult;

pub const SYSTEM_PROMPT: &str = "You are an expert social media analyst.";

/// Shown when the provider answers 200 without any completion content.
pub const NO_RESPONSE: &str = "No response from AI.";

const TASKS: &str = "Tasks:\n\
1. Determine the positive reach (engagement sentiment).\n\
2. Identify negative reach (if any).\n\
3. Detect spam based on patterns such as repetitive messages, excessive promotions, unnatural text, bot-like behavior, or links.\n\
4. Suggest improvements for better audience interaction.\n\
5. Provide two actionable recommendations to boost engagement.\n\
6. Report the spam detected and explain why those messages were classified as spam.\n\n";

const OUTPUT_FORMAT: &str = "Format your response as:\n\
All responses should not exceed 100 words\n\
- Positive Reach: (percentage or description)\n\
- Negative Reach: (percentage or description)\n\
- Suggested Improvements: (list)\n\
- Recommendations (two points): (list)\n";

/// Produces the free-text engagement summary for a comment corpus.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// `comments_blob` is every cleaned comment joined by `\n`.
    async fn summarize(&self, comments_blob: &str) -> AnalyzeResult<String>;
}

#[async_trait]
impl<T: InsightGenerator + ?Sized> InsightGenerator for Arc<T> {
    async fn summarize(&self, comments_blob: &str) -> AnalyzeResult<String> {
        (**self).summarize(comments_blob).await
    }
}

/// Join cleaned comments into the single block sent to the model.
pub fn comments_blob<S: AsRef<str>>(comments: &[S]) -> String {
    comments
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// User prompt: the blob wrapped in the task list and the output format.
pub fn user_prompt(comments_blob: &str) -> String {
    format!("Analyze these comments:\n\n{comments_blob}\n\n{TASKS}{OUTPUT_FORMAT}")
}

pub fn build_messages(comments_blob: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(user_prompt(comments_blob)),
    ]
}

/// Insight generator backed by Groq's chat completions endpoint.
pub struct GroqInsightGenerator {
    ai: OpenAi,
    settings: InsightSettings,
}

impl GroqInsightGenerator {
    pub fn new(ai: OpenAi, settings: InsightSettings) -> Self {
        Self { ai, settings }
    }
}

#[async_trait]
impl InsightGenerator for GroqInsightGenerator {
    async fn summarize(&self, comments_blob: &str) -> AnalyzeResult<String> {
        let options = ChatOptions::default()
            .model(&self.settings.model)
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens);

        info!(
            model = self.settings.model.as_str(),
            blob_bytes = comments_blob.len(),
            "Requesting comment insight"
        );

        let content = self
            .ai
            .chat(&build_messages(comments_blob), options)
            .await?;

        Ok(content.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
