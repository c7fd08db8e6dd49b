mod client;
pub(crate) mod types;

use std::time::Duration;

use crate::error::Result;
use crate::message::Message;

use client::OpenAiClient;
use types::{ChatRequest, WireMessage};

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Chat Options
// =============================================================================

/// Sampling knobs for a single completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Overrides the agent's model for this request.
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

// =============================================================================
// OpenAi Agent
// =============================================================================

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(api_key, model).with_base_url(GROQ_API_URL)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client(&self) -> Result<OpenAiClient> {
        OpenAiClient::new(&self.api_key, &self.base_url, self.timeout)
    }

    /// Single chat completion. Returns the first choice's content, or `None`
    /// when a successful response carries none.
    pub async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<Option<String>> {
        let model = options.model.as_deref().unwrap_or(&self.model);
        let mut request =
            ChatRequest::new(model).messages(messages.iter().map(WireMessage::from));

        if let Some(max) = options.max_tokens {
            request = request.max_tokens(max);
        }
        if let Some(temperature) = options.temperature {
            request = request.temperature(temperature);
        }

        self.client()?.chat(&request).await
    }
}
