use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::types::*;
use crate::error::{AiError, Result};
use crate::util::truncate_to_char_boundary;

pub(crate) struct OpenAiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| AiError::Config(format!("Invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// POST a chat completion. Anything but 200 becomes `AiError::Api` with
    /// the raw body; a 200 body that does not parse yields `None`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<Option<String>> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, messages = request.messages.len(), "Chat completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(
                status = status.as_u16(),
                body = truncate_to_char_boundary(&body, 200),
                "Chat completion failed"
            );
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(parsed) => Ok(parsed.first_content()),
            Err(e) => {
                warn!(error = %e, "Unexpected chat completion body, treating as empty");
                Ok(None)
            }
        }
    }
}
