//! Typed errors for a single analysis request.

use ai_client::AiError;
use browser_session::BrowserError;
use thiserror::Error;

/// Every variant is terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// URL names neither supported platform
    #[error("Invalid URL: {0}. Please enter a valid Instagram or YouTube link.")]
    InvalidUrl(String),

    /// Browser session, navigation, or DOM query failed
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Model provider answered with a non-success status
    #[error("Analysis error: {status} - {body}")]
    Analysis { status: u16, body: String },

    /// Transport failure talking to the model provider
    #[error("Network error: {0}")]
    Network(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<BrowserError> for AnalyzeError {
    fn from(err: BrowserError) -> Self {
        AnalyzeError::Scrape(err.to_string())
    }
}

impl From<AiError> for AnalyzeError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Api { status, body } => AnalyzeError::Analysis { status, body },
            AiError::Config(msg) => AnalyzeError::Config(msg),
            AiError::Network(msg) => AnalyzeError::Network(msg),
        }
    }
}

pub type AnalyzeResult<T> = std::result::Result<T, AnalyzeError>;
