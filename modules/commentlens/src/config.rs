use std::path::PathBuf;
use std::time::Duration;

use ai_client::GROQ_API_URL;
use browser_session::ChromeOptions;

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::scraper::{ScrapeSettings, WaitStrategy};

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling parameters for the insight request.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 350,
        }
    }
}

/// Application configuration loaded from environment variables.
/// The API key is the only required value.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // LLM provider
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
    pub request_timeout: Duration,

    // Browser
    pub chrome_bin: Option<PathBuf>,
    pub chrome_url: Option<String>,
    pub scrape_wait: WaitStrategy,

    // Pipeline
    pub skip_empty_analysis: bool,
}

impl AppConfig {
    /// Load `.env` (if present) and the process environment.
    pub fn from_env() -> AnalyzeResult<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AnalyzeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let groq_api_key = get("GROQ_API_KEY").ok_or_else(|| {
            AnalyzeError::Config("GROQ_API_KEY is not set. Check your .env file or environment.".into())
        })?;

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                AnalyzeError::Config(format!("REQUEST_TIMEOUT_SECS must be a number, got {raw:?}"))
            })?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let scrape_wait = match get("SCRAPE_WAIT").as_deref() {
            None | Some("stable") => WaitStrategy::default(),
            Some("fixed") => WaitStrategy::Fixed,
            Some(other) => {
                return Err(AnalyzeError::Config(format!(
                    "SCRAPE_WAIT must be \"stable\" or \"fixed\", got {other:?}"
                )))
            }
        };

        let skip_empty_analysis = match get("SKIP_EMPTY_ANALYSIS") {
            Some(raw) => raw.parse().map_err(|_| {
                AnalyzeError::Config(format!("SKIP_EMPTY_ANALYSIS must be true or false, got {raw:?}"))
            })?,
            None => false,
        };

        Ok(Self {
            groq_api_key,
            groq_api_url: get("GROQ_API_URL").unwrap_or_else(|| GROQ_API_URL.to_string()),
            groq_model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout,
            chrome_bin: get("CHROME_BIN").map(PathBuf::from),
            chrome_url: get("CHROME_URL"),
            scrape_wait,
            skip_empty_analysis,
        })
    }

    pub fn insight_settings(&self) -> InsightSettings {
        InsightSettings {
            model: self.groq_model.clone(),
            ..InsightSettings::default()
        }
    }

    pub fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            wait: self.scrape_wait,
            ..ScrapeSettings::default()
        }
    }

    pub fn chrome_options(&self) -> ChromeOptions {
        ChromeOptions {
            executable: self.chrome_bin.clone(),
            remote_url: self.chrome_url.clone(),
            ..ChromeOptions::default()
        }
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  GROQ_API_KEY: {}", preview(&self.groq_api_key));
        tracing::info!("  GROQ_API_URL: {}", self.groq_api_url);
        tracing::info!("  GROQ_MODEL: {}", self.groq_model);
        tracing::info!(
            "  CHROME_BIN: {}",
            self.chrome_bin
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<auto>".to_string())
        );
        tracing::info!(
            "  CHROME_URL: {}",
            self.chrome_url.as_deref().unwrap_or("<not set>")
        );
        tracing::info!("  SCRAPE_WAIT: {:?}", self.scrape_wait);
    }
}
