pub mod config;
pub mod error;
pub mod insight;
pub mod normalize;
pub mod pipeline;
pub mod platform;
pub mod scraper;
pub mod spam;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{AppConfig, InsightSettings};
pub use error::{AnalyzeError, AnalyzeResult};
pub use insight::{GroqInsightGenerator, InsightGenerator};
pub use normalize::clean;
pub use pipeline::{AnalysisReport, Analyzer, Stage};
pub use platform::Platform;
pub use scraper::{BrowserCommentSource, CommentSource, ScrapeSettings, WaitStrategy};
pub use spam::{detect_spam_rate, SpamHeuristic, SPAM_KEYWORDS};
