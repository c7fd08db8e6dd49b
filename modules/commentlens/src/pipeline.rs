//! Orchestrator: one URL in, one report out.
//!
//! `Idle → PlatformDetected → Scraped → Cleaned → SpamScored → Summarized → Done`,
//! with `Failed` reachable after platform detection, scraping, or summarizing.
//! There are no retries and no partial reports.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::AnalyzeResult;
use crate::insight::{comments_blob, InsightGenerator};
use crate::normalize::clean_all;
use crate::platform::Platform;
use crate::scraper::CommentSource;
use crate::spam::SpamHeuristic;

/// Insight text used when an empty corpus skips the model call.
pub const EMPTY_CORPUS_INSIGHT: &str = "No comments found to analyze.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    PlatformDetected,
    Scraped,
    Cleaned,
    SpamScored,
    Summarized,
    Done,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::PlatformDetected => "platform_detected",
            Stage::Scraped => "scraped",
            Stage::Cleaned => "cleaned",
            Stage::SpamScored => "spam_scored",
            Stage::Summarized => "summarized",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub platform: Platform,
    pub spam_percentage: f64,
    pub insight: String,
    pub comment_count: usize,
}

impl std::fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Comments scraped successfully from {}! ({} comments)",
            self.platform, self.comment_count
        )?;
        writeln!(f, "Platform: {}", self.platform)?;
        writeln!(f, "Spam Percentage: {:.2}%", self.spam_percentage)?;
        writeln!(f)?;
        writeln!(f, "AI Insights on {}:", self.platform)?;
        write!(f, "{}", self.insight)
    }
}

pub struct Analyzer {
    source: Box<dyn CommentSource>,
    insight: Box<dyn InsightGenerator>,
    spam: SpamHeuristic,
    skip_empty: bool,
}

impl Analyzer {
    pub fn new(source: Box<dyn CommentSource>, insight: Box<dyn InsightGenerator>) -> Self {
        Self {
            source,
            insight,
            spam: SpamHeuristic::default(),
            skip_empty: false,
        }
    }

    pub fn with_spam_heuristic(mut self, spam: SpamHeuristic) -> Self {
        self.spam = spam;
        self
    }

    /// Skip the model call when nothing was scraped.
    pub fn skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    pub async fn analyze(&self, url: &str) -> AnalyzeResult<AnalysisReport> {
        let mut run = Run::new(url);

        let platform = run.step(Stage::PlatformDetected, Platform::detect(url))?;

        let raw = run.step(Stage::Scraped, self.source.scrape(url, platform).await)?;

        let cleaned = clean_all(&raw);
        run.advance(Stage::Cleaned);

        let spam_percentage = self.spam.spam_rate(&cleaned);
        run.advance(Stage::SpamScored);
        info!(url, %platform, comments = cleaned.len(), spam_percentage, "Spam scored");

        let insight = if cleaned.is_empty() && self.skip_empty {
            info!(url, "No comments scraped, skipping analysis");
            Ok(EMPTY_CORPUS_INSIGHT.to_string())
        } else {
            self.insight.summarize(&comments_blob(&cleaned)).await
        };
        let insight = run.step(Stage::Summarized, insight)?;

        run.advance(Stage::Done);

        Ok(AnalysisReport {
            platform,
            spam_percentage,
            insight,
            comment_count: cleaned.len(),
        })
    }
}

/// Tracks the current stage of one request for logging.
struct Run<'a> {
    url: &'a str,
    stage: Stage,
}

impl<'a> Run<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            stage: Stage::Idle,
        }
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(url = self.url, from = %self.stage, to = %next, "Stage transition");
        self.stage = next;
    }

    /// Advance to `next` on success, or to `Failed` with the error.
    fn step<T>(&mut self, next: Stage, result: AnalyzeResult<T>) -> AnalyzeResult<T> {
        match result {
            Ok(value) => {
                self.advance(next);
                Ok(value)
            }
            Err(e) => {
                warn!(url = self.url, stage = %self.stage, error = %e, "Analysis failed");
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }
}
