//! Comment Source Adapter: drives a browser session per request and reads
//! the visible top-level comment text for a platform.

pub mod readiness;

pub use readiness::WaitStrategy;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use browser_session::{Browser, PageHandle};
use tracing::{info, warn};

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::platform::Platform;

/// List-item spans inside the post's comment list.
pub const INSTAGRAM_COMMENT_SELECTOR: &str = "ul li span";
/// Rendered text node of each top-level YouTube comment.
pub const YOUTUBE_COMMENT_SELECTOR: &str = "#content-text";

/// Retrieves raw comment strings for a post. An empty result is a valid
/// outcome (nothing rendered or the selector matched nothing).
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn scrape(&self, url: &str, platform: Platform) -> AnalyzeResult<Vec<String>>;
}

#[async_trait]
impl<T: CommentSource + ?Sized> CommentSource for Arc<T> {
    async fn scrape(&self, url: &str, platform: Platform) -> AnalyzeResult<Vec<String>> {
        (**self).scrape(url, platform).await
    }
}

/// Timing knobs for the browser scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSettings {
    pub wait: WaitStrategy,
    pub instagram_wait: Duration,
    pub youtube_wait: Duration,
    pub youtube_scrolls: u32,
    pub scroll_wait: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            wait: WaitStrategy::default(),
            instagram_wait: Duration::from_secs(5),
            youtube_wait: Duration::from_secs(10),
            youtube_scrolls: 5,
            scroll_wait: Duration::from_secs(2),
        }
    }
}

/// Per-platform scrape plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScrapePlan {
    selector: &'static str,
    initial_wait: Duration,
    scrolls: u32,
    scroll_wait: Duration,
}

impl ScrapePlan {
    fn for_platform(platform: Platform, settings: &ScrapeSettings) -> Self {
        match platform {
            Platform::Instagram => ScrapePlan {
                selector: INSTAGRAM_COMMENT_SELECTOR,
                initial_wait: settings.instagram_wait,
                scrolls: 0,
                scroll_wait: Duration::ZERO,
            },
            // YouTube lazy-loads comment batches as the page scrolls.
            Platform::YouTube => ScrapePlan {
                selector: YOUTUBE_COMMENT_SELECTOR,
                initial_wait: settings.youtube_wait,
                scrolls: settings.youtube_scrolls,
                scroll_wait: settings.scroll_wait,
            },
        }
    }
}

pub struct BrowserCommentSource {
    browser: Box<dyn Browser>,
    settings: ScrapeSettings,
}

impl BrowserCommentSource {
    pub fn new(browser: Box<dyn Browser>, settings: ScrapeSettings) -> Self {
        Self { browser, settings }
    }

    async fn collect(&self, page: &dyn PageHandle, plan: &ScrapePlan) -> AnalyzeResult<Vec<String>> {
        let wait = self.settings.wait;

        wait.wait(page, plan.selector, plan.initial_wait).await?;

        for scroll in 1..=plan.scrolls {
            page.scroll_to_bottom().await?;
            wait.wait(page, plan.selector, plan.scroll_wait).await?;
            tracing::debug!(scroll, of = plan.scrolls, "Scrolled for more comments");
        }

        Ok(page.query_all(plan.selector).await?)
    }
}

/// Only http(s) pages are handed to the browser.
fn validate_url(url: &str) -> AnalyzeResult<()> {
    let parsed = url::Url::parse(url).map_err(|e| AnalyzeError::InvalidUrl(format!("{url} ({e})")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AnalyzeError::InvalidUrl(format!(
            "{url} (only http/https URLs are allowed)"
        )));
    }
    Ok(())
}

#[async_trait]
impl CommentSource for BrowserCommentSource {
    async fn scrape(&self, url: &str, platform: Platform) -> AnalyzeResult<Vec<String>> {
        validate_url(url)?;
        let plan = ScrapePlan::for_platform(platform, &self.settings);

        info!(url, %platform, selector = plan.selector, "Scraping comments");

        let page = self.browser.open(url).await?;
        let result = self.collect(page.as_ref(), &plan).await;

        // Teardown runs on both paths; a close failure never masks the scrape result.
        if let Err(e) = page.close().await {
            warn!(url, error = %e, "Failed to close browser session");
        }

        let comments = result?;
        if comments.is_empty() {
            warn!(url, %platform, "No comment elements matched");
        } else {
            info!(url, %platform, count = comments.len(), "Scraped comments");
        }
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_instagram_has_no_scrolls() {
        let plan = ScrapePlan::for_platform(Platform::Instagram, &ScrapeSettings::default());
        assert_eq!(plan.selector, "ul li span");
        assert_eq!(plan.initial_wait, Duration::from_secs(5));
        assert_eq!(plan.scrolls, 0);
    }

    #[test]
    fn test_plan_youtube_scrolls_five_times() {
        let plan = ScrapePlan::for_platform(Platform::YouTube, &ScrapeSettings::default());
        assert_eq!(plan.selector, "#content-text");
        assert_eq!(plan.initial_wait, Duration::from_secs(10));
        assert_eq!(plan.scrolls, 5);
        assert_eq!(plan.scroll_wait, Duration::from_secs(2));
    }

    #[test]
    fn test_validate_url_schemes() {
        assert!(validate_url("https://www.youtube.com/watch?v=abc123").is_ok());
        assert!(matches!(
            validate_url("ftp://youtube.com/x"),
            Err(AnalyzeError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("youtube.com/watch?v=abc"),
            Err(AnalyzeError::InvalidUrl(_))
        ));
    }
}
