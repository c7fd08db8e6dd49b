pub mod chrome;
pub mod error;

pub use chrome::{ChromeBrowser, ChromeOptions};
pub use error::{BrowserError, Result};

use async_trait::async_trait;

/// Opens isolated browser sessions. Each call owns its session exclusively;
/// nothing is shared between two `open` calls.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Start a session and navigate it to `url`.
    async fn open(&self, url: &str) -> Result<Box<dyn PageHandle>>;
}

/// A loaded page inside one browser session.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Text content of every element matching a CSS selector, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<String>>;

    /// Number of elements matching a CSS selector.
    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.query_all(selector).await?.len())
    }

    /// Scroll the viewport to the bottom of the document.
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Tear the session down. Consumes the handle.
    async fn close(self: Box<Self>) -> Result<()>;
}
