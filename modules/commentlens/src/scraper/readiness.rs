use std::time::Duration;

use browser_session::{PageHandle, Result};
use tokio::time::{sleep, Instant};
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1500);

/// How long to let client-side rendering run before reading comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Sleep for the whole ceiling.
    Fixed,
    /// Poll the selector's match count and stop once it is non-zero and has
    /// not changed for `settle`, or when the ceiling is reached.
    Stable { poll: Duration, settle: Duration },
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::Stable {
            poll: DEFAULT_POLL_INTERVAL,
            settle: DEFAULT_SETTLE,
        }
    }
}

impl WaitStrategy {
    /// Block until the page is considered ready. Never exceeds `ceiling`
    /// (plus one in-flight count query).
    pub async fn wait(&self, page: &dyn PageHandle, selector: &str, ceiling: Duration) -> Result<()> {
        match *self {
            WaitStrategy::Fixed => {
                sleep(ceiling).await;
                Ok(())
            }
            WaitStrategy::Stable { poll, settle } => {
                let count = wait_until_stable(page, selector, ceiling, poll, settle).await?;
                debug!(selector, count, "Comment count settled");
                Ok(())
            }
        }
    }
}

async fn wait_until_stable(
    page: &dyn PageHandle,
    selector: &str,
    ceiling: Duration,
    poll: Duration,
    settle: Duration,
) -> Result<usize> {
    let deadline = Instant::now() + ceiling;
    let mut last = page.count(selector).await?;
    let mut unchanged_since = Instant::now();

    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(last);
        }
        if last > 0 && now.duration_since(unchanged_since) >= settle {
            return Ok(last);
        }

        sleep(poll.min(deadline - now)).await;

        let current = page.count(selector).await?;
        if current != last {
            last = current;
            unchanged_since = Instant::now();
        }
    }
}
