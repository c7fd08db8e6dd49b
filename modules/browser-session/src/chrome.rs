use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::handler::Handler;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{BrowserError, Result};
use crate::{Browser, PageHandle};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Flags passed to every launched Chrome. The blink flag hides
/// `navigator.webdriver`, which both platforms check before rendering comments.
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-dev-shm-usage",
    "--disable-gpu",
];

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// Explicit Chrome/Chromium binary. `None` lets chromiumoxide detect one.
    pub executable: Option<PathBuf>,
    /// DevTools websocket of an already-running browser. When set, sessions
    /// are pages on that browser instead of freshly launched processes.
    pub remote_url: Option<String>,
    pub headless: bool,
    pub request_timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            executable: None,
            remote_url: None,
            headless: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

pub struct ChromeBrowser {
    options: ChromeOptions,
}

impl ChromeBrowser {
    pub fn new(options: ChromeOptions) -> Self {
        Self { options }
    }

    /// Check the configured executable before handing it to chromiumoxide,
    /// which otherwise reports a missing binary as an opaque spawn error.
    fn resolve_executable(&self) -> Result<Option<PathBuf>> {
        match &self.options.executable {
            Some(path) if !path.exists() => Err(BrowserError::Launch(format!(
                "Chrome executable not found at {}",
                path.display()
            ))),
            other => Ok(other.clone()),
        }
    }

    async fn launch(&self) -> Result<(CdpBrowser, Handler, TempDir)> {
        let profile = tempfile::tempdir()
            .map_err(|e| BrowserError::Launch(format!("Failed to create temp profile dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .request_timeout(self.options.request_timeout)
            .args(LAUNCH_ARGS.iter().copied());

        if let Some(exe) = self.resolve_executable()? {
            builder = builder.chrome_executable(exe);
        }
        if !self.options.headless {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|e| BrowserError::Launch(format!("Failed to build browser config: {e}")))?;

        let (browser, handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok((browser, handler, profile))
    }

    async fn connect(&self, ws_url: &str) -> Result<(CdpBrowser, Handler)> {
        CdpBrowser::connect(ws_url)
            .await
            .map_err(|e| BrowserError::Connect(format!("{ws_url}: {e}")))
    }
}

/// Drive the CDP event loop until the connection drops.
fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!(error = %e, "Browser handler event error");
            }
        }
    })
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn open(&self, url: &str) -> Result<Box<dyn PageHandle>> {
        let (browser, handler, profile) = match &self.options.remote_url {
            Some(ws_url) => {
                info!(ws_url = ws_url.as_str(), "Connecting to remote Chrome");
                let (browser, handler) = self.connect(ws_url).await?;
                (browser, handler, None)
            }
            None => {
                info!(executable = ?self.options.executable, "Launching headless Chrome");
                let (browser, handler, profile) = self.launch().await?;
                (browser, handler, Some(profile))
            }
        };
        let handler_task = spawn_handler(handler);

        let mut session = ChromeSession {
            browser,
            handler_task,
            page: None,
            profile,
        };

        match session.navigate(url).await {
            Ok(()) => Ok(Box::new(session)),
            Err(e) => {
                session.shutdown().await;
                Err(e)
            }
        }
    }
}

/// One browser session holding one page. Launched sessions own the Chrome
/// process and its temp profile; remote sessions only own their page.
struct ChromeSession {
    browser: CdpBrowser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
    profile: Option<TempDir>,
}

impl ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let navigation_error = |e: chromiumoxide::error::CdpError| BrowserError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(navigation_error)?;
        // Keep the page even if goto fails so shutdown closes it.
        self.page = Some(page.clone());

        page.goto(url).await.map_err(navigation_error)?;
        info!(url, "Page loaded");
        Ok(())
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::Script("No page available".into()))
    }

    async fn shutdown(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!(error = %e, "Page close failed");
            }
        }

        if self.profile.is_some() {
            if let Err(e) = self.browser.close().await {
                warn!(error = %e, "Browser close failed");
            }
            if let Err(e) = self.browser.wait().await {
                warn!(error = %e, "Browser process wait failed");
            }
        }

        self.handler_task.abort();
        // Temp profile directory is removed when `profile` drops here.
        info!("Browser session closed");
    }
}

#[async_trait]
impl PageHandle for ChromeSession {
    async fn query_all(&self, selector: &str) -> Result<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({})).map(e => e.innerText ?? e.textContent ?? '')",
            serde_json::to_string(selector)?
        );

        let texts: Vec<String> = self
            .page()?
            .evaluate(script.as_str())
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?
            .into_value()?;

        debug!(selector, count = texts.len(), "Queried elements");
        Ok(texts)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );

        let count: usize = self
            .page()?
            .evaluate(script.as_str())
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?
            .into_value()?;

        Ok(count)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page()?
            .evaluate("window.scrollTo(0, document.documentElement.scrollHeight)")
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        (*self).shutdown().await;
        Ok(())
    }
}
