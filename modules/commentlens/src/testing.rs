// Test doubles for the analysis pipeline.
//
// - MockCommentSource (CommentSource): canned comments or a scrape failure
// - MockInsightGenerator (InsightGenerator): canned insight or a provider status
// - FakeBrowser / FakePage (browser_session traits): scripted DOM with a
//   shared BrowserLog for asserting opens, scrolls, queries and teardown
//
// No network, no Chrome.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use browser_session::{Browser, BrowserError, PageHandle};

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::insight::InsightGenerator;
use crate::platform::Platform;
use crate::scraper::CommentSource;

// ---------------------------------------------------------------------------
// MockCommentSource
// ---------------------------------------------------------------------------

pub struct MockCommentSource {
    outcome: Result<Vec<String>, String>,
    calls: Mutex<Vec<(String, Platform)>>,
}

impl MockCommentSource {
    pub fn returning<S: Into<String>>(comments: impl IntoIterator<Item = S>) -> Self {
        Self {
            outcome: Ok(comments.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(url, platform)` for every scrape call, in order.
    pub fn calls(&self) -> Vec<(String, Platform)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentSource for MockCommentSource {
    async fn scrape(&self, url: &str, platform: Platform) -> AnalyzeResult<Vec<String>> {
        self.calls.lock().unwrap().push((url.to_string(), platform));
        self.outcome.clone().map_err(AnalyzeError::Scrape)
    }
}

// ---------------------------------------------------------------------------
// MockInsightGenerator
// ---------------------------------------------------------------------------

pub struct MockInsightGenerator {
    outcome: Result<String, (u16, String)>,
    blobs: Mutex<Vec<String>>,
}

impl MockInsightGenerator {
    pub fn replying(insight: impl Into<String>) -> Self {
        Self {
            outcome: Ok(insight.into()),
            blobs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Err((status, body.into())),
            blobs: Mutex::new(Vec::new()),
        }
    }

    /// Every blob passed to `summarize`, in order.
    pub fn blobs(&self) -> Vec<String> {
        self.blobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl InsightGenerator for MockInsightGenerator {
    async fn summarize(&self, comments_blob: &str) -> AnalyzeResult<String> {
        self.blobs.lock().unwrap().push(comments_blob.to_string());
        self.outcome
            .clone()
            .map_err(|(status, body)| AnalyzeError::Analysis { status, body })
    }
}

// ---------------------------------------------------------------------------
// FakeBrowser / FakePage
// ---------------------------------------------------------------------------

/// What the fake browser saw. Shared between the browser, its pages and the test.
#[derive(Debug, Default)]
pub struct BrowserLog {
    pub opened: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<String>>,
    pub scrolls: AtomicUsize,
    pub closed: AtomicUsize,
}

impl BrowserLog {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Scripted browser. Every page it opens returns the same comments; `count`
/// walks through `counts` and then repeats the last value.
pub struct FakeBrowser {
    comments: Vec<String>,
    counts: Vec<usize>,
    open_error: Option<String>,
    fail_queries: bool,
    log: Arc<BrowserLog>,
}

impl FakeBrowser {
    pub fn with_comments<S: Into<String>>(comments: impl IntoIterator<Item = S>) -> Self {
        Self {
            comments: comments.into_iter().map(Into::into).collect(),
            counts: Vec::new(),
            open_error: None,
            fail_queries: false,
            log: Arc::new(BrowserLog::default()),
        }
    }

    pub fn failing_open(message: impl Into<String>) -> Self {
        Self {
            open_error: Some(message.into()),
            ..Self::with_comments(Vec::<String>::new())
        }
    }

    pub fn counts(mut self, counts: impl IntoIterator<Item = usize>) -> Self {
        self.counts = counts.into_iter().collect();
        self
    }

    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn log(&self) -> Arc<BrowserLog> {
        self.log.clone()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn open(&self, url: &str) -> browser_session::Result<Box<dyn PageHandle>> {
        self.log.opened.lock().unwrap().push(url.to_string());

        if let Some(message) = &self.open_error {
            return Err(BrowserError::Launch(message.clone()));
        }

        let counts = if self.counts.is_empty() {
            VecDeque::from([self.comments.len()])
        } else {
            self.counts.iter().copied().collect()
        };

        Ok(Box::new(FakePage {
            comments: self.comments.clone(),
            counts: Mutex::new(counts),
            fail_queries: self.fail_queries,
            log: self.log.clone(),
        }))
    }
}

pub struct FakePage {
    comments: Vec<String>,
    counts: Mutex<VecDeque<usize>>,
    fail_queries: bool,
    log: Arc<BrowserLog>,
}

#[async_trait]
impl PageHandle for FakePage {
    async fn query_all(&self, selector: &str) -> browser_session::Result<Vec<String>> {
        self.log.queries.lock().unwrap().push(selector.to_string());
        if self.fail_queries {
            return Err(BrowserError::Script("page crashed".into()));
        }
        Ok(self.comments.clone())
    }

    async fn count(&self, _selector: &str) -> browser_session::Result<usize> {
        let mut counts = self.counts.lock().unwrap();
        let value = if counts.len() > 1 {
            counts.pop_front().unwrap_or_default()
        } else {
            counts.front().copied().unwrap_or_default()
        };
        Ok(value)
    }

    async fn scroll_to_bottom(&self) -> browser_session::Result<()> {
        self.log.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> browser_session::Result<()> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
