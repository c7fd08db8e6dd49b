use serde::{Deserialize, Serialize};

use crate::error::{AnalyzeError, AnalyzeResult};

/// Social network a post URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    YouTube,
}

const INSTAGRAM_MARKERS: &[&str] = &["instagram.com"];
const YOUTUBE_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

impl Platform {
    /// Pick the platform by substring. Instagram wins when both match, so
    /// exactly one platform comes back for any accepted URL.
    pub fn detect(url: &str) -> AnalyzeResult<Self> {
        if INSTAGRAM_MARKERS.iter().any(|m| url.contains(m)) {
            Ok(Platform::Instagram)
        } else if YOUTUBE_MARKERS.iter().any(|m| url.contains(m)) {
            Ok(Platform::YouTube)
        } else {
            Err(AnalyzeError::InvalidUrl(url.to_string()))
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
