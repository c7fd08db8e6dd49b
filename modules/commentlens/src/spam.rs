//! Keyword spam heuristic.
//!
//! A comment is spam when any keyword occurs in it, case-insensitively.
//! Only the aggregate rate is reported; individual comments are not tagged.

/// Phrases that mark a comment as spam.
pub const SPAM_KEYWORDS: &[&str] = &[
    "follow me",
    "free money",
    "click this link",
    "DM us",
    "buy followers",
    "promotion",
    "promo code",
    "earn cash",
    "instant profit",
];

#[derive(Debug, Clone)]
pub struct SpamHeuristic {
    /// Lowercased once at construction.
    keywords: Vec<String>,
}

impl Default for SpamHeuristic {
    fn default() -> Self {
        Self::new(SPAM_KEYWORDS.iter().copied())
    }
}

impl SpamHeuristic {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_spam(&self, comment: &str) -> bool {
        let lowered = comment.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Percentage of spam comments, 0-100, rounded to 2 decimals.
    /// An empty input is 0.
    pub fn spam_rate<S: AsRef<str>>(&self, comments: &[S]) -> f64 {
        if comments.is_empty() {
            return 0.0;
        }
        let spam = comments.iter().filter(|c| self.is_spam(c.as_ref())).count();
        round2(spam as f64 / comments.len() as f64 * 100.0)
    }
}

/// `spam_rate` with the built-in keyword list.
pub fn detect_spam_rate<S: AsRef<str>>(comments: &[S]) -> f64 {
    SpamHeuristic::default().spam_rate(comments)
}

/// Ties go to the even neighbour: 0.125 becomes 0.12.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
