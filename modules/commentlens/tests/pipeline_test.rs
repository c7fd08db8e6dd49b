//! Orchestrator scenarios with mocked scraping and insight generation.

use std::sync::Arc;

use commentlens::pipeline::EMPTY_CORPUS_INSIGHT;
use commentlens::testing::{MockCommentSource, MockInsightGenerator};
use commentlens::{AnalyzeError, Analyzer, Platform};

fn analyzer(
    source: &Arc<MockCommentSource>,
    insight: &Arc<MockInsightGenerator>,
) -> Analyzer {
    Analyzer::new(Box::new(source.clone()), Box::new(insight.clone()))
}

#[tokio::test]
async fn youtube_end_to_end() {
    let source = Arc::new(MockCommentSource::returning([
        "Great video!",
        "follow me for more",
        "Nice!!",
    ]));
    let insight = Arc::new(MockInsightGenerator::replying("Positive Reach: 80%..."));

    let report = analyzer(&source, &insight)
        .analyze("https://www.youtube.com/watch?v=abc123")
        .await
        .unwrap();

    assert_eq!(report.platform, Platform::YouTube);
    assert_eq!(report.spam_percentage, 33.33);
    assert_eq!(report.insight, "Positive Reach: 80%...");
    assert_eq!(report.comment_count, 3);

    assert_eq!(
        source.calls(),
        vec![(
            "https://www.youtube.com/watch?v=abc123".to_string(),
            Platform::YouTube
        )]
    );
    assert_eq!(
        insight.blobs(),
        vec!["Great video!\nfollow me for more\nNice!!".to_string()]
    );
}

#[tokio::test]
async fn instagram_comments_are_cleaned_before_scoring_and_analysis() {
    let source = Arc::new(MockCommentSource::returning([
        "🔥🔥 FREE MONEY 💰 at my bio",
        "so cute 😍",
    ]));
    let insight = Arc::new(MockInsightGenerator::replying("ok"));

    let report = analyzer(&source, &insight)
        .analyze("https://www.instagram.com/reel/Cx12ab/")
        .await
        .unwrap();

    assert_eq!(report.platform, Platform::Instagram);
    assert_eq!(report.spam_percentage, 50.0);
    assert_eq!(insight.blobs(), vec![" FREE MONEY  at my bio\nso cute ".to_string()]);
}

#[tokio::test]
async fn provider_error_discards_partial_results() {
    let source = Arc::new(MockCommentSource::returning(["follow me", "nice"]));
    let insight = Arc::new(MockInsightGenerator::failing(429, r#"{"error":"rate_limit"}"#));

    let err = analyzer(&source, &insight)
        .analyze("https://youtu.be/abc123")
        .await
        .unwrap_err();

    match err {
        AnalyzeError::Analysis { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, r#"{"error":"rate_limit"}"#);
        }
        other => panic!("expected analysis error, got {other:?}"),
    }
    assert_eq!(insight.blobs().len(), 1);
}

#[tokio::test]
async fn invalid_url_fails_before_scraping() {
    let source = Arc::new(MockCommentSource::returning(["never"]));
    let insight = Arc::new(MockInsightGenerator::replying("never"));

    let err = analyzer(&source, &insight)
        .analyze("https://example.com/post/1")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzeError::InvalidUrl(_)));
    assert!(source.calls().is_empty());
    assert!(insight.blobs().is_empty());
}

#[tokio::test]
async fn scrape_failure_halts_before_analysis() {
    let source = Arc::new(MockCommentSource::failing("chrome not found"));
    let insight = Arc::new(MockInsightGenerator::replying("never"));

    let err = analyzer(&source, &insight)
        .analyze("https://www.youtube.com/watch?v=abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzeError::Scrape(ref m) if m == "chrome not found"));
    assert!(insight.blobs().is_empty());
}

#[tokio::test]
async fn empty_corpus_still_calls_model_by_default() {
    let source = Arc::new(MockCommentSource::returning(Vec::<String>::new()));
    let insight = Arc::new(MockInsightGenerator::replying("nothing to say"));

    let report = analyzer(&source, &insight)
        .analyze("https://www.instagram.com/p/abc/")
        .await
        .unwrap();

    assert_eq!(report.spam_percentage, 0.0);
    assert_eq!(report.comment_count, 0);
    assert_eq!(report.insight, "nothing to say");
    assert_eq!(insight.blobs(), vec![String::new()]);
}

#[tokio::test]
async fn empty_corpus_skips_model_when_configured() {
    let source = Arc::new(MockCommentSource::returning(Vec::<String>::new()));
    let insight = Arc::new(MockInsightGenerator::replying("never"));

    let report = analyzer(&source, &insight)
        .skip_empty(true)
        .analyze("https://www.instagram.com/p/abc/")
        .await
        .unwrap();

    assert_eq!(report.insight, EMPTY_CORPUS_INSIGHT);
    assert!(insight.blobs().is_empty());
}

#[tokio::test]
async fn report_renders_all_three_fields() {
    let source = Arc::new(MockCommentSource::returning(["Great video!", "follow me", "Nice!!"]));
    let insight = Arc::new(MockInsightGenerator::replying("- Positive Reach: high"));

    let report = analyzer(&source, &insight)
        .analyze("https://www.youtube.com/watch?v=abc123")
        .await
        .unwrap();

    let text = report.to_string();
    assert!(text.contains("Platform: YouTube"));
    assert!(text.contains("Spam Percentage: 33.33%"));
    assert!(text.contains("AI Insights on YouTube:\n- Positive Reach: high"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["platform"], "YouTube");
    assert_eq!(json["spam_percentage"], 33.33);
}
